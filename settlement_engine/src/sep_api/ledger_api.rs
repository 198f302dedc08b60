use wsp_common::Cents;

use crate::{
    db_types::{LedgerEntry, NewPromoCode, NewQrCode, PromoCode, QrCode},
    traits::{LedgerDatabase, LedgerError, LedgerManagement},
};

/// Read access to the commission ledger and the referral codes, plus the small operator write surface
/// (code creation, marking payouts as paid). Reconciliation owns all other writes.
#[derive(Debug, Clone)]
pub struct LedgerApi<B> {
    db: B,
}

impl<B> LedgerApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> LedgerApi<B>
where B: LedgerManagement
{
    pub async fn fetch_ledger_entry(&self, tx_id: &str) -> Result<Option<LedgerEntry>, LedgerError> {
        self.db.fetch_ledger_entry(tx_id).await
    }

    pub async fn fetch_entries_for_host(&self, host_id: &str) -> Result<Vec<LedgerEntry>, LedgerError> {
        self.db.fetch_entries_for_host(host_id).await
    }

    pub async fn host_commission_total(&self, host_id: &str) -> Result<Cents, LedgerError> {
        self.db.host_commission_total(host_id).await
    }

    pub async fn fetch_promo_code(&self, code: &str) -> Result<Option<PromoCode>, LedgerError> {
        self.db.fetch_promo_code(code).await
    }

    pub async fn fetch_qr_code(&self, code: &str) -> Result<Option<QrCode>, LedgerError> {
        self.db.fetch_qr_code(code).await
    }
}

impl<B> LedgerApi<B>
where B: LedgerDatabase
{
    pub async fn create_promo_code(&self, code: NewPromoCode) -> Result<PromoCode, LedgerError> {
        self.db.insert_promo_code(code).await
    }

    pub async fn create_qr_code(&self, code: NewQrCode) -> Result<QrCode, LedgerError> {
        self.db.insert_qr_code(code).await
    }

    pub async fn mark_paid(&self, tx_id: &str) -> Result<LedgerEntry, LedgerError> {
        self.db.mark_paid(tx_id).await
    }
}
