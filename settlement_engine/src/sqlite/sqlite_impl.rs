//! `SqliteDatabase` is the concrete commission-ledger backend.
//!
//! It implements [`LedgerDatabase`] and [`LedgerManagement`] on top of the low-level functions in
//! [`super::db`].
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;
use wsp_common::Cents;

use super::db::{codes, db_url, ledger, new_pool};
use crate::{
    db_types::{LedgerEntry, NewLedgerEntry, NewPromoCode, NewQrCode, PromoCode, QrCode},
    traits::{LedgerDatabase, LedgerError, LedgerManagement},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl LedgerDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Takes a completed transaction, and in a single atomic transaction,
    /// * resolves the referring host from the promo code (falling back to the QR code),
    /// * inserts the commission ledger row. If a row for the transaction id already exists, nothing further
    ///   is done and `false` is returned.
    /// * increments the promo-code usage counter and the QR-code conversion counter, but only when the row
    ///   was newly inserted.
    async fn apply_completed_transaction(&self, entry: NewLedgerEntry) -> Result<bool, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let tx_id = entry.tx_id.clone();
        let promo_code = entry.promo_code.clone();
        let qr_code = entry.qr_code.clone();
        let host_id = codes::host_id_for_codes(promo_code.as_deref(), qr_code.as_deref(), &mut tx).await?;
        let inserted = ledger::insert_if_absent(entry, host_id.as_deref(), &mut tx).await?;
        if inserted {
            if let Some(code) = &promo_code {
                codes::increment_usage(code, &mut tx).await?;
            }
            if let Some(code) = &qr_code {
                codes::increment_conversions(code, &mut tx).await?;
            }
            debug!("🗃️ Transaction {tx_id} has been recorded in the commission ledger");
        } else {
            debug!("🗃️ Transaction {tx_id} is already in the commission ledger. No action to take");
        }
        tx.commit().await?;
        Ok(inserted)
    }

    async fn insert_promo_code(&self, code: NewPromoCode) -> Result<PromoCode, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let promo = codes::insert_promo_code(code, &mut conn).await?;
        debug!("🗃️ Promo code {} created for host {}", promo.code, promo.host_id);
        Ok(promo)
    }

    async fn insert_qr_code(&self, code: NewQrCode) -> Result<QrCode, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let qr = codes::insert_qr_code(code, &mut conn).await?;
        debug!("🗃️ QR code {} created for host {}", qr.code, qr.host_id);
        Ok(qr)
    }

    async fn mark_paid(&self, tx_id: &str) -> Result<LedgerEntry, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let entry = ledger::mark_paid(tx_id, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Payout for transaction {tx_id} has been marked as paid");
        Ok(entry)
    }
}

impl LedgerManagement for SqliteDatabase {
    async fn fetch_ledger_entry(&self, tx_id: &str) -> Result<Option<LedgerEntry>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        ledger::fetch_entry(tx_id, &mut conn).await
    }

    async fn fetch_entries_for_host(&self, host_id: &str) -> Result<Vec<LedgerEntry>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        ledger::fetch_entries_for_host(host_id, &mut conn).await
    }

    async fn host_commission_total(&self, host_id: &str) -> Result<Cents, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        ledger::host_commission_total(host_id, &mut conn).await
    }

    async fn fetch_promo_code(&self, code: &str) -> Result<Option<PromoCode>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        codes::fetch_promo_code(code, &mut conn).await
    }

    async fn fetch_qr_code(&self, code: &str) -> Result<Option<QrCode>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        codes::fetch_qr_code(code, &mut conn).await
    }
}

impl SqliteDatabase {
    /// Creates a new database API object
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
