use thiserror::Error;
use wsp_common::Cents;

use crate::db_types::{LedgerEntry, NewLedgerEntry, NewPromoCode, NewQrCode, PromoCode, QrCode};

/// Write side of the commission ledger. Owned exclusively by the reconciliation poller (plus code creation,
/// which happens ahead of time); no other component may mutate ledger rows or counters.
#[allow(async_fn_in_trait)]
pub trait LedgerDatabase: Clone {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Records a completed transaction in a single atomic transaction:
    /// * inserts the commission ledger row, keyed by the upstream transaction id. If a row for that id
    ///   already exists the whole call is a no-op and returns `false`;
    /// * only when the row was newly inserted, increments the promo-code usage counter and the QR-code
    ///   conversion counter for the codes carried on the entry, and stamps the row with the referring
    ///   host id resolved from those codes.
    ///
    /// The insert-or-ignore on the unique transaction id is what makes redelivered events and concurrent
    /// pollers safe; counters piggyback on it so they are bumped exactly once per transaction.
    async fn apply_completed_transaction(&self, entry: NewLedgerEntry) -> Result<bool, LedgerError>;

    /// Creates a promo code for a host. Fails if the code already exists.
    async fn insert_promo_code(&self, code: NewPromoCode) -> Result<PromoCode, LedgerError>;

    /// Creates a QR code for a host. Fails if the code already exists.
    async fn insert_qr_code(&self, code: NewQrCode) -> Result<QrCode, LedgerError>;

    /// Marks the ledger row's payout as completed. `Pending` -> `Paid`, exactly once.
    async fn mark_paid(&self, tx_id: &str) -> Result<LedgerEntry, LedgerError>;
}

/// Read side of the ledger, used by dashboards and operator tooling. Never mutates anything.
#[allow(async_fn_in_trait)]
pub trait LedgerManagement: Clone {
    async fn fetch_ledger_entry(&self, tx_id: &str) -> Result<Option<LedgerEntry>, LedgerError>;

    /// All commission rows that reference the given host, newest first.
    async fn fetch_entries_for_host(&self, host_id: &str) -> Result<Vec<LedgerEntry>, LedgerError>;

    /// Sum of the host's commission amounts across all recorded transactions.
    async fn host_commission_total(&self, host_id: &str) -> Result<Cents, LedgerError>;

    async fn fetch_promo_code(&self, code: &str) -> Result<Option<PromoCode>, LedgerError>;

    async fn fetch_qr_code(&self, code: &str) -> Result<Option<QrCode>, LedgerError>;
}

#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    #[error("We have an internal database engine error (configuration/uptime etc.): {0}")]
    DatabaseError(String),
    #[error("Cannot insert code, since it already exists: {0}")]
    CodeAlreadyExists(String),
    #[error("There is no ledger entry for transaction {0}")]
    EntryNotFound(String),
    #[error("The payout for transaction {0} has already been marked as paid")]
    AlreadyPaid(String),
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        LedgerError::DatabaseError(e.to_string())
    }
}
