//! # Wandero settlement engine
//!
//! The core library behind the settlement server. It is responsible for:
//! * computing the three-way commission split (platform / provider / host) for a gross amount,
//! * initiating gateway payments that carry the split forward as metadata,
//! * orchestrating the per-party fund transfers for a completed payment, at most once per payment,
//! * reconciling the marketplace core's transaction-event feed into the durable commission ledger and
//!   promo/QR referral counters.
//!
//! The engine talks to the outside world exclusively through the traits in [`traits`]; the sqlite ledger
//! backend in [`sqlite`] is the only concrete implementation shipped here. Gateway and event-feed
//! implementations live with the server binary.

pub mod commission;
pub mod db_types;
pub mod events;
pub mod traits;

mod sep_api;

pub use sep_api::{
    checkout_api::{CheckoutApi, CheckoutError, NewCharge},
    ledger_api::LedgerApi,
    reconciliation_api::{ReconciliationApi, ReconciliationError},
    settlement_api::{SettlementApi, SettlementError, SettlementOutcome},
};

#[cfg(feature = "sqlite")]
pub mod sqlite;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;

#[cfg(feature = "test_utils")]
pub mod test_utils;
