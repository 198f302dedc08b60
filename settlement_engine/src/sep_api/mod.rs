pub mod checkout_api;
pub mod ledger_api;
pub mod reconciliation_api;
pub mod settlement_api;
