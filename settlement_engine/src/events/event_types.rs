use serde::{Deserialize, Serialize};
use wsp_common::Cents;

use crate::traits::TransferRecord;

/// Fired after a payment has been settled, with the full set of transfer legs that exist for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementCompletedEvent {
    pub payment_id: String,
    pub transfers: Vec<TransferRecord>,
}

impl SettlementCompletedEvent {
    pub fn new(payment_id: String, transfers: Vec<TransferRecord>) -> Self {
        Self { payment_id, transfers }
    }
}

/// Fired when the optional host leg of a settlement could not be created. The settlement itself still
/// counts as (degraded) success; operators follow up manually via the retry endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostTransferFailedEvent {
    pub payment_id: String,
    pub host_account: String,
    pub amount: Cents,
    pub reason: String,
}
