use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wsp_common::Cents;

//--------------------------------------   TransactionState   --------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionState {
    Inquiry,
    PendingPayment,
    Preauthorized,
    Accepted,
    Declined,
    Delivered,
    Completed,
    Canceled,
}

//--------------------------------------   TransactionEvent   --------------------------------------------------------
/// One entry from the marketplace core's event feed. Events are delivered at least once; consumers must be
/// idempotent with respect to the transaction id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionEvent {
    pub id: String,
    pub event_type: String,
    pub created_at: DateTime<Utc>,
    pub transaction: TransactionResource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionResource {
    pub id: String,
    pub state: TransactionState,
    pub last_transition: String,
    /// Gross amount paid by the customer, minor currency units.
    pub gross_amount: Cents,
    pub currency: String,
    /// The experience provider's party id.
    pub provider_id: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    /// Promo code used at checkout, if any. Presence of a promo code is what qualifies a host commission.
    #[serde(default)]
    pub promo_code: Option<String>,
    /// QR code that referred the sale, if any.
    #[serde(default)]
    pub qr_code: Option<String>,
}

impl TransactionEvent {
    /// Only fully-completed transactions earn commission and bump referral counters.
    pub fn is_completed(&self) -> bool {
        self.transaction.state == TransactionState::Completed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventPage {
    pub data: Vec<TransactionEvent>,
    #[serde(default)]
    pub has_more: bool,
}
