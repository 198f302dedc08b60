use std::collections::HashMap;

use chrono::{serde::ts_seconds, DateTime, Utc};
use serde::{Deserialize, Serialize};
use wsp_common::Cents;

//----------------------------------------   PaymentIntent   ---------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub amount: Cents,
    pub currency: String,
    pub status: PaymentIntentStatus,
    /// The client-facing confirmation token. Present on creation; stripped from some read contexts.
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentIntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    RequiresCapture,
    Canceled,
    Succeeded,
}

impl PaymentIntentStatus {
    /// Whether the payment has reached its successful terminal state. Transfers may only be created against
    /// payments for which this returns true.
    pub fn is_succeeded(&self) -> bool {
        matches!(self, PaymentIntentStatus::Succeeded)
    }
}

impl std::fmt::Display for PaymentIntentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentIntentStatus::RequiresPaymentMethod => "requires_payment_method",
            PaymentIntentStatus::RequiresConfirmation => "requires_confirmation",
            PaymentIntentStatus::RequiresAction => "requires_action",
            PaymentIntentStatus::Processing => "processing",
            PaymentIntentStatus::RequiresCapture => "requires_capture",
            PaymentIntentStatus::Canceled => "canceled",
            PaymentIntentStatus::Succeeded => "succeeded",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct NewPaymentIntent {
    pub amount: Cents,
    pub currency: String,
    pub description: Option<String>,
    pub metadata: HashMap<String, String>,
}

//------------------------------------------   Transfer   ------------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transfer {
    pub id: String,
    pub amount: Cents,
    pub currency: String,
    /// The connected account receiving the funds.
    pub destination: String,
    /// The settlement group key. Always the source payment intent id in this system.
    #[serde(default)]
    pub transfer_group: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// When the transfer was created. Stripe sends this as epoch seconds.
    #[serde(with = "ts_seconds")]
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTransfer {
    pub amount: Cents,
    pub currency: String,
    pub destination: String,
    pub transfer_group: String,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferList {
    pub data: Vec<Transfer>,
    #[serde(default)]
    pub has_more: bool,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn deserialize_payment_intent() {
        let json = r#"{
            "id": "pi_3MtwBwLkdIwHu7ix28a3tqPa",
            "amount": 10000,
            "currency": "eur",
            "status": "succeeded",
            "client_secret": "pi_3MtwBwLkdIwHu7ix28a3tqPa_secret_YrKJUKribcBjcG8HVhfZluoGH",
            "metadata": { "provider_account": "acct_123" }
        }"#;
        let pi: PaymentIntent = serde_json::from_str(json).unwrap();
        assert_eq!(pi.amount.value(), 10_000);
        assert!(pi.status.is_succeeded());
        assert_eq!(pi.metadata.get("provider_account").map(String::as_str), Some("acct_123"));
        assert!(pi.description.is_none());
    }

    #[test]
    fn deserialize_transfer_list() {
        let json = r#"{
            "object": "list",
            "data": [{
                "id": "tr_1",
                "amount": 8500,
                "currency": "eur",
                "destination": "acct_123",
                "transfer_group": "pi_42",
                "created": 1680000000
            }],
            "has_more": false
        }"#;
        let list: TransferList = serde_json::from_str(json).unwrap();
        assert_eq!(list.data.len(), 1);
        assert_eq!(list.data[0].transfer_group.as_deref(), Some("pi_42"));
        // Epoch seconds from the wire become a proper timestamp.
        assert_eq!(list.data[0].created, DateTime::from_timestamp(1_680_000_000, 0).unwrap());
    }
}
