use std::fmt::Display;

use serde::{Deserialize, Serialize};
use settlement_engine::db_types::LedgerEntry;
use wsp_common::Cents;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

/// Request body for the checkout endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Gross amount in minor currency units.
    pub amount: Cents,
    pub currency: String,
    pub provider_account: String,
    #[serde(default)]
    pub host_account: Option<String>,
    #[serde(default)]
    pub description: String,
}

/// What the checkout front end needs to confirm the payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub payment_id: String,
    pub client_token: Option<String>,
    pub amount: Cents,
    pub currency: String,
}

/// The slice of a Stripe event envelope this server cares about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeEventData {
    pub object: StripeEventObject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeEventObject {
    pub id: String,
}

pub const PAYMENT_INTENT_SUCCEEDED: &str = "payment_intent.succeeded";

/// A host's commission statement: every ledger row credited to them, plus the running total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostCommissionSummary {
    pub host_id: String,
    pub total: Cents,
    pub entries: Vec<LedgerEntry>,
}

/// Query parameters for the manual settlement endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettleParams {
    #[serde(default)]
    pub retry_host: bool,
}
