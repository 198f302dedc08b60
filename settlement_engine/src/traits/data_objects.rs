use std::{collections::HashMap, fmt::Display};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wsp_common::Cents;

use crate::db_types::TransferRole;

//--------------------------------------   PaymentStatus     ---------------------------------------------------------
/// The engine's view of a gateway payment's status. Concrete gateways map their own richer state machines
/// onto these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Failed,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "Pending"),
            PaymentStatus::Succeeded => write!(f, "Succeeded"),
            PaymentStatus::Failed => write!(f, "Failed"),
        }
    }
}

//--------------------------------------   PaymentRecord     ---------------------------------------------------------
/// One gross charge at the gateway. Created at checkout; the status transitions exactly once from pending
/// to a terminal state, driven by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: String,
    pub amount: Cents,
    pub currency: String,
    pub status: PaymentStatus,
    /// Client-facing confirmation token, handed to the checkout front end.
    pub client_token: Option<String>,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct NewPaymentRequest {
    pub amount: Cents,
    pub currency: String,
    pub description: Option<String>,
    pub metadata: HashMap<String, String>,
}

//--------------------------------------   TransferRecord    ---------------------------------------------------------
/// One payout leg to one party, grouped under its source payment's id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRecord {
    pub id: String,
    pub amount: Cents,
    pub currency: String,
    pub destination: String,
    pub group_key: String,
    /// Which leg this transfer pays. `None` for transfers created outside this system.
    pub role: Option<TransferRole>,
}

#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub amount: Cents,
    pub currency: String,
    pub destination: String,
    pub group_key: String,
    pub role: TransferRole,
}

//--------------------------------------   SplitMetadata     ---------------------------------------------------------
pub const META_PROVIDER_ACCOUNT: &str = "provider_account";
pub const META_HOST_ACCOUNT: &str = "host_account";
pub const META_PROVIDER_AMOUNT: &str = "provider_amount";
pub const META_HOST_AMOUNT: &str = "host_amount";
pub const META_DESCRIPTION: &str = "description";

/// The commission split and party identifiers, as carried on the gateway payment's metadata bag. The
/// metadata is the only channel carrying the split from checkout to settlement, so it must round-trip
/// through a flat string-keyed map without loss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitMetadata {
    pub provider_account: String,
    pub host_account: Option<String>,
    pub provider_amount: Cents,
    pub host_amount: Cents,
    pub description: String,
}

#[derive(Debug, Clone, Error)]
pub enum MetadataError {
    #[error("The payment metadata is missing the '{0}' entry")]
    MissingEntry(&'static str),
    #[error("The payment metadata entry '{key}' does not hold a valid amount: {value}")]
    InvalidAmount { key: &'static str, value: String },
}

impl SplitMetadata {
    pub fn to_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::with_capacity(5);
        map.insert(META_PROVIDER_ACCOUNT.to_string(), self.provider_account.clone());
        if let Some(host) = &self.host_account {
            map.insert(META_HOST_ACCOUNT.to_string(), host.clone());
        }
        map.insert(META_PROVIDER_AMOUNT.to_string(), self.provider_amount.value().to_string());
        map.insert(META_HOST_AMOUNT.to_string(), self.host_amount.value().to_string());
        map.insert(META_DESCRIPTION.to_string(), self.description.clone());
        map
    }

    pub fn from_map(map: &HashMap<String, String>) -> Result<Self, MetadataError> {
        let provider_account =
            map.get(META_PROVIDER_ACCOUNT).ok_or(MetadataError::MissingEntry(META_PROVIDER_ACCOUNT))?.clone();
        let host_account = map.get(META_HOST_ACCOUNT).cloned();
        let provider_amount = parse_amount(map, META_PROVIDER_AMOUNT)?;
        let host_amount = parse_amount(map, META_HOST_AMOUNT)?;
        let description = map.get(META_DESCRIPTION).cloned().unwrap_or_default();
        Ok(Self { provider_account, host_account, provider_amount, host_amount, description })
    }
}

fn parse_amount(map: &HashMap<String, String>, key: &'static str) -> Result<Cents, MetadataError> {
    let value = map.get(key).ok_or(MetadataError::MissingEntry(key))?;
    value
        .parse::<i64>()
        .map(Cents::from)
        .map_err(|_| MetadataError::InvalidAmount { key, value: value.clone() })
}

//--------------------------------------     FeedEvent       ---------------------------------------------------------
/// The engine's view of one upstream transaction-transitioned event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEvent {
    pub event_id: String,
    pub created_at: DateTime<Utc>,
    /// The upstream transaction id. The idempotency key for all reconciliation writes.
    pub tx_id: String,
    /// Whether the transaction has reached the fully-completed state.
    pub completed: bool,
    pub gross: Cents,
    pub currency: String,
    pub provider_id: String,
    pub promo_code: Option<String>,
    pub qr_code: Option<String>,
}

//--------------------------------------    CycleSummary     ---------------------------------------------------------
/// The outcome of one reconciliation cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CycleSummary {
    /// Number of events returned by the feed.
    pub events: usize,
    /// Events whose transaction had reached the completed state.
    pub completed: usize,
    /// Completed events that produced a new ledger row (and counter bumps).
    pub applied: usize,
    /// Completed events whose ledger row already existed. Expected under at-least-once delivery.
    pub duplicates: usize,
    /// Events that failed to process and were skipped.
    pub failures: usize,
}
