use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;
use wsp_common::Cents;

use crate::commission::CommissionSplit;

//--------------------------------------    PayoutStatus     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum PayoutStatus {
    /// The commission has been recorded but the host has not been paid out yet.
    Pending,
    /// The host payout for this commission has been completed.
    Paid,
}

impl Display for PayoutStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayoutStatus::Pending => write!(f, "Pending"),
            PayoutStatus::Paid => write!(f, "Paid"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid payout status: {0}")]
pub struct PayoutStatusConversionError(String);

impl FromStr for PayoutStatus {
    type Err = PayoutStatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Paid" => Ok(Self::Paid),
            s => Err(PayoutStatusConversionError(s.to_string())),
        }
    }
}

impl From<String> for PayoutStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid payout status: {value}. But this conversion cannot fail. Defaulting to Pending");
            PayoutStatus::Pending
        })
    }
}

//--------------------------------------    TransferRole     ---------------------------------------------------------
/// Which party a transfer leg pays. The provider leg is mandatory; the host leg is best-effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferRole {
    Provider,
    Host,
}

impl Display for TransferRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferRole::Provider => write!(f, "provider"),
            TransferRole::Host => write!(f, "host"),
        }
    }
}

impl FromStr for TransferRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "provider" => Ok(Self::Provider),
            "host" => Ok(Self::Host),
            _ => Err(()),
        }
    }
}

//--------------------------------------    LedgerEntry      ---------------------------------------------------------
/// One durable commission record for a completed marketplace transaction. At most one row exists per
/// transaction id; the uniqueness constraint in the schema is what makes reconciliation idempotent.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i64,
    pub tx_id: String,
    pub provider_id: String,
    pub host_id: Option<String>,
    pub promo_code: Option<String>,
    pub qr_code: Option<String>,
    pub gross: Cents,
    pub platform_amount: Cents,
    pub provider_amount: Cents,
    pub host_amount: Cents,
    pub currency: String,
    pub payout_status: PayoutStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------   NewLedgerEntry    ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewLedgerEntry {
    /// The upstream transaction id. The natural unique key for the ledger.
    pub tx_id: String,
    pub provider_id: String,
    pub promo_code: Option<String>,
    pub qr_code: Option<String>,
    pub gross: Cents,
    pub platform_amount: Cents,
    pub provider_amount: Cents,
    pub host_amount: Cents,
    pub currency: String,
}

impl NewLedgerEntry {
    pub fn new(tx_id: &str, provider_id: &str, split: &CommissionSplit, currency: &str) -> Self {
        Self {
            tx_id: tx_id.to_string(),
            provider_id: provider_id.to_string(),
            promo_code: None,
            qr_code: None,
            gross: split.total,
            platform_amount: split.platform,
            provider_amount: split.provider,
            host_amount: split.host,
            currency: currency.to_string(),
        }
    }

    pub fn with_promo_code(mut self, code: &str) -> Self {
        self.promo_code = Some(code.to_string());
        self
    }

    pub fn with_qr_code(mut self, code: &str) -> Self {
        self.qr_code = Some(code.to_string());
        self
    }
}

//--------------------------------------     PromoCode       ---------------------------------------------------------
/// A host's promo code. The usage counter is bumped by reconciliation only, once per completed transaction,
/// and never decremented.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PromoCode {
    pub id: i64,
    pub code: String,
    pub host_id: String,
    pub usage_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPromoCode {
    pub code: String,
    pub host_id: String,
}

//--------------------------------------      QrCode         ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct QrCode {
    pub id: i64,
    pub code: String,
    pub host_id: String,
    pub conversion_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQrCode {
    pub code: String,
    pub host_id: String,
}
