//! Commission split arithmetic.
//!
//! The commission model: the platform takes 10% of the gross, a referring host (when present) takes 5%, and
//! the provider receives the remainder. All arithmetic is integer arithmetic in minor currency units; the
//! provider share is computed by subtraction rather than as a percentage, so the three shares always sum to
//! the gross exactly and every rounding remainder lands with the provider.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wsp_common::Cents;

/// Platform commission, in basis points.
pub const PLATFORM_FEE_BPS: i64 = 1_000;
/// Host referral commission, in basis points. Only applied when the sale carries a referring host.
pub const HOST_FEE_BPS: i64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionSplit {
    pub platform: Cents,
    pub provider: Cents,
    pub host: Cents,
    pub total: Cents,
}

#[derive(Debug, Clone, Error)]
pub enum CommissionError {
    #[error("Cannot split the amount ({0})")]
    InvalidAmount(Cents),
}

/// Rounds `gross * bps / 10_000` to the nearest minor unit, halves away from zero. `None` when the
/// intermediate product does not fit in an i64.
fn share(gross: i64, bps: i64) -> Option<i64> {
    gross.checked_mul(bps).map(|p| (p + 5_000) / 10_000)
}

/// Computes the three-way split of `gross` between platform, provider and host.
///
/// Pure and deterministic. Fails on a negative gross amount, or one so large that the basis-point
/// arithmetic would overflow.
pub fn calculate_split(gross: Cents, has_referring_host: bool) -> Result<CommissionSplit, CommissionError> {
    if gross.is_negative() {
        return Err(CommissionError::InvalidAmount(gross));
    }
    let platform = share(gross.value(), PLATFORM_FEE_BPS).ok_or(CommissionError::InvalidAmount(gross))?;
    let host = if has_referring_host {
        share(gross.value(), HOST_FEE_BPS).ok_or(CommissionError::InvalidAmount(gross))?
    } else {
        0
    };
    let provider = gross.value() - platform - host;
    Ok(CommissionSplit {
        platform: Cents::from(platform),
        provider: Cents::from(provider),
        host: Cents::from(host),
        total: gross,
    })
}
