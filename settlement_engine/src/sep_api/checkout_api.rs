use log::*;
use thiserror::Error;
use wsp_common::Cents;

use crate::{
    commission::{calculate_split, CommissionError},
    traits::{GatewayError, NewPaymentRequest, PaymentGateway, PaymentRecord, SplitMetadata},
};

/// `CheckoutApi` creates the single gross payment for a sale, attaching the commission split to the payment
/// as metadata so that settlement can run later without any local state.
#[derive(Debug, Clone)]
pub struct CheckoutApi<G> {
    gateway: G,
}

/// Everything the checkout flow needs to know about a sale.
#[derive(Debug, Clone)]
pub struct NewCharge {
    pub amount: Cents,
    pub currency: String,
    /// Gateway account id of the experience provider.
    pub provider_account: String,
    /// Gateway account id of the referring host, when the sale carries one.
    pub host_account: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    #[error("The amount {amount} is below the gateway minimum of {minimum}")]
    AmountTooSmall { amount: Cents, minimum: Cents },
    #[error("Could not calculate the commission split. {0}")]
    CommissionError(#[from] CommissionError),
    #[error("The gateway could not create the payment. {0}")]
    GatewayError(#[from] GatewayError),
}

impl<G> CheckoutApi<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }
}

impl<G> CheckoutApi<G>
where G: PaymentGateway
{
    /// Creates a new gateway payment for the gross amount of the charge.
    ///
    /// The commission split is computed up front and travels on the payment's metadata; nothing is
    /// persisted locally. The gateway stays authoritative for the payment's status.
    pub async fn create_payment(&self, charge: NewCharge) -> Result<PaymentRecord, CheckoutError> {
        let minimum = self.gateway.minimum_charge();
        if charge.amount < minimum {
            return Err(CheckoutError::AmountTooSmall { amount: charge.amount, minimum });
        }
        let split = calculate_split(charge.amount, charge.host_account.is_some())?;
        let metadata = SplitMetadata {
            provider_account: charge.provider_account,
            host_account: charge.host_account,
            provider_amount: split.provider,
            host_amount: split.host,
            description: charge.description.clone(),
        };
        let request = NewPaymentRequest {
            amount: charge.amount,
            currency: charge.currency,
            description: Some(charge.description),
            metadata: metadata.to_map(),
        };
        let payment = self.gateway.create_payment(request).await?;
        debug!(
            "🛒️ Payment [{}] of {} created. Provider nets {}, platform takes {}, host takes {}.",
            payment.id, split.total, split.provider, split.platform, split.host
        );
        Ok(payment)
    }
}
