use thiserror::Error;

use crate::traits::{NewPaymentRequest, PaymentRecord, TransferRecord, TransferRequest};

/// The behaviour the engine needs from the payment gateway.
///
/// The gateway is the system of record for payment status and for "has this payment already been settled":
/// transfers are grouped under the source payment id, and [`PaymentGateway::transfers_for_group`] must be
/// consulted before any transfer is created.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway: Clone {
    /// Creates a single gateway payment for the gross amount, attaching the given metadata to the payment
    /// record itself so that the split survives round-trips through the gateway and its webhooks.
    async fn create_payment(&self, request: NewPaymentRequest) -> Result<PaymentRecord, GatewayError>;

    /// Fetches the payment record, including its metadata bag, by gateway payment id.
    async fn fetch_payment(&self, payment_id: &str) -> Result<PaymentRecord, GatewayError>;

    /// Creates one transfer leg, tagged with its settlement group key.
    async fn create_transfer(&self, request: TransferRequest) -> Result<TransferRecord, GatewayError>;

    /// Lists all transfers grouped under the given settlement group key.
    async fn transfers_for_group(&self, group_key: &str) -> Result<Vec<TransferRecord>, GatewayError>;

    /// The smallest amount the gateway will accept for a payment.
    fn minimum_charge(&self) -> wsp_common::Cents;
}

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("The payment {0} does not exist at the gateway")]
    PaymentNotFound(String),
    #[error("The gateway rejected the request. {0}")]
    Rejected(String),
    #[error("Error communicating with the gateway. {0}")]
    RequestFailed(String),
}
