//! The Stripe-backed [`PaymentGateway`].
//!
//! Payment intents stand in for payments; transfers to connected accounts stand in for the settlement
//! legs, grouped under the source payment intent id via `transfer_group`.
use std::collections::HashMap;

use settlement_engine::{
    db_types::TransferRole,
    traits::{GatewayError, NewPaymentRequest, PaymentGateway, PaymentRecord, PaymentStatus, TransferRecord, TransferRequest},
};
use stripe_tools::{
    data_objects::{NewPaymentIntent, NewTransfer, PaymentIntent, PaymentIntentStatus, Transfer},
    StripeApi,
    StripeApiError,
    StripeConfig,
};
use wsp_common::Cents;

/// Metadata key carrying which leg a transfer pays, so that listings can tell the legs apart.
const ROLE_METADATA_KEY: &str = "role";

#[derive(Clone)]
pub struct StripeGateway {
    api: StripeApi,
    minimum_charge: Cents,
}

impl StripeGateway {
    pub fn new(config: StripeConfig, minimum_charge: Cents) -> Result<Self, StripeApiError> {
        let api = StripeApi::new(config)?;
        Ok(Self { api, minimum_charge })
    }
}

impl PaymentGateway for StripeGateway {
    async fn create_payment(&self, request: NewPaymentRequest) -> Result<PaymentRecord, GatewayError> {
        let new = NewPaymentIntent {
            amount: request.amount,
            currency: request.currency,
            description: request.description,
            metadata: request.metadata,
        };
        let pi = self.api.create_payment_intent(new).await.map_err(to_gateway_error)?;
        Ok(payment_record(pi))
    }

    async fn fetch_payment(&self, payment_id: &str) -> Result<PaymentRecord, GatewayError> {
        let pi = self.api.get_payment_intent(payment_id).await.map_err(|e| match e {
            StripeApiError::QueryError { status: 404, .. } => GatewayError::PaymentNotFound(payment_id.to_string()),
            e => to_gateway_error(e),
        })?;
        Ok(payment_record(pi))
    }

    async fn create_transfer(&self, request: TransferRequest) -> Result<TransferRecord, GatewayError> {
        let mut metadata = HashMap::with_capacity(1);
        metadata.insert(ROLE_METADATA_KEY.to_string(), request.role.to_string());
        let new = NewTransfer {
            amount: request.amount,
            currency: request.currency,
            destination: request.destination,
            transfer_group: request.group_key,
            metadata,
        };
        let transfer = self.api.create_transfer(new).await.map_err(to_gateway_error)?;
        Ok(transfer_record(transfer))
    }

    async fn transfers_for_group(&self, group_key: &str) -> Result<Vec<TransferRecord>, GatewayError> {
        let transfers = self.api.list_transfers(group_key).await.map_err(to_gateway_error)?;
        Ok(transfers.into_iter().map(transfer_record).collect())
    }

    fn minimum_charge(&self) -> Cents {
        self.minimum_charge
    }
}

fn payment_record(pi: PaymentIntent) -> PaymentRecord {
    let status = match pi.status {
        PaymentIntentStatus::Succeeded => PaymentStatus::Succeeded,
        PaymentIntentStatus::Canceled => PaymentStatus::Failed,
        _ => PaymentStatus::Pending,
    };
    PaymentRecord {
        id: pi.id,
        amount: pi.amount,
        currency: pi.currency,
        status,
        client_token: pi.client_secret,
        metadata: pi.metadata,
    }
}

fn transfer_record(transfer: Transfer) -> TransferRecord {
    let role = transfer.metadata.get(ROLE_METADATA_KEY).and_then(|s| s.parse::<TransferRole>().ok());
    TransferRecord {
        id: transfer.id,
        amount: transfer.amount,
        currency: transfer.currency,
        destination: transfer.destination,
        group_key: transfer.transfer_group.unwrap_or_default(),
        role,
    }
}

fn to_gateway_error(e: StripeApiError) -> GatewayError {
    match e {
        StripeApiError::QueryError { status, message } if (400..500).contains(&status) => {
            GatewayError::Rejected(format!("{status}: {message}"))
        },
        e => GatewayError::RequestFailed(e.to_string()),
    }
}
