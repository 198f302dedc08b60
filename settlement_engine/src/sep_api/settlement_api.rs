use log::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    db_types::TransferRole,
    events::{EventProducers, HostTransferFailedEvent, SettlementCompletedEvent},
    traits::{GatewayError, MetadataError, PaymentGateway, PaymentStatus, SplitMetadata, TransferRecord, TransferRequest},
};

/// `SettlementApi` turns one succeeded gateway payment into the per-party transfer legs, at most once per
/// payment.
///
/// The gateway's grouped-transfer listing is the idempotency guard: all legs for a payment are tagged with
/// the payment id as their group key, and the group is consulted before anything is created. This is
/// check-then-act, so a razor-thin race between two concurrent invocations can slip through; the group key
/// still ties every leg to its payment, so the duplicates are detectable and reconcilable at the gateway.
pub struct SettlementApi<G> {
    gateway: G,
    producers: EventProducers,
}

/// What `settle_payment` found and did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementOutcome {
    pub payment_id: String,
    /// All transfer legs that exist for the payment, created or pre-existing.
    pub transfers: Vec<TransferRecord>,
    /// True when the group already held transfers and nothing new was created.
    pub already_settled: bool,
    /// Set when the host leg was due but could not be created. The settlement still counts as success.
    pub host_error: Option<String>,
}

#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("Payment {payment_id} has status {status} and cannot be settled")]
    PaymentNotTerminal { payment_id: String, status: PaymentStatus },
    #[error("Payment metadata does not carry a valid split. {0}")]
    MissingMetadata(#[from] MetadataError),
    #[error("The provider transfer for payment {payment_id} failed. {source}")]
    MandatoryTransferFailed { payment_id: String, source: GatewayError },
    #[error("Gateway error. {0}")]
    GatewayError(#[from] GatewayError),
}

impl<G> SettlementApi<G> {
    pub fn new(gateway: G, producers: EventProducers) -> Self {
        Self { gateway, producers }
    }
}

impl<G> SettlementApi<G>
where G: PaymentGateway
{
    /// Settles a succeeded payment by creating its transfer legs.
    ///
    /// The steps, in order:
    /// 1. fetch the payment and require `Succeeded` status;
    /// 2. decode the split from the payment's metadata;
    /// 3. list the transfers already grouped under the payment id. If any exist, return them unchanged;
    /// 4. create the provider leg. On failure, abort; nothing else is attempted;
    /// 5. if a host share is due, create the host leg. On failure, log it, record it on the outcome, fire
    ///    the host-transfer-failed hook, and still return success.
    ///
    /// A failed host leg is never retried automatically. Operators re-run it via
    /// [`Self::settle_payment_with_host_retry`].
    pub async fn settle_payment(&self, payment_id: &str) -> Result<SettlementOutcome, SettlementError> {
        self.settle(payment_id, false).await
    }

    /// As [`Self::settle_payment`], except that when the group already holds a provider leg but the due
    /// host leg is missing, only the missing host leg is attempted instead of returning unchanged.
    pub async fn settle_payment_with_host_retry(&self, payment_id: &str) -> Result<SettlementOutcome, SettlementError> {
        self.settle(payment_id, true).await
    }

    async fn settle(&self, payment_id: &str, retry_host: bool) -> Result<SettlementOutcome, SettlementError> {
        let payment = self.gateway.fetch_payment(payment_id).await?;
        if payment.status != PaymentStatus::Succeeded {
            info!("💸️ Payment [{payment_id}] is {} and cannot be settled yet", payment.status);
            return Err(SettlementError::PaymentNotTerminal {
                payment_id: payment_id.to_string(),
                status: payment.status,
            });
        }
        let meta = SplitMetadata::from_map(&payment.metadata)?;
        let host_due = meta.host_account.is_some() && meta.host_amount.is_positive();
        let mut transfers = self.gateway.transfers_for_group(payment_id).await?;
        if !transfers.is_empty() {
            let host_missing = host_due && !transfers.iter().any(|t| self.is_host_leg(t, &meta));
            if !(retry_host && host_missing) {
                debug!("💸️ Payment [{payment_id}] already has {} transfer(s). Nothing to do.", transfers.len());
                return Ok(SettlementOutcome {
                    payment_id: payment_id.to_string(),
                    transfers,
                    already_settled: true,
                    host_error: None,
                });
            }
            info!("💸️ Retrying the missing host leg for payment [{payment_id}]");
            let host_error = self.try_host_leg(payment_id, &payment.currency, &meta, &mut transfers).await;
            return Ok(SettlementOutcome {
                payment_id: payment_id.to_string(),
                transfers,
                already_settled: false,
                host_error,
            });
        }

        // Provider leg first. A failure here is fatal and leaves the group empty, so a later retry starts
        // from scratch.
        let provider_request = TransferRequest {
            amount: meta.provider_amount,
            currency: payment.currency.clone(),
            destination: meta.provider_account.clone(),
            group_key: payment_id.to_string(),
            role: TransferRole::Provider,
        };
        let provider_leg = self.gateway.create_transfer(provider_request).await.map_err(|source| {
            error!("💸️ Provider transfer for payment [{payment_id}] failed. {source}");
            SettlementError::MandatoryTransferFailed { payment_id: payment_id.to_string(), source }
        })?;
        debug!("💸️ Provider leg [{}] of {} created for payment [{payment_id}]", provider_leg.id, provider_leg.amount);
        transfers.push(provider_leg);

        let host_error = if host_due {
            self.try_host_leg(payment_id, &payment.currency, &meta, &mut transfers).await
        } else {
            None
        };
        self.call_settlement_completed_hook(payment_id, &transfers).await;
        Ok(SettlementOutcome { payment_id: payment_id.to_string(), transfers, already_settled: false, host_error })
    }

    /// Creates the host leg, best-effort. Returns the failure reason instead of an error.
    async fn try_host_leg(
        &self,
        payment_id: &str,
        currency: &str,
        meta: &SplitMetadata,
        transfers: &mut Vec<TransferRecord>,
    ) -> Option<String> {
        let host_account = meta.host_account.as_deref()?;
        let request = TransferRequest {
            amount: meta.host_amount,
            currency: currency.to_string(),
            destination: host_account.to_string(),
            group_key: payment_id.to_string(),
            role: TransferRole::Host,
        };
        match self.gateway.create_transfer(request).await {
            Ok(leg) => {
                debug!("💸️ Host leg [{}] of {} created for payment [{payment_id}]", leg.id, leg.amount);
                transfers.push(leg);
                None
            },
            Err(e) => {
                warn!("💸️ Host transfer for payment [{payment_id}] failed. The settlement still stands. {e}");
                let event = HostTransferFailedEvent {
                    payment_id: payment_id.to_string(),
                    host_account: host_account.to_string(),
                    amount: meta.host_amount,
                    reason: e.to_string(),
                };
                self.call_host_transfer_failed_hook(event).await;
                Some(e.to_string())
            },
        }
    }

    fn is_host_leg(&self, transfer: &TransferRecord, meta: &SplitMetadata) -> bool {
        match transfer.role {
            Some(role) => role == TransferRole::Host,
            // Transfers created outside this system carry no role tag. Fall back to the destination.
            None => meta.host_account.as_deref() == Some(transfer.destination.as_str()),
        }
    }

    async fn call_settlement_completed_hook(&self, payment_id: &str, transfers: &[TransferRecord]) {
        for emitter in &self.producers.settlement_completed_producer {
            debug!("💸️ Notifying settlement completed hook subscribers");
            let event = SettlementCompletedEvent::new(payment_id.to_string(), transfers.to_vec());
            emitter.publish_event(event).await;
        }
    }

    async fn call_host_transfer_failed_hook(&self, event: HostTransferFailedEvent) {
        for emitter in &self.producers.host_transfer_failed_producer {
            debug!("💸️ Notifying host transfer failed hook subscribers");
            emitter.publish_event(event.clone()).await;
        }
    }
}
