//! Request handler definitions
//!
//! Define each route and its handler here. Handlers that are more than a line or two MUST go into a
//! separate module. Keep this module neat and tidy 🙏
//!
//! Handlers never block the worker thread; every gateway and database call is awaited.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use settlement_engine::{
    db_types::{NewPromoCode, NewQrCode},
    traits::{LedgerDatabase, LedgerManagement, PaymentGateway},
    CheckoutApi,
    LedgerApi,
    NewCharge,
    SettlementApi,
    SettlementError,
};

use crate::{
    data_objects::{
        CheckoutRequest,
        CheckoutResponse,
        HostCommissionSummary,
        JsonResponse,
        SettleParams,
        StripeEvent,
        PAYMENT_INTENT_SUCCEEDED,
    },
    errors::ServerError,
};

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------  Checkout  ----------------------------------------------------
/// Creates the single gross payment for a sale. The commission split is computed here and attached to the
/// payment as metadata; the response carries what the front end needs to confirm the payment.
pub async fn checkout<G: PaymentGateway>(
    body: web::Json<CheckoutRequest>,
    api: web::Data<CheckoutApi<G>>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    trace!("💻️ Received checkout request for {} {}", request.amount, request.currency);
    let charge = NewCharge {
        amount: request.amount,
        currency: request.currency,
        provider_account: request.provider_account,
        host_account: request.host_account,
        description: request.description,
    };
    let payment = api.create_payment(charge).await?;
    let response = CheckoutResponse {
        payment_id: payment.id,
        client_token: payment.client_token,
        amount: payment.amount,
        currency: payment.currency,
    };
    Ok(HttpResponse::Ok().json(response))
}

//----------------------------------------------  Webhook  -----------------------------------------------------
/// Stripe webhook receiver. Signature verification happens in the HMAC middleware wrapping this scope.
///
/// Only `payment_intent.succeeded` triggers settlement. A mandatory-leg failure is returned as a 500 so
/// that Stripe redelivers the event; every other outcome, including a failed host leg, is acknowledged
/// with a 200 so that the delivery is not retried.
pub async fn stripe_webhook<G: PaymentGateway>(
    body: web::Json<StripeEvent>,
    api: web::Data<SettlementApi<G>>,
) -> Result<HttpResponse, ServerError> {
    let event = body.into_inner();
    debug!("💻️ Received webhook event {} ({})", event.id, event.event_type);
    if event.event_type != PAYMENT_INTENT_SUCCEEDED {
        return Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Ignoring event {}", event.event_type))));
    }
    let payment_id = event.data.object.id;
    match api.settle_payment(&payment_id).await {
        Ok(outcome) => {
            let message = match &outcome.host_error {
                Some(reason) => format!("Payment {payment_id} settled, but the host leg failed: {reason}"),
                None => format!("Payment {payment_id} settled"),
            };
            Ok(HttpResponse::Ok().json(JsonResponse::success(message)))
        },
        Err(e @ SettlementError::MandatoryTransferFailed { .. }) => {
            error!("💻️ Webhook settlement for {payment_id} failed on the provider leg. Asking for redelivery. {e}");
            Err(e.into())
        },
        Err(e) => {
            warn!("💻️ Webhook settlement for {payment_id} was not performed. {e}");
            Ok(HttpResponse::Ok().json(JsonResponse::failure(e)))
        },
    }
}

//----------------------------------------------  Settlement  --------------------------------------------------
/// Manual settlement endpoint for operators. With `?retry_host=true`, a group that already holds a provider
/// leg but is missing a due host leg gets just the host leg re-attempted.
pub async fn settle<G: PaymentGateway>(
    path: web::Path<String>,
    params: web::Query<SettleParams>,
    api: web::Data<SettlementApi<G>>,
) -> Result<HttpResponse, ServerError> {
    let payment_id = path.into_inner();
    debug!("💻️ Received manual settlement request for {payment_id} (retry_host: {})", params.retry_host);
    let outcome = if params.retry_host {
        api.settle_payment_with_host_retry(&payment_id).await?
    } else {
        api.settle_payment(&payment_id).await?
    };
    Ok(HttpResponse::Ok().json(outcome))
}

//----------------------------------------------  Commissions  -------------------------------------------------
pub async fn commission_by_tx<B: LedgerManagement>(
    path: web::Path<String>,
    api: web::Data<LedgerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let tx_id = path.into_inner();
    let entry = api
        .fetch_ledger_entry(&tx_id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("No commission record for transaction {tx_id}")))?;
    Ok(HttpResponse::Ok().json(entry))
}

pub async fn commissions_for_host<B: LedgerManagement>(
    path: web::Path<String>,
    api: web::Data<LedgerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let host_id = path.into_inner();
    let entries = api.fetch_entries_for_host(&host_id).await?;
    let total = api.host_commission_total(&host_id).await?;
    Ok(HttpResponse::Ok().json(HostCommissionSummary { host_id, total, entries }))
}

pub async fn mark_paid<B: LedgerDatabase>(
    path: web::Path<String>,
    api: web::Data<LedgerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let tx_id = path.into_inner();
    info!("💻️ Marking payout for transaction {tx_id} as paid");
    let entry = api.mark_paid(&tx_id).await?;
    Ok(HttpResponse::Ok().json(entry))
}

//----------------------------------------------  Referral codes  ----------------------------------------------
pub async fn get_promo_code<B: LedgerManagement>(
    path: web::Path<String>,
    api: web::Data<LedgerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let code = path.into_inner();
    let promo = api
        .fetch_promo_code(&code)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("No promo code {code}")))?;
    Ok(HttpResponse::Ok().json(promo))
}

pub async fn create_promo_code<B: LedgerDatabase>(
    body: web::Json<NewPromoCode>,
    api: web::Data<LedgerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let new_code = body.into_inner();
    info!("💻️ Creating promo code {} for host {}", new_code.code, new_code.host_id);
    let promo = api.create_promo_code(new_code).await?;
    Ok(HttpResponse::Ok().json(promo))
}

pub async fn get_qr_code<B: LedgerManagement>(
    path: web::Path<String>,
    api: web::Data<LedgerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let code = path.into_inner();
    let qr =
        api.fetch_qr_code(&code).await?.ok_or_else(|| ServerError::NoRecordFound(format!("No QR code {code}")))?;
    Ok(HttpResponse::Ok().json(qr))
}

pub async fn create_qr_code<B: LedgerDatabase>(
    body: web::Json<NewQrCode>,
    api: web::Data<LedgerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let new_code = body.into_inner();
    info!("💻️ Creating QR code {} for host {}", new_code.code, new_code.host_id);
    let qr = api.create_qr_code(new_code).await?;
    Ok(HttpResponse::Ok().json(qr))
}
