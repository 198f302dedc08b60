use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use serde_json::json;
use settlement_engine::{events::EventProducers, SettlementApi};
use wsp_common::Secret;

use super::{helpers::send_request, mocks::MockGateway};
use crate::{
    helpers::calculate_hmac,
    middleware::{HmacMiddlewareFactory, WEBHOOK_SIGNATURE_HEADER},
    routes::stripe_webhook,
};

const WEBHOOK_SECRET: &str = "whsec_test";

fn configure(gateway: MockGateway) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = SettlementApi::new(gateway, EventProducers::default());
        let hmac =
            HmacMiddlewareFactory::new(WEBHOOK_SIGNATURE_HEADER, Secret::new(WEBHOOK_SECRET.to_string()), true);
        let scope =
            web::scope("/stripe").wrap(hmac).route("/webhook", web::post().to(stripe_webhook::<MockGateway>));
        cfg.app_data(web::Data::new(api)).service(scope);
    }
}

fn event_body(event_type: &str, payment_id: &str) -> String {
    json!({ "id": "evt_1", "type": event_type, "data": { "object": { "id": payment_id } } }).to_string()
}

fn signed_request(body: &str, secret: &str) -> TestRequest {
    TestRequest::post()
        .uri("/stripe/webhook")
        .insert_header(("Content-Type", "application/json"))
        .insert_header((WEBHOOK_SIGNATURE_HEADER, calculate_hmac(secret, body.as_bytes())))
        .set_payload(body.to_string())
}

#[actix_web::test]
async fn tampered_payloads_are_rejected() {
    let _ = env_logger::try_init().ok();
    let gateway = MockGateway::with_succeeded_payment("pi_1", 10_000, true);
    let body = event_body("payment_intent.succeeded", "pi_1");
    let req = signed_request(&body, "whsec_wrong");
    let (status, _) = send_request(req, configure(gateway.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(gateway.transfer_attempts(), 0);
}

#[actix_web::test]
async fn unsigned_payloads_are_rejected() {
    let _ = env_logger::try_init().ok();
    let gateway = MockGateway::with_succeeded_payment("pi_1", 10_000, true);
    let body = event_body("payment_intent.succeeded", "pi_1");
    let req = TestRequest::post()
        .uri("/stripe/webhook")
        .insert_header(("Content-Type", "application/json"))
        .set_payload(body);
    let (status, _) = send_request(req, configure(gateway.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(gateway.transfer_attempts(), 0);
}

#[actix_web::test]
async fn valid_webhooks_settle_the_payment() {
    let _ = env_logger::try_init().ok();
    let gateway = MockGateway::with_succeeded_payment("pi_1", 10_000, true);
    let body = event_body("payment_intent.succeeded", "pi_1");
    let req = signed_request(&body, WEBHOOK_SECRET);
    let (status, body) = send_request(req, configure(gateway.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("settled"), "unexpected body: {body}");
    assert_eq!(gateway.transfers().len(), 2);
}

#[actix_web::test]
async fn unrelated_event_types_are_acknowledged_without_settling() {
    let _ = env_logger::try_init().ok();
    let gateway = MockGateway::with_succeeded_payment("pi_1", 10_000, true);
    let body = event_body("charge.refunded", "pi_1");
    let req = signed_request(&body, WEBHOOK_SECRET);
    let (status, body) = send_request(req, configure(gateway.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Ignoring"), "unexpected body: {body}");
    assert_eq!(gateway.transfer_attempts(), 0);
}

#[actix_web::test]
async fn provider_leg_failures_ask_stripe_to_redeliver() {
    let _ = env_logger::try_init().ok();
    let gateway = MockGateway::with_succeeded_payment("pi_1", 10_000, true).fail_provider();
    let body = event_body("payment_intent.succeeded", "pi_1");
    let req = signed_request(&body, WEBHOOK_SECRET);
    let (status, _) = send_request(req, configure(gateway.clone())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(gateway.transfers().is_empty());
}
