use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use settlement_engine::{db_types::TransferRole, events::EventProducers, SettlementApi, SettlementOutcome};
use wsp_common::Cents;

use super::{helpers::send_request, mocks::MockGateway};
use crate::routes::settle;

fn configure(gateway: MockGateway) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = SettlementApi::new(gateway, EventProducers::default());
        cfg.app_data(web::Data::new(api))
            .service(web::scope("/api").route("/settle/{payment_id}", web::post().to(settle::<MockGateway>)));
    }
}

#[actix_web::test]
async fn manual_settlement_returns_the_outcome() {
    let _ = env_logger::try_init().ok();
    let gateway = MockGateway::with_succeeded_payment("pi_1", 10_000, true);
    let req = TestRequest::post().uri("/api/settle/pi_1");
    let (status, body) = send_request(req, configure(gateway.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let outcome: SettlementOutcome = serde_json::from_str(&body).unwrap();
    assert!(!outcome.already_settled);
    assert_eq!(outcome.transfers.len(), 2);
    assert_eq!(outcome.transfers[0].role, Some(TransferRole::Provider));
    assert_eq!(outcome.transfers[0].amount, Cents::from(8_500));
    assert_eq!(outcome.transfers[1].role, Some(TransferRole::Host));
    assert_eq!(outcome.transfers[1].amount, Cents::from(500));

    // The second call finds the group populated and creates nothing.
    let req = TestRequest::post().uri("/api/settle/pi_1?retry_host=true");
    let (status, body) = send_request(req, configure(gateway.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let outcome: SettlementOutcome = serde_json::from_str(&body).unwrap();
    assert!(outcome.already_settled);
    assert_eq!(gateway.transfer_attempts(), 2);
}

#[actix_web::test]
async fn settling_an_unknown_payment_is_a_404() {
    let _ = env_logger::try_init().ok();
    let gateway = MockGateway::default();
    let req = TestRequest::post().uri("/api/settle/pi_missing");
    let (status, _) = send_request(req, configure(gateway)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn pending_payments_are_a_409() {
    let _ = env_logger::try_init().ok();
    let gateway = MockGateway::default();
    // Seed a pending payment directly rather than going through checkout.
    {
        let mut state = gateway.state.lock().unwrap();
        let payment = settlement_engine::traits::PaymentRecord {
            id: "pi_1".to_string(),
            amount: Cents::from(10_000),
            currency: "usd".to_string(),
            status: settlement_engine::traits::PaymentStatus::Pending,
            client_token: None,
            metadata: Default::default(),
        };
        state.payments.insert("pi_1".to_string(), payment);
    }
    let req = TestRequest::post().uri("/api/settle/pi_1");
    let (status, _) = send_request(req, configure(gateway)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}
