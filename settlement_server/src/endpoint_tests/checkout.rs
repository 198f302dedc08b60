use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use serde_json::json;
use settlement_engine::CheckoutApi;

use super::{helpers::send_request, mocks::MockGateway};
use crate::{data_objects::CheckoutResponse, routes::checkout};

fn configure(gateway: MockGateway) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = CheckoutApi::new(gateway);
        cfg.app_data(web::Data::new(api)).route("/checkout", web::post().to(checkout::<MockGateway>));
    }
}

#[actix_web::test]
async fn checkout_creates_a_payment_with_a_client_token() {
    let _ = env_logger::try_init().ok();
    let gateway = MockGateway::default();
    let req = TestRequest::post().uri("/checkout").set_json(json!({
        "amount": 10_000,
        "currency": "usd",
        "provider_account": "acct_prov",
        "host_account": "acct_host",
        "description": "Sunset kayak tour"
    }));
    let (status, body) = send_request(req, configure(gateway.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let res: CheckoutResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(res.payment_id, "pi_1");
    assert_eq!(res.client_token.as_deref(), Some("tok_secret"));
    assert_eq!(gateway.state.lock().unwrap().payments.len(), 1);
}

#[actix_web::test]
async fn amounts_below_the_gateway_minimum_are_rejected() {
    let _ = env_logger::try_init().ok();
    let gateway = MockGateway::default();
    let req = TestRequest::post().uri("/checkout").set_json(json!({
        "amount": 49,
        "currency": "usd",
        "provider_account": "acct_prov",
        "description": "Sticker"
    }));
    let (status, body) = send_request(req, configure(gateway.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("below the gateway minimum"), "unexpected body: {body}");
    assert!(gateway.state.lock().unwrap().payments.is_empty());
}
