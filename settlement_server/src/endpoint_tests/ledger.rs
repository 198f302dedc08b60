use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use serde_json::json;
use settlement_engine::{
    db_types::{LedgerEntry, PayoutStatus, PromoCode, QrCode},
    LedgerApi,
};
use wsp_common::Cents;

use super::{
    helpers::send_request,
    mocks::{ledger_entry, MockLedger},
};
use crate::{
    data_objects::HostCommissionSummary,
    routes::{
        commission_by_tx,
        commissions_for_host,
        create_promo_code,
        create_qr_code,
        get_promo_code,
        get_qr_code,
        mark_paid,
    },
};

fn configure(ledger: MockLedger) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = LedgerApi::new(ledger);
        cfg.app_data(web::Data::new(api)).service(
            web::scope("/api")
                .route("/commissions/host/{host_id}", web::get().to(commissions_for_host::<MockLedger>))
                .route("/commissions/{tx_id}/mark_paid", web::post().to(mark_paid::<MockLedger>))
                .route("/commissions/{tx_id}", web::get().to(commission_by_tx::<MockLedger>))
                .route("/promo_codes/{code}", web::get().to(get_promo_code::<MockLedger>))
                .route("/promo_codes", web::post().to(create_promo_code::<MockLedger>))
                .route("/qr_codes/{code}", web::get().to(get_qr_code::<MockLedger>))
                .route("/qr_codes", web::post().to(create_qr_code::<MockLedger>)),
        );
    }
}

#[actix_web::test]
async fn unknown_commissions_are_a_404() {
    let _ = env_logger::try_init().ok();
    let ledger = MockLedger::default();
    let req = TestRequest::get().uri("/api/commissions/tx_missing");
    let (status, body) = send_request(req, configure(ledger)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("tx_missing"), "unexpected body: {body}");
}

#[actix_web::test]
async fn commissions_can_be_fetched_by_transaction_id() {
    let _ = env_logger::try_init().ok();
    let ledger = MockLedger::default().with_entry(ledger_entry(1, "tx_1", Some("host_1"), 10_000));
    let req = TestRequest::get().uri("/api/commissions/tx_1");
    let (status, body) = send_request(req, configure(ledger)).await;
    assert_eq!(status, StatusCode::OK);
    let entry: LedgerEntry = serde_json::from_str(&body).unwrap();
    assert_eq!(entry.host_amount, Cents::from(500));
    assert_eq!(entry.provider_amount, Cents::from(8_500));
    assert_eq!(entry.payout_status, PayoutStatus::Pending);
}

#[actix_web::test]
async fn the_host_statement_carries_a_running_total() {
    let _ = env_logger::try_init().ok();
    let ledger = MockLedger::default()
        .with_entry(ledger_entry(1, "tx_1", Some("host_1"), 10_000))
        .with_entry(ledger_entry(2, "tx_2", Some("host_1"), 150))
        .with_entry(ledger_entry(3, "tx_3", Some("host_2"), 10_000));
    let req = TestRequest::get().uri("/api/commissions/host/host_1");
    let (status, body) = send_request(req, configure(ledger)).await;
    assert_eq!(status, StatusCode::OK);
    let summary: HostCommissionSummary = serde_json::from_str(&body).unwrap();
    assert_eq!(summary.host_id, "host_1");
    assert_eq!(summary.entries.len(), 2);
    // 500 for the 10,000c sale plus the rounded 8c share of the 150c sale
    assert_eq!(summary.total, Cents::from(508));
}

#[actix_web::test]
async fn payouts_can_only_be_marked_paid_once() {
    let _ = env_logger::try_init().ok();
    let ledger = MockLedger::default().with_entry(ledger_entry(1, "tx_1", Some("host_1"), 10_000));

    let req = TestRequest::post().uri("/api/commissions/tx_1/mark_paid");
    let (status, body) = send_request(req, configure(ledger.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let entry: LedgerEntry = serde_json::from_str(&body).unwrap();
    assert_eq!(entry.payout_status, PayoutStatus::Paid);

    let req = TestRequest::post().uri("/api/commissions/tx_1/mark_paid");
    let (status, _) = send_request(req, configure(ledger.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let req = TestRequest::post().uri("/api/commissions/tx_nope/mark_paid");
    let (status, _) = send_request(req, configure(ledger)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn promo_codes_can_be_created_and_fetched() {
    let _ = env_logger::try_init().ok();
    let ledger = MockLedger::default();

    let req = TestRequest::post().uri("/api/promo_codes").set_json(json!({"code": "SUMMER", "host_id": "host_1"}));
    let (status, body) = send_request(req, configure(ledger.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let promo: PromoCode = serde_json::from_str(&body).unwrap();
    assert_eq!(promo.code, "SUMMER");
    assert_eq!(promo.usage_count, 0);

    let req = TestRequest::post().uri("/api/promo_codes").set_json(json!({"code": "SUMMER", "host_id": "host_2"}));
    let (status, _) = send_request(req, configure(ledger.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let req = TestRequest::get().uri("/api/promo_codes/SUMMER");
    let (status, _) = send_request(req, configure(ledger.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let req = TestRequest::get().uri("/api/promo_codes/WINTER");
    let (status, _) = send_request(req, configure(ledger)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn qr_codes_can_be_created_and_fetched() {
    let _ = env_logger::try_init().ok();
    let ledger = MockLedger::default();

    let req = TestRequest::post().uri("/api/qr_codes").set_json(json!({"code": "qr-abc", "host_id": "host_1"}));
    let (status, body) = send_request(req, configure(ledger.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let qr: QrCode = serde_json::from_str(&body).unwrap();
    assert_eq!(qr.code, "qr-abc");
    assert_eq!(qr.conversion_count, 0);

    let req = TestRequest::get().uri("/api/qr_codes/qr-abc");
    let (status, _) = send_request(req, configure(ledger)).await;
    assert_eq!(status, StatusCode::OK);
}
