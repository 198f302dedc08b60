use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use settlement_engine::{
    events::{EventHandlers, EventHooks, EventProducers},
    CheckoutApi,
    LedgerApi,
    SettlementApi,
    SqliteDatabase,
};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::{MarketplaceFeed, StripeGateway},
    middleware::{HmacMiddlewareFactory, WEBHOOK_SIGNATURE_HEADER},
    reconciliation_worker::start_reconciliation_worker,
    routes::{
        checkout,
        commission_by_tx,
        commissions_for_host,
        create_promo_code,
        create_qr_code,
        get_promo_code,
        get_qr_code,
        health,
        mark_paid,
        settle,
        stripe_webhook,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let gateway = StripeGateway::new(config.stripe.api.clone(), config.stripe.minimum_charge)
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let feed = MarketplaceFeed::new(config.marketplace.api.clone())
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let producers = start_event_handlers().await;
    start_reconciliation_worker(feed, db.clone(), config.marketplace.poll_interval_secs, config.marketplace.lookback);
    let srv = create_server_instance(config, db, gateway, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// Wires up the default event hooks (logging only) and starts their handler tasks.
async fn start_event_handlers() -> EventProducers {
    let mut hooks = EventHooks::default();
    hooks.on_settlement_completed(|ev| {
        Box::pin(async move {
            info!("💸️ Settlement for {} completed with {} transfer(s)", ev.payment_id, ev.transfers.len());
        })
    });
    hooks.on_host_transfer_failed(|ev| {
        Box::pin(async move {
            warn!(
                "💸️ Host transfer of {} to {} for payment {} failed: {}. It can be re-attempted with \
                 retry_host=true.",
                ev.amount, ev.host_account, ev.payment_id, ev.reason
            );
        })
    });
    let handlers = EventHandlers::new(10, hooks);
    let producers = handlers.producers();
    handlers.start_handlers().await;
    producers
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: StripeGateway,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let checkout_api = CheckoutApi::new(gateway.clone());
        let settlement_api = SettlementApi::new(gateway.clone(), producers.clone());
        let ledger_api = LedgerApi::new(db.clone());
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("wsp::access_log"))
            .app_data(web::Data::new(checkout_api))
            .app_data(web::Data::new(settlement_api))
            .app_data(web::Data::new(ledger_api));
        // The webhook lives in its own scope so that only it pays the HMAC toll
        let webhook_hmac = HmacMiddlewareFactory::new(
            WEBHOOK_SIGNATURE_HEADER,
            config.stripe.webhook_secret.clone(),
            config.stripe.hmac_checks,
        );
        let stripe_scope =
            web::scope("/stripe").wrap(webhook_hmac).route("/webhook", web::post().to(stripe_webhook::<StripeGateway>));
        // The host summary route must come before the {tx_id} routes, since actix matches in
        // registration order
        let api_scope = web::scope("/api")
            .route("/settle/{payment_id}", web::post().to(settle::<StripeGateway>))
            .route("/commissions/host/{host_id}", web::get().to(commissions_for_host::<SqliteDatabase>))
            .route("/commissions/{tx_id}/mark_paid", web::post().to(mark_paid::<SqliteDatabase>))
            .route("/commissions/{tx_id}", web::get().to(commission_by_tx::<SqliteDatabase>))
            .route("/promo_codes/{code}", web::get().to(get_promo_code::<SqliteDatabase>))
            .route("/promo_codes", web::post().to(create_promo_code::<SqliteDatabase>))
            .route("/qr_codes/{code}", web::get().to(get_qr_code::<SqliteDatabase>))
            .route("/qr_codes", web::post().to(create_qr_code::<SqliteDatabase>));
        app.service(health)
            .route("/checkout", web::post().to(checkout::<StripeGateway>))
            .service(stripe_scope)
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
