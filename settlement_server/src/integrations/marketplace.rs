//! The marketplace-core-backed [`EventFeed`].
use chrono::{DateTime, Utc};
use marketplace_tools::{data_objects::TransactionEvent, MarketplaceApi, MarketplaceApiError, MarketplaceConfig};
use settlement_engine::traits::{EventFeed, EventFeedError, FeedEvent};

#[derive(Clone)]
pub struct MarketplaceFeed {
    api: MarketplaceApi,
}

impl MarketplaceFeed {
    pub fn new(config: MarketplaceConfig) -> Result<Self, MarketplaceApiError> {
        let api = MarketplaceApi::new(config)?;
        Ok(Self { api })
    }
}

impl EventFeed for MarketplaceFeed {
    async fn events_since(&self, cursor: DateTime<Utc>) -> Result<Vec<FeedEvent>, EventFeedError> {
        let events =
            self.api.transaction_events_since(cursor).await.map_err(|e| EventFeedError(e.to_string()))?;
        Ok(events.into_iter().map(feed_event).collect())
    }
}

fn feed_event(event: TransactionEvent) -> FeedEvent {
    let completed = event.is_completed();
    let tx = event.transaction;
    FeedEvent {
        event_id: event.id,
        created_at: event.created_at,
        tx_id: tx.id,
        completed,
        gross: tx.gross_amount,
        currency: tx.currency,
        provider_id: tx.provider_id,
        promo_code: tx.promo_code,
        qr_code: tx.qr_code,
    }
}
