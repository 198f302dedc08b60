use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::traits::FeedEvent;

/// A source of transaction-transitioned events from the upstream marketplace, polled with a timestamp
/// cursor. Delivery is at least once; consumers must be idempotent.
#[allow(async_fn_in_trait)]
pub trait EventFeed: Clone {
    /// Returns all transaction-transitioned events with a timestamp at or after `cursor`.
    async fn events_since(&self, cursor: DateTime<Utc>) -> Result<Vec<FeedEvent>, EventFeedError>;
}

#[derive(Debug, Clone, Error)]
#[error("Could not fetch events from the upstream feed. {0}")]
pub struct EventFeedError(pub String);
