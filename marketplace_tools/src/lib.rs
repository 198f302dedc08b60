//! Client for the Wandero marketplace core's integration API. The settlement subsystem only uses one corner
//! of it: the transaction-event feed, polled with a `created_at_start` cursor and an event-type filter.

mod api;
mod config;
pub mod data_objects;
mod error;

pub use api::MarketplaceApi;
pub use config::MarketplaceConfig;
pub use data_objects::{EventPage, TransactionEvent, TransactionResource, TransactionState};
pub use error::MarketplaceApiError;

/// The only event type this subsystem subscribes to.
pub const TRANSACTION_TRANSITIONED: &str = "transaction/transitioned";
