//! The abstract interfaces the engine is written against.
//!
//! * [`PaymentGateway`] — the payment processor (Stripe in production): create payments, read them back,
//!   create and list grouped transfers.
//! * [`EventFeed`] — the marketplace core's transaction-event feed.
//! * [`LedgerDatabase`] / [`LedgerManagement`] — the durable commission ledger and referral counters.
//!
//! Concrete implementations for the external collaborators live with the server binary; the sqlite ledger
//! backend lives in [`crate::sqlite`].

mod data_objects;
mod event_feed;
mod ledger;
mod payment_gateway;

pub use data_objects::{
    CycleSummary,
    FeedEvent,
    MetadataError,
    NewPaymentRequest,
    PaymentRecord,
    PaymentStatus,
    SplitMetadata,
    TransferRecord,
    TransferRequest,
    META_DESCRIPTION,
    META_HOST_ACCOUNT,
    META_HOST_AMOUNT,
    META_PROVIDER_ACCOUNT,
    META_PROVIDER_AMOUNT,
};
pub use event_feed::{EventFeed, EventFeedError};
pub use ledger::{LedgerDatabase, LedgerError, LedgerManagement};
pub use payment_gateway::{GatewayError, PaymentGateway};
