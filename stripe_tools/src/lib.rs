//! A thin client for the slice of the Stripe REST API that the settlement subsystem uses: creating payment
//! intents with split metadata attached, reading them back, and creating/listing transfers grouped by the
//! source payment id.

mod api;
mod config;
pub mod data_objects;
mod error;

pub use api::StripeApi;
pub use config::StripeConfig;
pub use data_objects::{
    NewPaymentIntent,
    NewTransfer,
    PaymentIntent,
    PaymentIntentStatus,
    Transfer,
    TransferList,
};
pub use error::StripeApiError;
