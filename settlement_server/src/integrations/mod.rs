//! Glue between the engine's abstract collaborators and the real Stripe / marketplace-core clients.

pub mod marketplace;
pub mod stripe;

pub use marketplace::MarketplaceFeed;
pub use stripe::StripeGateway;
