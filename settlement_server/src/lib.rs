//! # Wandero settlement server
//!
//! The HTTP face of the settlement engine. It exposes checkout, the Stripe webhook, the manual settlement
//! endpoint and the commission-ledger read/operator surface, and runs the reconciliation poller against the
//! marketplace core's event feed.

pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod integrations;
pub mod middleware;
pub mod reconciliation_worker;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
