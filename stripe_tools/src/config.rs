use log::*;
use wsp_common::Secret;

const DEFAULT_API_BASE: &str = "https://api.stripe.com";

#[derive(Debug, Clone, Default)]
pub struct StripeConfig {
    /// The secret API key for the Stripe account, e.g. `sk_live_...`
    pub secret_key: Secret<String>,
    /// The base URL for the Stripe API. Only override this in tests.
    pub api_base: String,
}

impl StripeConfig {
    pub fn new_from_env_or_default() -> Self {
        let secret_key = Secret::new(std::env::var("WSP_STRIPE_SECRET_KEY").unwrap_or_else(|_| {
            warn!("WSP_STRIPE_SECRET_KEY not set, using a (probably useless) default");
            "sk_test_00000000000000".to_string()
        }));
        let api_base = std::env::var("WSP_STRIPE_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        Self { secret_key, api_base }
    }

    pub fn new(secret_key: &str, api_base: &str) -> Self {
        Self { secret_key: Secret::new(secret_key.to_string()), api_base: api_base.to_string() }
    }
}
