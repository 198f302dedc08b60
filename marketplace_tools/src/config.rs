use log::*;
use wsp_common::Secret;

#[derive(Debug, Clone, Default)]
pub struct MarketplaceConfig {
    /// The base URL of the marketplace core's integration API, e.g. "https://core.wandero.example".
    pub api_url: String,
    pub access_token: Secret<String>,
}

impl MarketplaceConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("WSP_MARKETPLACE_API_URL").unwrap_or_else(|_| {
            warn!("WSP_MARKETPLACE_API_URL not set, using a (probably useless) default");
            "http://localhost:4000".to_string()
        });
        let access_token = Secret::new(std::env::var("WSP_MARKETPLACE_ACCESS_TOKEN").unwrap_or_else(|_| {
            warn!("WSP_MARKETPLACE_ACCESS_TOKEN not set, using a (probably useless) default");
            "wsp_integration_00000000".to_string()
        }));
        Self { api_url, access_token }
    }

    pub fn new(api_url: &str, access_token: &str) -> Self {
        Self { api_url: api_url.to_string(), access_token: Secret::new(access_token.to_string()) }
    }
}
