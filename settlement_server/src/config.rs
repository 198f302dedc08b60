use std::env;

use chrono::Duration;
use log::*;
use marketplace_tools::MarketplaceConfig;
use stripe_tools::StripeConfig;
use wsp_common::{parse_boolean_flag, Cents, Secret};

const DEFAULT_WSP_HOST: &str = "127.0.0.1";
const DEFAULT_WSP_PORT: u16 = 8280;
/// Stripe's own floor for a charge, in minor units.
const DEFAULT_MINIMUM_CHARGE: i64 = 50;
const DEFAULT_RECONCILE_INTERVAL_SECS: u64 = 60;
const DEFAULT_RECONCILE_LOOKBACK: Duration = Duration::hours(1);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub stripe: StripeServerConfig,
    pub marketplace: MarketplaceServerConfig,
}

#[derive(Clone, Debug)]
pub struct StripeServerConfig {
    pub api: StripeConfig,
    /// The key used to verify webhook signatures.
    pub webhook_secret: Secret<String>,
    /// If false, the webhook signature check is skipped entirely. For local development only.
    pub hmac_checks: bool,
    /// The smallest gross amount the checkout endpoint will accept.
    pub minimum_charge: Cents,
}

#[derive(Clone, Debug)]
pub struct MarketplaceServerConfig {
    pub api: MarketplaceConfig,
    /// How often the reconciliation poller runs.
    pub poll_interval_secs: u64,
    /// How far back the first cycle after startup looks.
    pub lookback: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_WSP_HOST.to_string(),
            port: DEFAULT_WSP_PORT,
            database_url: String::default(),
            stripe: StripeServerConfig::default(),
            marketplace: MarketplaceServerConfig::default(),
        }
    }
}

impl Default for StripeServerConfig {
    fn default() -> Self {
        Self {
            api: StripeConfig::default(),
            webhook_secret: Secret::default(),
            hmac_checks: true,
            minimum_charge: Cents::from(DEFAULT_MINIMUM_CHARGE),
        }
    }
}

impl Default for MarketplaceServerConfig {
    fn default() -> Self {
        Self {
            api: MarketplaceConfig::default(),
            poll_interval_secs: DEFAULT_RECONCILE_INTERVAL_SECS,
            lookback: DEFAULT_RECONCILE_LOOKBACK,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("WSP_HOST").ok().unwrap_or_else(|| DEFAULT_WSP_HOST.into());
        let port = env::var("WSP_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for WSP_PORT. {e} Using the default, {DEFAULT_WSP_PORT}, instead."
                    );
                    DEFAULT_WSP_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_WSP_PORT);
        let database_url = env::var("WSP_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ WSP_DATABASE_URL is not set. Please set it to the URL for the commission ledger database.");
            String::default()
        });
        let stripe = StripeServerConfig::from_env_or_default();
        let marketplace = MarketplaceServerConfig::from_env_or_default();
        Self { host, port, database_url, stripe, marketplace }
    }
}

impl StripeServerConfig {
    pub fn from_env_or_default() -> Self {
        let api = StripeConfig::new_from_env_or_default();
        let webhook_secret = env::var("WSP_STRIPE_WEBHOOK_SECRET").ok().unwrap_or_else(|| {
            error!(
                "🪛️ WSP_STRIPE_WEBHOOK_SECRET is not set. Please set it to the signing key for your Stripe webhook \
                 endpoint."
            );
            String::default()
        });
        let webhook_secret = Secret::new(webhook_secret);
        let hmac_checks = parse_boolean_flag(env::var("WSP_STRIPE_HMAC_CHECKS").ok(), true);
        if !hmac_checks {
            warn!("🚨️ Stripe webhook signature checks are DISABLED. Do not run like this in production.");
        }
        let minimum_charge = env::var("WSP_MINIMUM_CHARGE")
            .map_err(|_| {
                info!("🪛️ WSP_MINIMUM_CHARGE is not set. Using the default of {DEFAULT_MINIMUM_CHARGE}.");
            })
            .and_then(|s| {
                s.parse::<i64>()
                    .map_err(|e| warn!("🪛️ Invalid configuration value for WSP_MINIMUM_CHARGE. {e}"))
            })
            .ok()
            .unwrap_or(DEFAULT_MINIMUM_CHARGE);
        Self { api, webhook_secret, hmac_checks, minimum_charge: Cents::from(minimum_charge) }
    }
}

impl MarketplaceServerConfig {
    pub fn from_env_or_default() -> Self {
        let api = MarketplaceConfig::new_from_env_or_default();
        let poll_interval_secs = env::var("WSP_RECONCILE_INTERVAL")
            .map_err(|_| {
                info!(
                    "🪛️ WSP_RECONCILE_INTERVAL is not set. Using the default value of \
                     {DEFAULT_RECONCILE_INTERVAL_SECS} seconds."
                );
            })
            .and_then(|s| {
                s.parse::<u64>().map_err(|e| warn!("🪛️ Invalid configuration value for WSP_RECONCILE_INTERVAL. {e}"))
            })
            .ok()
            .unwrap_or(DEFAULT_RECONCILE_INTERVAL_SECS);
        let lookback = env::var("WSP_RECONCILE_LOOKBACK")
            .map_err(|_| {
                info!(
                    "🪛️ WSP_RECONCILE_LOOKBACK is not set. Using the default value of {} hrs.",
                    DEFAULT_RECONCILE_LOOKBACK.num_hours()
                );
            })
            .and_then(|s| {
                s.parse::<i64>()
                    .map(Duration::hours)
                    .map_err(|e| warn!("🪛️ Invalid configuration value for WSP_RECONCILE_LOOKBACK. {e}"))
            })
            .ok()
            .unwrap_or(DEFAULT_RECONCILE_LOOKBACK);
        Self { api, poll_interval_secs, lookback }
    }
}
