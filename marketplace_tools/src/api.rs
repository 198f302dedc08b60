use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::de::DeserializeOwned;

use crate::{
    config::MarketplaceConfig,
    data_objects::{EventPage, TransactionEvent},
    MarketplaceApiError,
    TRANSACTION_TRANSITIONED,
};

#[derive(Clone)]
pub struct MarketplaceApi {
    config: MarketplaceConfig,
    client: Arc<Client>,
}

impl MarketplaceApi {
    pub fn new(config: MarketplaceConfig) -> Result<Self, MarketplaceApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        let bearer = format!("Bearer {}", config.access_token.reveal());
        let val = HeaderValue::from_str(&bearer).map_err(|e| MarketplaceApiError::Initialization(e.to_string()))?;
        headers.insert("Authorization", val);
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| MarketplaceApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub async fn rest_query<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, MarketplaceApiError> {
        let url = self.url(path);
        trace!("Sending marketplace query: {url}");
        let mut req = self.client.request(method, url);
        if !params.is_empty() {
            req = req.query(params);
        }
        let response = req.send().await.map_err(|e| MarketplaceApiError::ResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("Marketplace query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| MarketplaceApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| MarketplaceApiError::ResponseError(e.to_string()))?;
            Err(MarketplaceApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/v1/integration{path}", self.config.api_url)
    }

    /// Fetches all transaction-transitioned events created at or after the given cursor timestamp.
    pub async fn transaction_events_since(
        &self,
        cursor: DateTime<Utc>,
    ) -> Result<Vec<TransactionEvent>, MarketplaceApiError> {
        let start = cursor.to_rfc3339_opts(SecondsFormat::Millis, true);
        let params = [("event_type", TRANSACTION_TRANSITIONED), ("created_at_start", start.as_str())];
        debug!("Fetching transaction events since {start}");
        let page = self.rest_query::<EventPage>(Method::GET, "/events", &params).await?;
        info!("Fetched {} transaction events", page.data.len());
        Ok(page.data)
    }
}
