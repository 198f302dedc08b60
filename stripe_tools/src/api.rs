use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::de::DeserializeOwned;

use crate::{
    config::StripeConfig,
    data_objects::{NewPaymentIntent, NewTransfer, PaymentIntent, Transfer, TransferList},
    StripeApiError,
};

#[derive(Clone)]
pub struct StripeApi {
    config: StripeConfig,
    client: Arc<Client>,
}

impl StripeApi {
    pub fn new(config: StripeConfig) -> Result<Self, StripeApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        let bearer = format!("Bearer {}", config.secret_key.reveal());
        let val = HeaderValue::from_str(&bearer).map_err(|e| StripeApiError::Initialization(e.to_string()))?;
        headers.insert("Authorization", val);
        let client =
            Client::builder().default_headers(headers).build().map_err(|e| StripeApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// Sends a request to the Stripe API. Stripe takes request parameters as form-encoded bodies (or query
    /// parameters for GETs) and responds with JSON.
    pub async fn query<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, StripeApiError> {
        let url = self.url(path);
        trace!("Sending Stripe query: {method} {url}");
        let mut req = self.client.request(method.clone(), url);
        if !params.is_empty() {
            req = if method == Method::GET { req.query(params) } else { req.form(params) };
        }
        let response = req.send().await.map_err(|e| StripeApiError::ResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("Stripe query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| StripeApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| StripeApiError::ResponseError(e.to_string()))?;
            Err(StripeApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/v1{path}", self.config.api_base)
    }

    /// Creates a payment intent for the gross amount. The commission split and party identifiers travel in the
    /// metadata map, which Stripe stores on the payment and echoes back on every read and webhook delivery.
    pub async fn create_payment_intent(&self, new: NewPaymentIntent) -> Result<PaymentIntent, StripeApiError> {
        let mut params = vec![
            ("amount".to_string(), new.amount.value().to_string()),
            ("currency".to_string(), new.currency.clone()),
            ("automatic_payment_methods[enabled]".to_string(), "true".to_string()),
        ];
        if let Some(desc) = &new.description {
            params.push(("description".to_string(), desc.clone()));
        }
        for (key, value) in &new.metadata {
            params.push((format!("metadata[{key}]"), value.clone()));
        }
        debug!("Creating payment intent for {} {}", new.amount, new.currency);
        let pi = self.query::<PaymentIntent>(Method::POST, "/payment_intents", &params).await?;
        info!("Created payment intent {}", pi.id);
        Ok(pi)
    }

    pub async fn get_payment_intent(&self, id: &str) -> Result<PaymentIntent, StripeApiError> {
        let path = format!("/payment_intents/{id}");
        debug!("Fetching payment intent {id}");
        self.query::<PaymentIntent>(Method::GET, &path, &[]).await
    }

    /// Creates a single transfer leg to a connected account, tagged with the settlement group key.
    pub async fn create_transfer(&self, new: NewTransfer) -> Result<Transfer, StripeApiError> {
        let mut params = vec![
            ("amount".to_string(), new.amount.value().to_string()),
            ("currency".to_string(), new.currency.clone()),
            ("destination".to_string(), new.destination.clone()),
            ("transfer_group".to_string(), new.transfer_group.clone()),
        ];
        for (key, value) in &new.metadata {
            params.push((format!("metadata[{key}]"), value.clone()));
        }
        debug!("Creating transfer of {} {} to {} in group {}", new.amount, new.currency, new.destination, new.transfer_group);
        let transfer = self.query::<Transfer>(Method::POST, "/transfers", &params).await?;
        info!("Created transfer {} in group {}", transfer.id, new.transfer_group);
        Ok(transfer)
    }

    /// Lists all transfers that share the given settlement group key. Stripe is the source of truth for
    /// "has this payment already been settled"; callers must consult this before creating any transfer.
    pub async fn list_transfers(&self, transfer_group: &str) -> Result<Vec<Transfer>, StripeApiError> {
        let params =
            vec![("transfer_group".to_string(), transfer_group.to_string()), ("limit".to_string(), "100".to_string())];
        trace!("Listing transfers for group {transfer_group}");
        let list = self.query::<TransferList>(Method::GET, "/transfers", &params).await?;
        Ok(list.data)
    }
}
