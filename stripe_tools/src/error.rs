use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum StripeApiError {
    #[error("Could not initialize the Stripe API client. {0}")]
    Initialization(String),
    #[error("Error communicating with Stripe. {0}")]
    ResponseError(String),
    #[error("Could not deserialize Stripe response. {0}")]
    JsonError(String),
    #[error("Stripe returned an error response. Status: {status}, Message: {message}")]
    QueryError { status: u16, message: String },
}
