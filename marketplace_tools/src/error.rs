use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum MarketplaceApiError {
    #[error("Could not initialize the marketplace API client. {0}")]
    Initialization(String),
    #[error("Error communicating with the marketplace API. {0}")]
    ResponseError(String),
    #[error("Could not deserialize marketplace API response. {0}")]
    JsonError(String),
    #[error("The marketplace API returned an error response. Status: {status}, Message: {message}")]
    QueryError { status: u16, message: String },
}
