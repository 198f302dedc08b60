use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use settlement_engine::{
    traits::{GatewayError, LedgerError},
    CheckoutError,
    SettlementError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Payload deserialization error")]
    CouldNotDeserializePayload,
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Checkout failed. {0}")]
    CheckoutError(#[from] CheckoutError),
    #[error("Settlement failed. {0}")]
    SettlementError(#[from] SettlementError),
    #[error("Ledger error. {0}")]
    LedgerError(#[from] LedgerError),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::CouldNotDeserializePayload => StatusCode::BAD_REQUEST,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::CheckoutError(e) => match e {
                CheckoutError::AmountTooSmall { .. } => StatusCode::BAD_REQUEST,
                CheckoutError::CommissionError(_) => StatusCode::BAD_REQUEST,
                CheckoutError::GatewayError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::SettlementError(e) => match e {
                SettlementError::PaymentNotTerminal { .. } => StatusCode::CONFLICT,
                SettlementError::MissingMetadata(_) => StatusCode::BAD_REQUEST,
                // 500 on the mandatory leg so that the gateway redelivers the webhook.
                SettlementError::MandatoryTransferFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                SettlementError::GatewayError(GatewayError::PaymentNotFound(_)) => StatusCode::NOT_FOUND,
                SettlementError::GatewayError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::LedgerError(e) => match e {
                LedgerError::CodeAlreadyExists(_) => StatusCode::CONFLICT,
                LedgerError::EntryNotFound(_) => StatusCode::NOT_FOUND,
                LedgerError::AlreadyPaid(_) => StatusCode::CONFLICT,
                LedgerError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}
