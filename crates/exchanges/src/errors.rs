//! Exchange client error types
//!
//! Three families matter to callers:
//! - transport: `HttpError`, `NetworkError`, `Timeout`
//! - `SerializationError`: request parameters could not become a signed payload
//! - `DataFormatError`: the exchange answered with a missing or non-numeric field
//!
//! Nothing in this crate retries; every error ends the call that raised it.

use thiserror::Error;

/// Result type for exchange operations
pub type Result<T> = std::result::Result<T, ExchangeError>;

/// Exchange operation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExchangeError {
    #[error("HTTP error {0}: {1}")]
    HttpError(u16, String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Data format error: {0}")]
    DataFormatError(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Signing error: {0}")]
    SigningError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl ExchangeError {
    /// Non-2xx response, socket failure or timeout
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::HttpError(..) | Self::NetworkError(_) | Self::Timeout(_)
        )
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpError(status, _) => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn missing_field(field: &str) -> Self {
        Self::DataFormatError(format!("missing field '{field}'"))
    }
}

impl From<url::ParseError> for ExchangeError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}
