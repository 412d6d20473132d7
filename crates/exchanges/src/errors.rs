//! Exchange-specific error types

use thiserror::Error;

/// Result type for exchange operations
pub type Result<T> = std::result::Result<T, ExchangeError>;

/// Binance code for "Invalid API-key, IP, or permissions for action"
const BINANCE_PERMISSION_DENIED: i64 = -2015;
/// Binance code for "API-key format invalid"
const BINANCE_BAD_API_KEY: i64 = -2014;

/// Exchange operation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExchangeError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("HTTP error {0}: {1}")]
    HttpError(u16, String),

    #[error("Exchange rejected request (HTTP {status}, code {code}): {msg}")]
    Api { status: u16, code: i64, msg: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Signing error: {0}")]
    SigningError(String),

    #[error("Session closed")]
    SessionClosed,

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl ExchangeError {
    /// Whether the exchange refused the call because of key permissions
    pub fn is_permission_denied(&self) -> bool {
        match self {
            ExchangeError::HttpError(status, _) => matches!(status, 401 | 403),
            ExchangeError::Api { status, code, .. } => {
                matches!(status, 401 | 403)
                    || matches!(*code, BINANCE_PERMISSION_DENIED | BINANCE_BAD_API_KEY)
            }
            ExchangeError::InvalidCredentials => true,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<url::ParseError> for ExchangeError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}
