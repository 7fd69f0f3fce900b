//! FX engine error types.

use dailyrate_common::{CurrencyCode, RateTableError};
use thiserror::Error;

/// Errors that can occur in the FX engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FxError {
    /// The transport could not complete the request.
    #[error("Network error: {0}")]
    Network(String),

    /// The feed answered with a failure status.
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// The feed answered with a document we cannot use.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A currency is absent from the active rate table and is not the pivot.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Amount input was empty, non-numeric, or not positive.
    #[error("Empty or invalid amount: {0:?}")]
    EmptyOrInvalidAmount(String),

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FxError {
    /// Check if this error came from the feed transport.
    ///
    /// Transport errors are the ones eligible for stale-cache fallback.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            FxError::Network(_) | FxError::Http { .. } | FxError::MalformedResponse(_)
        )
    }

    /// Get error code for display consumers.
    pub fn error_code(&self) -> &'static str {
        match self {
            FxError::Network(_) => "NETWORK_ERROR",
            FxError::Http { .. } => "HTTP_ERROR",
            FxError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            FxError::UnknownCurrency(_) => "UNKNOWN_CURRENCY",
            FxError::EmptyOrInvalidAmount(_) => "INVALID_AMOUNT",
            FxError::Config(_) => "CONFIGURATION_ERROR",
        }
    }

    pub(crate) fn unknown(code: CurrencyCode) -> Self {
        FxError::UnknownCurrency(code.upper())
    }
}

impl From<RateTableError> for FxError {
    fn from(err: RateTableError) -> Self {
        FxError::MalformedResponse(err.to_string())
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;
