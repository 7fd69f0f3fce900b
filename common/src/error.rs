//! Error types for shared dailyrate types.

use thiserror::Error;

use crate::CurrencyCode;

/// Failure to parse a currency code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCurrencyError {
    /// Code is not in the supported set.
    #[error("Unsupported currency: {0}")]
    Unsupported(String),
}

/// Failure to build a rate table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RateTableError {
    /// A rate was zero, negative, or not finite.
    #[error("Invalid rate {rate} for {code}")]
    InvalidRate { code: CurrencyCode, rate: f64 },

    /// A rate value was not a number.
    #[error("Non-numeric rate for {0}")]
    NonNumeric(CurrencyCode),

    /// The rate document was not a JSON object.
    #[error("Rate document is not an object")]
    NotAnObject,
}
