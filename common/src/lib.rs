//! dailyrate Common Types
//!
//! Shared types used across dailyrate: the supported currency catalogue,
//! rate tables keyed by currency code, and timestamp helpers.

pub mod currency;
pub mod error;
pub mod rates;
pub mod time;

pub use currency::*;
pub use error::*;
pub use rates::*;
pub use time::*;
