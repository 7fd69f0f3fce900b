//! dailyrate FX Engine
//!
//! Daily exchange rate acquisition, caching and conversion.
//!
//! # Features
//!
//! - Rate feed fetching over HTTP behind the [`RateFetcher`] trait
//! - In-memory rate cache with a 24 hour freshness window
//! - Stale-data fallback when the feed is unavailable
//! - Bidirectional rates and multiplier-scaled display values
//! - Cross-currency conversion through a pivot currency
//! - View state driven by reducer actions
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use dailyrate_common::{now, CurrencyCode};
//! use dailyrate_fx::{FxConfig, HttpRateFetcher, RateService};
//!
//! let config = FxConfig::from_env();
//! let fetcher = Arc::new(HttpRateFetcher::new(config.fetcher.clone())?);
//! let service = RateService::new(fetcher, config);
//!
//! let snapshot = service.get_latest(CurrencyCode::Usd).await?;
//! let result = service.convert(CurrencyCode::Usd, CurrencyCode::Eur, 100.0, now()).await?;
//! ```

pub mod cache;
pub mod config;
pub mod conversion;
pub mod error;
pub mod fetcher;
pub mod format;
pub mod sequence;
pub mod service;
pub mod view;

pub use cache::{CacheEntry, RateCache, RateCacheConfig};
pub use config::FxConfig;
pub use conversion::{BidirectionalRate, ConversionResult, RateQuote};
pub use error::{FxError, FxResult};
pub use fetcher::{FetcherConfig, HttpRateFetcher, RateFetcher};
pub use format::Multiplier;
pub use sequence::{RequestSequencer, Ticket};
pub use service::{Conversion, Provenance, RateBoard, RateService, RateSnapshot};
pub use view::{reduce, Action, Effect, Phase, ViewState};
