//! FX engine configuration.

use chrono::Duration as ChronoDuration;
use dailyrate_common::{constants, CurrencyCode, DurationExt};
use std::time::Duration;
use tracing::warn;

use crate::cache::RateCacheConfig;
use crate::error::{FxError, FxResult};
use crate::fetcher::FetcherConfig;

/// Main configuration.
#[derive(Debug, Clone)]
pub struct FxConfig {
    /// Currency every conversion routes through.
    pub pivot: CurrencyCode,
    /// Rate feed configuration.
    pub fetcher: FetcherConfig,
    /// Cache configuration.
    pub cache: RateCacheConfig,
    /// Quiet period before recomputing a conversion on input.
    pub debounce: Duration,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            pivot: CurrencyCode::Jpy,
            fetcher: FetcherConfig::default(),
            cache: RateCacheConfig::default(),
            debounce: constants::input_debounce().as_std(),
        }
    }
}

impl FxConfig {
    /// Load configuration from environment variables.
    ///
    /// Unparseable or out-of-range values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from `lookup`, keyed by environment variable name.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("DAILYRATE_BASE_URL") {
            config.fetcher.base_url = url;
        }

        if let Some(pivot) = lookup("DAILYRATE_PIVOT") {
            match pivot.parse() {
                Ok(code) => config.pivot = code,
                Err(e) => warn!(error = %e, "Ignoring DAILYRATE_PIVOT"),
            }
        }

        if let Some(secs) = lookup("DAILYRATE_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(secs) => config.fetcher.request_timeout = Duration::from_secs(secs),
                Err(_) => warn!(value = %secs, "Ignoring DAILYRATE_TIMEOUT_SECS"),
            }
        }

        if let Some(hours) = lookup("DAILYRATE_FRESHNESS_HOURS") {
            match hours.parse::<i64>().ok().and_then(ChronoDuration::try_hours) {
                Some(window) => config.cache.freshness_window = window,
                None => warn!(value = %hours, "Ignoring DAILYRATE_FRESHNESS_HOURS"),
            }
        }

        if let Some(ms) = lookup("DAILYRATE_DEBOUNCE_MS") {
            match ms.parse() {
                Ok(ms) => config.debounce = Duration::from_millis(ms),
                Err(_) => warn!(value = %ms, "Ignoring DAILYRATE_DEBOUNCE_MS"),
            }
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> FxResult<()> {
        if self.fetcher.base_url.is_empty() {
            return Err(FxError::Config("Rate feed URL cannot be empty".to_string()));
        }

        if !self.fetcher.base_url.starts_with("http://")
            && !self.fetcher.base_url.starts_with("https://")
        {
            return Err(FxError::Config(format!(
                "Rate feed URL must be http(s): {}",
                self.fetcher.base_url
            )));
        }

        if self.fetcher.request_timeout.is_zero() {
            return Err(FxError::Config("Request timeout cannot be zero".to_string()));
        }

        if self.cache.freshness_window <= ChronoDuration::zero() {
            return Err(FxError::Config("Freshness window must be positive".to_string()));
        }

        Ok(())
    }
}
