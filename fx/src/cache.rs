//! Rate table caching with a freshness window.

use chrono::Duration;
use dailyrate_common::{constants, epoch_millis, is_within, CurrencyCode, RateTable, Timestamp};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Cached rate table for one base currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheEntry {
    pub base: CurrencyCode,
    pub rates: RateTable,
    pub fetched_at: Timestamp,
}

impl CacheEntry {
    /// Fetch time as milliseconds since the Unix epoch.
    pub fn fetched_at_epoch_millis(&self) -> i64 {
        epoch_millis(self.fetched_at)
    }
}

/// Configuration for rate cache.
#[derive(Debug, Clone)]
pub struct RateCacheConfig {
    /// How long an entry counts as fresh.
    pub freshness_window: Duration,
}

impl Default for RateCacheConfig {
    fn default() -> Self {
        Self {
            freshness_window: constants::freshness_window(),
        }
    }
}

/// Thread-safe rate table cache, one entry per base currency.
///
/// Entries are never evicted. A stale entry stays usable as a fallback until a
/// successful fetch replaces it.
pub struct RateCache {
    cache: DashMap<CurrencyCode, CacheEntry>,
    config: RateCacheConfig,
}

impl RateCache {
    /// Create a new rate cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(RateCacheConfig::default())
    }

    /// Create a new rate cache with custom configuration.
    pub fn with_config(config: RateCacheConfig) -> Self {
        Self {
            cache: DashMap::new(),
            config,
        }
    }

    /// Look up the entry for `base`, fresh or not.
    pub fn get(&self, base: CurrencyCode) -> Option<CacheEntry> {
        let entry = self.cache.get(&base).map(|e| e.clone());
        if entry.is_none() {
            debug!(base = %base, "Cache miss");
        }
        entry
    }

    /// Store `rates` for `base`, replacing any existing entry.
    pub fn put(&self, base: CurrencyCode, rates: RateTable, fetched_at: Timestamp) {
        debug!(base = %base, entries = rates.len(), "Caching rate table");
        self.cache.insert(
            base,
            CacheEntry {
                base,
                rates,
                fetched_at,
            },
        );
    }

    /// Check whether `entry` is younger than the freshness window.
    pub fn is_fresh(&self, entry: &CacheEntry, now: Timestamp) -> bool {
        is_within(entry.fetched_at, now, self.config.freshness_window)
    }

    /// Look up the entry for `base` only if it is fresh.
    pub fn get_fresh(&self, base: CurrencyCode, now: Timestamp) -> Option<CacheEntry> {
        self.get(base).filter(|entry| self.is_fresh(entry, now))
    }

    /// Clear all cached tables.
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Get the number of entries in cache.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Get cache statistics as of `now`.
    pub fn stats(&self, now: Timestamp) -> CacheStats {
        let total = self.cache.len();
        let fresh = self
            .cache
            .iter()
            .filter(|e| self.is_fresh(e.value(), now))
            .count();

        CacheStats {
            total_entries: total,
            fresh_entries: fresh,
            stale_entries: total - fresh,
        }
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub fresh_entries: usize,
    pub stale_entries: usize,
}

/// Shared rate cache.
pub type SharedRateCache = Arc<RateCache>;
