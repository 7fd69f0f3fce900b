//! Rate service: fetcher and cache orchestration.

use std::sync::Arc;

use dailyrate_common::{now, CurrencyCode, RateTable, Timestamp};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::cache::{CacheEntry, CacheStats, RateCache, SharedRateCache};
use crate::config::FxConfig;
use crate::conversion::{self, BidirectionalRate, ConversionResult};
use crate::error::FxResult;
use crate::fetcher::RateFetcher;
use crate::format::Multiplier;
use crate::sequence::RequestSequencer;

/// Where a rate table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Fetched from the feed for this request.
    Fetched,
    /// Served from a fresh cache entry.
    Cached,
    /// Served from a stale cache entry because the fetch failed.
    StaleFallback,
}

/// A rate table together with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateSnapshot {
    pub base: CurrencyCode,
    pub table: RateTable,
    pub fetched_at: Timestamp,
    pub provenance: Provenance,
}

impl RateSnapshot {
    fn from_entry(entry: CacheEntry, provenance: Provenance) -> Self {
        Self {
            base: entry.base,
            table: entry.rates,
            fetched_at: entry.fetched_at,
            provenance,
        }
    }

    /// True for any cache hit, fresh or stale.
    pub fn from_cache(&self) -> bool {
        matches!(self.provenance, Provenance::Cached | Provenance::StaleFallback)
    }

    /// True only when stale data was served because the feed failed.
    pub fn is_stale(&self) -> bool {
        self.provenance == Provenance::StaleFallback
    }
}

/// A completed conversion and the rates behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub amount: f64,
    pub result: ConversionResult,
    pub pivot: CurrencyCode,
    pub rates_fetched_at: Timestamp,
    pub provenance: Provenance,
}

/// Rate board for one base currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateBoard {
    pub base: CurrencyCode,
    pub fetched_at: Timestamp,
    pub provenance: Provenance,
    pub rows: Vec<BidirectionalRate>,
}

/// Produces rate tables for requested base currencies.
///
/// Fresh cache entries are served directly. Otherwise the feed is asked, and
/// on failure the last known table is served instead of an error whenever
/// one exists.
pub struct RateService {
    fetcher: Arc<dyn RateFetcher>,
    cache: SharedRateCache,
    sequencer: RequestSequencer,
    config: FxConfig,
}

impl RateService {
    /// Create a new service with its own cache.
    pub fn new(fetcher: Arc<dyn RateFetcher>, config: FxConfig) -> Self {
        let cache = Arc::new(RateCache::with_config(config.cache.clone()));
        Self::with_cache(fetcher, cache, config)
    }

    /// Create a new service over an existing cache.
    pub fn with_cache(fetcher: Arc<dyn RateFetcher>, cache: SharedRateCache, config: FxConfig) -> Self {
        Self {
            fetcher,
            cache,
            sequencer: RequestSequencer::new(),
            config,
        }
    }

    /// Get rates quoted against `base` as of `now`.
    #[instrument(skip_all, fields(base = %base, fetcher = self.fetcher.name()))]
    pub async fn get_rates(&self, base: CurrencyCode, now: Timestamp) -> FxResult<RateSnapshot> {
        if let Some(entry) = self.cache.get_fresh(base, now) {
            debug!("Using cached rates");
            return Ok(RateSnapshot::from_entry(entry, Provenance::Cached));
        }

        let ticket = self.sequencer.issue(base);

        match self.fetcher.fetch(base).await {
            Ok(table) => {
                let stored = self.sequencer.commit_if_current(&ticket, || {
                    self.cache.put(base, table.clone(), now);
                });
                if stored {
                    info!(entries = table.len(), "Rates refreshed");
                } else {
                    debug!(seq = ticket.seq, "Newer request in flight, not caching");
                }

                Ok(RateSnapshot {
                    base,
                    table,
                    fetched_at: now,
                    provenance: Provenance::Fetched,
                })
            }
            Err(e) if e.is_transport() => match self.cache.get(base) {
                Some(entry) => {
                    warn!(
                        error = %e,
                        fetched_at = %entry.fetched_at,
                        "Rate fetch failed, serving last known rates"
                    );
                    Ok(RateSnapshot::from_entry(entry, Provenance::StaleFallback))
                }
                None => {
                    warn!(error = %e, "Rate fetch failed with nothing cached");
                    Err(e)
                }
            },
            Err(e) => Err(e),
        }
    }

    /// Get rates quoted against `base` as of the current time.
    pub async fn get_latest(&self, base: CurrencyCode) -> FxResult<RateSnapshot> {
        self.get_rates(base, now()).await
    }

    /// Rate board for `base`. With no multiplier, each row picks its own.
    pub async fn rate_board(
        &self,
        base: CurrencyCode,
        multiplier: Option<Multiplier>,
        now: Timestamp,
    ) -> FxResult<RateBoard> {
        let snapshot = self.get_rates(base, now).await?;
        let rows = conversion::rate_rows(&snapshot.table, multiplier);

        Ok(RateBoard {
            base,
            fetched_at: snapshot.fetched_at,
            provenance: snapshot.provenance,
            rows,
        })
    }

    /// Convert `amount` of `from` into `to` through the pivot currency.
    ///
    /// Always uses the pivot's table, whatever base the rate board shows.
    #[instrument(skip(self, now))]
    pub async fn convert(
        &self,
        from: CurrencyCode,
        to: CurrencyCode,
        amount: f64,
        now: Timestamp,
    ) -> FxResult<Conversion> {
        let pivot = self.config.pivot;
        let snapshot = self.get_rates(pivot, now).await?;
        let result = conversion::convert(from, to, amount, &snapshot.table)?;

        debug!(
            result = result.result_amount,
            effective_rate = result.effective_rate,
            "Conversion completed"
        );

        Ok(Conversion {
            from,
            to,
            amount,
            result,
            pivot,
            rates_fetched_at: snapshot.fetched_at,
            provenance: snapshot.provenance,
        })
    }

    /// Validate raw amount input, then convert.
    ///
    /// Invalid input fails before any rates are requested.
    pub async fn convert_input(
        &self,
        from: CurrencyCode,
        to: CurrencyCode,
        input: &str,
        now: Timestamp,
    ) -> FxResult<Conversion> {
        let amount = conversion::parse_amount(input)?;
        self.convert(from, to, amount, now).await
    }

    /// Currency every conversion routes through.
    pub fn pivot(&self) -> CurrencyCode {
        self.config.pivot
    }

    /// The cache backing this service.
    pub fn cache(&self) -> &SharedRateCache {
        &self.cache
    }

    /// Get cache statistics.
    pub fn stats(&self, now: Timestamp) -> CacheStats {
        self.cache.stats(now)
    }
}
