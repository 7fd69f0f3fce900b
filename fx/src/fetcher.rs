//! Rate feed fetchers.

use async_trait::async_trait;
use dailyrate_common::{constants, CurrencyCode, DurationExt, RateTable};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::error::{FxError, FxResult};

/// Default rate feed location. Documents live at `{base}/{code}.json`.
pub const DEFAULT_BASE_URL: &str =
    "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1/currencies";

/// Source of rate tables for a base currency.
///
/// Implementations do not retry; retry and fallback policy belong to the caller.
#[async_trait]
pub trait RateFetcher: Send + Sync {
    /// Get the fetcher name.
    fn name(&self) -> &str;

    /// Fetch the current rate table quoted against `base`.
    async fn fetch(&self, base: CurrencyCode) -> FxResult<RateTable>;
}

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Feed root, without trailing `/{code}.json`.
    pub base_url: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: constants::request_timeout().as_std(),
        }
    }
}

/// Fetches rate documents from the JSON feed over HTTP.
pub struct HttpRateFetcher {
    client: Client,
    config: FetcherConfig,
}

impl HttpRateFetcher {
    /// Create a fetcher whose client applies the configured request timeout.
    pub fn new(config: FetcherConfig) -> FxResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| FxError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// URL of the rate document for `base`.
    pub fn url_for(&self, base: CurrencyCode) -> String {
        format!("{}/{}.json", self.config.base_url.trim_end_matches('/'), base)
    }
}

#[async_trait]
impl RateFetcher for HttpRateFetcher {
    fn name(&self) -> &str {
        "HTTP"
    }

    #[instrument(skip(self), fields(base = %base))]
    async fn fetch(&self, base: CurrencyCode) -> FxResult<RateTable> {
        let url = self.url_for(base);
        debug!(url = %url, "Fetching rate document");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FxError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Rate feed returned failure status");
            return Err(FxError::Http {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FxError::Network(e.to_string()))?;

        let document: Value = serde_json::from_str(&body)
            .map_err(|e| FxError::MalformedResponse(format!("invalid JSON: {}", e)))?;

        let table = extract_rate_table(base, &document)?;
        debug!(entries = table.len(), "Fetched rate table");
        Ok(table)
    }
}

/// Pull the rate table nested under the base currency's key.
pub fn extract_rate_table(base: CurrencyCode, document: &Value) -> FxResult<RateTable> {
    let nested = document.get(base.as_str()).ok_or_else(|| {
        FxError::MalformedResponse(format!("missing '{}' key", base.as_str()))
    })?;

    Ok(RateTable::from_json_object(base, nested)?)
}

/// Mock fetcher for testing.
///
/// Responses are queued per base currency. Each call takes the next queued
/// response; the last one repeats once the queue is down to one.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockRateFetcher {
    name: String,
    responses: dashmap::DashMap<CurrencyCode, std::collections::VecDeque<MockResponse>>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Clone)]
struct MockResponse {
    result: FxResult<RateTable>,
    delay: Duration,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockRateFetcher {
    /// Create a new mock fetcher.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            responses: dashmap::DashMap::new(),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Answer every fetch for the table's base with `table`.
    pub fn set_table(&self, table: RateTable) {
        self.responses.insert(
            table.base(),
            std::collections::VecDeque::from([MockResponse {
                result: Ok(table),
                delay: Duration::ZERO,
            }]),
        );
    }

    /// Answer every fetch for `base` with `error`.
    pub fn set_error(&self, base: CurrencyCode, error: FxError) {
        self.responses.insert(
            base,
            std::collections::VecDeque::from([MockResponse {
                result: Err(error),
                delay: Duration::ZERO,
            }]),
        );
    }

    /// Queue a response for `base`, delivered after `delay`.
    pub fn push_response(&self, base: CurrencyCode, result: FxResult<RateTable>, delay: Duration) {
        self.responses
            .entry(base)
            .or_default()
            .push_back(MockResponse { result, delay });
    }

    /// Number of fetches made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn next_response(&self, base: CurrencyCode) -> Option<MockResponse> {
        let mut queue = self.responses.get_mut(&base)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl RateFetcher for MockRateFetcher {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, base: CurrencyCode) -> FxResult<RateTable> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        let response = self
            .next_response(base)
            .ok_or_else(|| FxError::Http { status: 404 })?;

        if !response.delay.is_zero() {
            tokio::time::sleep(response.delay).await;
        }
        response.result
    }
}
