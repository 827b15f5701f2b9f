//! Cached history retrieval.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use ticker_core::error::DataError;
use ticker_core::traits::HistorySource;
use ticker_core::types::{CanonicalSpan, PriceHistory, SpanRequest};
use tracing::{debug, info, warn};

use crate::cache::CacheLookup;
use crate::HistoryCache;

/// Trim, upper-case and de-duplicate ticker symbols, dropping empty ones.
/// The first occurrence keeps its position.
pub fn normalize_keys<T: AsRef<str>>(tickers: &[T]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::with_capacity(tickers.len());
    for ticker in tickers {
        let key = ticker.as_ref().trim().to_uppercase();
        if !key.is_empty() && !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

/// Retrieval layer that serves histories from a [`HistoryCache`] and fetches
/// misses from a [`HistorySource`] in one batch.
///
/// The cache is shared explicitly so several services (or the caller) can
/// inspect, invalidate or clear it. Concurrent misses on the same symbol
/// are not coalesced and may fetch twice.
pub struct TickerService<S> {
    source: S,
    cache: Arc<HistoryCache>,
    default_span: CanonicalSpan,
}

impl<S: HistorySource> TickerService<S> {
    /// Create a service; unbounded requests fall back to one year.
    pub fn new(source: S, cache: Arc<HistoryCache>) -> Self {
        Self {
            source,
            cache,
            default_span: CanonicalSpan::OneYear,
        }
    }

    /// Set the span used for requests without a canonical span.
    pub fn with_default_span(mut self, span: CanonicalSpan) -> Self {
        self.default_span = span;
        self
    }

    /// The shared cache.
    pub fn cache(&self) -> &Arc<HistoryCache> {
        &self.cache
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get the last `span` of history for each ticker as of `now`.
    ///
    /// Results follow the order of the normalized tickers. Symbols the source
    /// has no data for map to an empty history, which is cached like any
    /// other.
    ///
    /// # Errors
    /// [`DataError::InvalidSpan`] for a malformed `span`, or whatever the
    /// source returns when fetching the misses. Nothing is cached on error.
    pub async fn get_history<T: AsRef<str>>(
        &self,
        tickers: &[T],
        span: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<(String, Arc<PriceHistory>)>, DataError> {
        let keys = normalize_keys(tickers);
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let span = span
            .parse::<SpanRequest>()?
            .normalize()?
            .unwrap_or(self.default_span);
        let request = span.request();

        let mut found: HashMap<String, Arc<PriceHistory>> = HashMap::with_capacity(keys.len());
        let mut missing = Vec::new();
        for key in &keys {
            match self.cache.get(key, &request, now)? {
                CacheLookup::Hit(history) => {
                    found.insert(key.clone(), history);
                }
                CacheLookup::Miss(reason) => {
                    debug!(key = key.as_str(), ?reason, "history not cached");
                    missing.push(key.clone());
                }
            }
        }

        if !missing.is_empty() {
            info!(source = self.source.name(), count = missing.len(), %span, "fetching history");

            let mut fetched = self
                .source
                .fetch_span(&missing, span)
                .await
                .map_err(|e| {
                    warn!(source = self.source.name(), error = %e, "history fetch failed");
                    e
                })?;

            let updated: Vec<(String, Arc<PriceHistory>)> = missing
                .into_iter()
                .map(|key| {
                    let history = fetched
                        .remove(&key)
                        .unwrap_or_else(|| PriceHistory::empty(key.clone()));
                    (key, Arc::new(history))
                })
                .collect();

            self.cache.set_many(
                updated.iter().map(|(key, history)| (key.clone(), Arc::clone(history))),
                &request,
                now,
            )?;
            found.extend(updated);
        }

        Ok(keys
            .into_iter()
            .filter_map(|key| found.remove(&key).map(|history| (key, history)))
            .collect())
    }

    /// Get history dated in `[start, end)` for each ticker, bypassing the cache.
    pub async fn get_history_between<T: AsRef<str>>(
        &self,
        tickers: &[T],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(String, PriceHistory)>, DataError> {
        let keys = normalize_keys(tickers);
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        info!(
            source = self.source.name(),
            count = keys.len(),
            %start,
            %end,
            "fetching history range"
        );
        let mut fetched = self.source.fetch_range(&keys, start, end).await?;

        Ok(keys
            .into_iter()
            .map(|key| {
                let history = fetched
                    .remove(&key)
                    .unwrap_or_else(|| PriceHistory::empty(key.clone()));
                (key, history)
            })
            .collect())
    }
}
