//! History source trait definitions.

use crate::error::DataError;
use crate::types::{CanonicalSpan, PriceHistory};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Trait for providers of historical daily bars.
///
/// Implementations perform the actual retrieval (network, files). They are
/// never consulted by the cache itself, only by the retrieval layer after a
/// miss.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Fetch the last `span` of history for each symbol.
    ///
    /// # Arguments
    /// * `symbols` - Upper-case symbols to fetch
    /// * `span` - Canonical span of history to return
    ///
    /// # Returns
    /// A map from symbol to its history. Symbols the provider knows nothing
    /// about may be left out.
    async fn fetch_span(
        &self,
        symbols: &[String],
        span: CanonicalSpan,
    ) -> Result<HashMap<String, PriceHistory>, DataError>;

    /// Fetch history dated in `[start, end)` for each symbol.
    async fn fetch_range(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashMap<String, PriceHistory>, DataError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}
