//! CLI command implementations.

pub mod interactive;
pub mod quote;
pub mod range;
pub mod span;
pub mod validate;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use ticker_config::AppConfig;
use ticker_data::{CsvDataSource, HistoryCache, TickerService};

/// Build a CSV-backed service with a fresh cache.
pub(crate) fn build_service(
    data: Option<&Path>,
    config: &AppConfig,
) -> Result<TickerService<CsvDataSource>> {
    let dir = data.unwrap_or(config.data.source_dir.as_path());
    let source = CsvDataSource::new(dir).with_context(|| {
        format!(
            "Data directory '{}' does not exist. Provide a directory of <SYMBOL>.csv files with --data",
            dir.display()
        )
    })?;

    let cache = Arc::new(HistoryCache::new(config.cache.ttl()));
    Ok(TickerService::new(source, cache).with_default_span(config.data.default_span()?))
}
