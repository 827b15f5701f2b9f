//! History caching and data sources.

mod cache;
mod csv_source;
mod service;

pub use cache::{CacheEntry, CacheLookup, MissReason, RangeCache};
pub use csv_source::CsvDataSource;
pub use service::{normalize_keys, TickerService};

/// Cache of price histories keyed by upper-case symbol.
pub type HistoryCache = RangeCache<std::sync::Arc<ticker_core::types::PriceHistory>>;
