//! Summary statistics over price histories.

mod summary;

pub use summary::{HistorySummary, PricePoint, YtdPerformance};
