//! Core data types.

mod coverage;
mod ohlcv;
mod span;

pub use coverage::{coverage_start, min_coverage_date, Coverage};
pub use ohlcv::{Bar, PriceHistory};
pub use span::{normalize, normalize_str, CanonicalSpan, SpanRequest, SpanUnit};
