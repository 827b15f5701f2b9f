//! Core types and traits for cached ticker history.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, PriceHistory)
//! - Span requests and their canonical buckets (the span normalizer)
//! - Coverage start computation for a span at a reference instant
//! - The history source trait implemented by data providers

pub mod types;
pub mod traits;
pub mod error;

pub use error::{TickerError, TickerResult};
pub use types::*;
pub use traits::*;
