//! Error types for ticker history lookups.

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum TickerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Span error: {0}")]
    Span(#[from] SpanError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Span specifier errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpanError {
    /// The specifier is not empty, `max`, `ytd` or a positive count followed by `d`, `mo` or `y`.
    #[error("Invalid span format: {0:?}")]
    InvalidFormat(String),
}

/// Data source errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for the requested range")]
    NoDataAvailable,

    #[error("Invalid span: {0}")]
    InvalidSpan(#[from] SpanError),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Data source error: {0}")]
    Internal(String),
}

/// Result type alias for ticker operations.
pub type TickerResult<T> = Result<T, TickerError>;
