//! OHLCV (Open, High, Low, Close, Volume) data types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Daily OHLCV bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Calendar date of the bar.
    pub fn date(&self) -> NaiveDate {
        self.datetime().date_naive()
    }
}

/// Price history of one instrument, ordered from oldest to newest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    /// Symbol identifier
    pub symbol: String,
    bars: Vec<Bar>,
}

impl PriceHistory {
    /// Create a history, sorting the bars by timestamp.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    /// Create an empty history.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self::new(symbol, Vec::new())
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the history is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars as a slice.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Get the first (oldest) bar.
    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    /// Get the last (newest) bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Keep bars at or after `start`.
    pub fn since(&self, start: DateTime<Utc>) -> Self {
        let start = start.timestamp_millis();
        Self {
            symbol: self.symbol.clone(),
            bars: self.bars.iter().filter(|b| b.timestamp >= start).copied().collect(),
        }
    }

    /// Keep bars dated in `[start, end)`.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            symbol: self.symbol.clone(),
            bars: self
                .bars
                .iter()
                .filter(|b| {
                    let date = b.date();
                    date >= start && date < end
                })
                .copied()
                .collect(),
        }
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}
