//! Per-instrument history summary.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use ticker_core::types::{Bar, PriceHistory};

/// A price observed on a date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: f64,
    pub date: NaiveDate,
}

impl PricePoint {
    fn from_bar(bar: &Bar, price: f64) -> Self {
        Self {
            price,
            date: bar.date(),
        }
    }
}

/// Performance since the first bar of the current calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YtdPerformance {
    /// Open of the first bar this year
    pub start_open: f64,
    /// Latest close
    pub latest_close: f64,
    /// Change in percent, rounded to two decimals
    pub change_pct: Decimal,
}

/// Summary statistics of one price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    /// Symbol identifier
    pub symbol: String,
    /// Date of the oldest bar
    pub start_date: NaiveDate,
    /// Date of the newest bar
    pub end_date: NaiveDate,
    /// Number of bars
    pub bars: usize,
    /// Close of the newest bar
    pub latest_close: PricePoint,
    /// Highest high, earliest date on ties
    pub high: PricePoint,
    /// Lowest low, earliest date on ties
    pub low: PricePoint,
    /// Year-to-date performance relative to `now`'s year
    pub ytd: Option<YtdPerformance>,
}

impl HistorySummary {
    /// Summarize `history` as of `now`. Returns `None` for an empty history.
    pub fn from_history(history: &PriceHistory, now: DateTime<Utc>) -> Option<Self> {
        let first = history.first()?;
        let last = history.last()?;

        let mut high = first;
        let mut low = first;
        for bar in history.iter() {
            if bar.high > high.high {
                high = bar;
            }
            if bar.low < low.low {
                low = bar;
            }
        }

        let ytd = history
            .iter()
            .find(|bar| bar.date().year() == now.year())
            .and_then(|start| ytd_performance(start.open, last.close));

        Some(Self {
            symbol: history.symbol.clone(),
            start_date: first.date(),
            end_date: last.date(),
            bars: history.len(),
            latest_close: PricePoint::from_bar(last, last.close),
            high: PricePoint::from_bar(high, high.high),
            low: PricePoint::from_bar(low, low.low),
            ytd,
        })
    }
}

fn ytd_performance(start_open: f64, latest_close: f64) -> Option<YtdPerformance> {
    let open = Decimal::try_from(start_open).ok()?;
    let close = Decimal::try_from(latest_close).ok()?;
    if open.is_zero() {
        return None;
    }

    Some(YtdPerformance {
        start_open,
        latest_close,
        change_pct: ((close - open) / open * dec!(100)).round_dp(2),
    })
}
