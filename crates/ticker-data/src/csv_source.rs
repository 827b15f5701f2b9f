//! CSV directory history source.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use ticker_core::error::DataError;
use ticker_core::traits::HistorySource;
use ticker_core::types::{coverage_start, Bar, CanonicalSpan, PriceHistory};
use tracing::{debug, warn};

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close")]
    close: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: f64,
}

/// History source reading one `<SYMBOL>.csv` file per symbol from a directory.
///
/// Files hold daily bars. Span queries are anchored at the newest bar in the
/// file, since offline data has no notion of "now".
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    dir: PathBuf,
}

impl CsvDataSource {
    /// Create a source over `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, DataError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(DataError::NoDataAvailable);
        }
        Ok(Self { dir })
    }

    /// Data directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Find the file holding `symbol`, trying `AAPL.csv`, `aapl.csv`,
    /// `AAPL_daily.csv` and `aapl_daily.csv`.
    fn file_for(&self, symbol: &str) -> Option<PathBuf> {
        let lower = symbol.to_lowercase();
        [
            format!("{}.csv", symbol),
            format!("{}.csv", lower),
            format!("{}_daily.csv", symbol),
            format!("{}_daily.csv", lower),
        ]
        .into_iter()
        .map(|name| self.dir.join(name))
        .find(|path| path.is_file())
    }

    /// Load the full history of `symbol`, or `None` when there is no file.
    pub async fn load(&self, symbol: &str) -> Result<Option<PriceHistory>, DataError> {
        let Some(path) = self.file_for(symbol) else {
            debug!(symbol, dir = %self.dir.display(), "no csv file");
            return Ok(None);
        };

        let bars = tokio::task::spawn_blocking(move || load_from_path(&path))
            .await
            .map_err(|e| DataError::Internal(e.to_string()))??;

        Ok(Some(PriceHistory::new(symbol, bars)))
    }

    async fn load_many(
        &self,
        symbols: &[String],
    ) -> Result<HashMap<String, PriceHistory>, DataError> {
        let mut histories = HashMap::with_capacity(symbols.len());
        for symbol in symbols {
            match self.load(symbol).await? {
                Some(history) => {
                    histories.insert(symbol.clone(), history);
                }
                None => warn!(symbol, "symbol not found in csv source"),
            }
        }
        Ok(histories)
    }
}

#[async_trait]
impl HistorySource for CsvDataSource {
    async fn fetch_span(
        &self,
        symbols: &[String],
        span: CanonicalSpan,
    ) -> Result<HashMap<String, PriceHistory>, DataError> {
        let mut histories = self.load_many(symbols).await?;
        for history in histories.values_mut() {
            if let Some(last) = history.last() {
                let start = coverage_start(span, last.datetime());
                *history = history.since(start);
            }
        }
        Ok(histories)
    }

    async fn fetch_range(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashMap<String, PriceHistory>, DataError> {
        let histories = self.load_many(symbols).await?;
        Ok(histories
            .into_iter()
            .map(|(symbol, history)| {
                let slice = history.between(start, end);
                (symbol, slice)
            })
            .collect())
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Load bars from a specific path.
fn load_from_path(path: &Path) -> Result<Vec<Bar>, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| DataError::ParseError(e.to_string()))?;

    let mut bars = Vec::new();

    for result in reader.deserialize() {
        let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;

        let timestamp = parse_timestamp(&record.date)?;

        bars.push(Bar::new(
            timestamp,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
        ));
    }

    Ok(bars)
}

/// Parse various timestamp formats into Unix milliseconds.
fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    let formats = [
        "%Y-%m-%d",
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%d.%m.%Y",
    ];

    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d.and_time(NaiveTime::MIN).and_utc().timestamp_millis());
        }
    }

    // Unix timestamp; milliseconds if > 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        if ts > 10_000_000_000 {
            return Ok(ts);
        }
        return ts.checked_mul(1000).ok_or_else(|| {
            DataError::ParseError(format!("Timestamp out of range: {}", date_str))
        });
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const AAPL_CSV: &str = "Date,Open,High,Low,Close,Volume
2025-01-02,100.0,101.0,99.0,100.5,1000
2025-06-02,110.0,112.0,108.0,111.0,1500
2025-11-20,120.0,125.0,118.0,124.0,2000
2025-12-10,124.0,126.0,122.0,125.0,1800
2025-12-15,125.0,127.0,124.0,126.5,1700
";

    fn fixture_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("AAPL.csv"), AAPL_CSV).unwrap();
        std::fs::write(dir.path().join("nvda_daily.csv"), AAPL_CSV).unwrap();
        dir
    }

    #[test]
    fn test_parse_timestamp() {
        assert!(parse_timestamp("2024-01-15").is_ok());
        assert!(parse_timestamp("2024-01-15 10:30:00").is_ok());
        assert!(parse_timestamp("15.01.2024").is_ok());
        assert_eq!(parse_timestamp("1705312800000").unwrap(), 1705312800000);
        assert_eq!(parse_timestamp("1705312800").unwrap(), 1705312800000);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_parse_timestamp_out_of_range() {
        assert!(matches!(
            parse_timestamp("-9999999999999999"),
            Err(DataError::ParseError(_))
        ));
        assert!(matches!(
            parse_timestamp(&i64::MIN.to_string()),
            Err(DataError::ParseError(_))
        ));
        assert_eq!(parse_timestamp("-86400").unwrap(), -86_400_000);
    }

    #[tokio::test]
    async fn test_out_of_range_timestamp_in_file() {
        let dir = fixture_dir();
        std::fs::write(
            dir.path().join("HUGE.csv"),
            "Date,Open,High,Low,Close\n-9999999999999999,1,1,1,1\n",
        )
        .unwrap();
        let source = CsvDataSource::new(dir.path()).unwrap();

        let result = source.fetch_span(&["HUGE".to_string()], CanonicalSpan::OneYear).await;
        assert!(matches!(result, Err(DataError::ParseError(_))));
    }

    #[test]
    fn test_missing_dir() {
        let dir = fixture_dir();
        let missing = dir.path().join("does-not-exist");
        assert!(matches!(CsvDataSource::new(missing), Err(DataError::NoDataAvailable)));
        assert!(CsvDataSource::new(dir.path()).is_ok());
    }

    #[tokio::test]
    async fn test_fetch_span_anchored_at_last_bar() {
        let dir = fixture_dir();
        let source = CsvDataSource::new(dir.path()).unwrap();
        let symbols = vec!["AAPL".to_string(), "NVDA".to_string(), "MSFT".to_string()];

        let histories = source.fetch_span(&symbols, CanonicalSpan::OneMonth).await.unwrap();

        assert_eq!(histories.len(), 2);
        assert!(!histories.contains_key("MSFT"));
        assert_eq!(histories["AAPL"].closes(), vec![124.0, 125.0, 126.5]);
        assert_eq!(histories["NVDA"].symbol, "NVDA");
    }

    #[tokio::test]
    async fn test_fetch_range() {
        let dir = fixture_dir();
        let source = CsvDataSource::new(dir.path()).unwrap();
        let symbols = vec!["AAPL".to_string()];
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();

        let histories = source.fetch_range(&symbols, start, end).await.unwrap();

        assert_eq!(histories["AAPL"].closes(), vec![111.0, 124.0, 125.0]);
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let dir = fixture_dir();
        std::fs::write(
            dir.path().join("BAD.csv"),
            "Date,Open,High,Low,Close\nnot-a-date,1,1,1,1\n",
        )
        .unwrap();
        let source = CsvDataSource::new(dir.path()).unwrap();

        let result = source.fetch_span(&["BAD".to_string()], CanonicalSpan::OneYear).await;
        assert!(matches!(result, Err(DataError::ParseError(_))));
    }
}
