//! Configuration structures.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use ticker_core::error::{TickerError, TickerResult};
use ticker_core::types::{normalize_str, CanonicalSpan};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub data: DataSettings,
}

impl AppConfig {
    /// Check values the type system cannot.
    pub fn validate(&self) -> TickerResult<()> {
        self.cache.validate()?;
        self.data.default_span()?;
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(TickerError::Config(format!(
                "logging.format must be \"pretty\" or \"json\", got {:?}",
                self.logging.format
            )));
        }
        Ok(())
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "ticker".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Also write logs to this file
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// History cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Minutes a fetched history stays fresh.
    pub ttl_minutes: u32,
}

impl CacheSettings {
    /// Entry time-to-live.
    pub fn ttl(&self) -> Duration {
        Duration::minutes(i64::from(self.ttl_minutes))
    }

    fn validate(&self) -> TickerResult<()> {
        if self.ttl_minutes == 0 {
            return Err(TickerError::Config(
                "cache.ttl_minutes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl_minutes: 3 }
    }
}

/// Data source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSettings {
    /// Directory with one CSV file per symbol
    pub source_dir: PathBuf,
    /// Span used when a request has no canonical span
    pub default_span: String,
}

impl DataSettings {
    /// The default span, which must normalize to a canonical span.
    pub fn default_span(&self) -> TickerResult<CanonicalSpan> {
        normalize_str(&self.default_span)?.ok_or_else(|| {
            TickerError::Config(format!(
                "data.default_span {:?} has no canonical span",
                self.default_span
            ))
        })
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("data"),
            default_span: "1y".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache.ttl(), Duration::minutes(3));
        assert_eq!(config.data.default_span().unwrap(), CanonicalSpan::OneYear);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [cache]
            ttl_minutes = 10

            [data]
            source_dir = "/var/lib/ticker"
            default_span = "7mo"
            "#,
        )
        .unwrap();

        assert_eq!(config.cache.ttl(), Duration::minutes(10));
        assert_eq!(config.data.default_span().unwrap(), CanonicalSpan::OneYear);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let mut config = AppConfig::default();
        config.cache.ttl_minutes = 0;
        assert!(matches!(config.validate(), Err(TickerError::Config(_))));
    }

    #[test]
    fn test_default_span_must_be_canonical() {
        let mut config = AppConfig::default();
        config.data.default_span = "max".to_string();
        assert!(matches!(config.validate(), Err(TickerError::Config(_))));

        config.data.default_span = "1.5y".to_string();
        assert!(matches!(config.validate(), Err(TickerError::Span(_))));
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let mut config = AppConfig::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }
}
