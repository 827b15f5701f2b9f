//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, CacheSettings, DataSettings, LoggingConfig};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from file and environment.
///
/// Environment variables such as `TICKER__CACHE__TTL_MINUTES=10` override
/// values from the file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("TICKER")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}
