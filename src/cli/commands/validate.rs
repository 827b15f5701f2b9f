//! Validate configuration command.

use anyhow::Result;
use std::path::Path;
use ticker_config::load_config;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Cache TTL: {} minutes", config.cache.ttl_minutes);
    println!("Data directory: {}", config.data.source_dir.display());
    println!("Default span: {}", config.data.default_span);

    Ok(())
}
