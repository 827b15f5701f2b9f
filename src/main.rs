//! Ticker history CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use ticker_config::{load_config, AppConfig};
use ticker_monitor::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = if cli.config.exists() {
        load_config(&cli.config)
            .with_context(|| format!("Failed to load config from {}", cli.config.display()))?
    } else {
        AppConfig::default()
    };
    if let Some(level) = cli.log_level {
        config.logging.level = level.as_str().to_string();
    }
    if cli.json_logs {
        config.logging.format = "json".to_string();
    }
    config.validate()?;

    // Setup logging
    let _guard = setup_logging(&config.logging);

    // Execute command
    match cli.command {
        Commands::Quote(args) => cli::commands::quote::run(args, &config).await,
        Commands::Range(args) => cli::commands::range::run(args, &config).await,
        Commands::Interactive(args) => cli::commands::interactive::run(args, &config).await,
        Commands::Span(args) => cli::commands::span::run(args).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
    }
}
