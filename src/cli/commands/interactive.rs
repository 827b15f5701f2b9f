//! Interactive command implementation.

use anyhow::Result;
use chrono::Utc;
use std::io::Write;
use ticker_analysis::HistorySummary;
use ticker_config::AppConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use super::build_service;
use crate::cli::render;
use crate::cli::InteractiveArgs;

pub async fn run(args: InteractiveArgs, config: &AppConfig) -> Result<()> {
    let service = build_service(args.data.as_deref(), config)?;
    let span = args.span.unwrap_or_else(|| config.data.default_span.clone());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("Symbols to show (e.g. AAPL, NVDA; empty line to quit): ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            break;
        }

        let symbols: Vec<&str> = line.split(',').collect();
        let now = Utc::now();
        match service.get_history(&symbols, &span, now).await {
            Ok(histories) => {
                for (symbol, history) in &histories {
                    let summary = HistorySummary::from_history(history, now);
                    println!("{}", render::summary(symbol, summary.as_ref()));
                }
            }
            Err(e) => {
                warn!(error = %e, "lookup failed");
                println!("Lookup failed: {}", e);
            }
        }
        println!("({} symbols cached)", service.cache().len());
    }

    Ok(())
}
