//! Quote command implementation.

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use ticker_analysis::HistorySummary;
use ticker_config::AppConfig;
use tracing::info;

use super::build_service;
use crate::cli::render;
use crate::cli::QuoteArgs;

/// JSON row of the quote output; `summary` is null for symbols without data.
#[derive(Debug, Serialize)]
struct QuoteRow<'a> {
    symbol: &'a str,
    summary: Option<&'a HistorySummary>,
}

pub async fn run(args: QuoteArgs, config: &AppConfig) -> Result<()> {
    let service = build_service(args.data.as_deref(), config)?;
    let span = args.span.as_deref().unwrap_or(&config.data.default_span);

    let now = Utc::now();
    let histories = service.get_history(&args.symbols, span, now).await?;
    info!("Loaded history for {} symbols", histories.len());

    let summaries: Vec<(String, Option<HistorySummary>)> = histories
        .iter()
        .map(|(symbol, history)| (symbol.clone(), HistorySummary::from_history(history, now)))
        .collect();

    match args.output.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&json_rows(&summaries))?);
        }
        _ => {
            for (symbol, summary) in &summaries {
                println!("{}", render::summary(symbol, summary.as_ref()));
            }
        }
    }

    Ok(())
}

fn json_rows(summaries: &[(String, Option<HistorySummary>)]) -> Vec<QuoteRow<'_>> {
    summaries
        .iter()
        .map(|(symbol, summary)| QuoteRow {
            symbol,
            summary: summary.as_ref(),
        })
        .collect()
}
