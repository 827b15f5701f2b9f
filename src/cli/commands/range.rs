//! Range command implementation.

use anyhow::{bail, Result};
use ticker_config::AppConfig;

use super::build_service;
use crate::cli::render;
use crate::cli::RangeArgs;

pub async fn run(args: RangeArgs, config: &AppConfig) -> Result<()> {
    if args.start >= args.end {
        bail!("--start ({}) must be before --end ({})", args.start, args.end);
    }

    let service = build_service(args.data.as_deref(), config)?;
    let histories = service
        .get_history_between(&args.symbols, args.start, args.end)
        .await?;

    for (symbol, history) in &histories {
        println!("{}", render::bars(symbol, history));
    }

    Ok(())
}
