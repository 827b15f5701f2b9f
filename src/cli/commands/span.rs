//! Span command implementation.

use anyhow::{bail, Result};
use chrono::Utc;
use ticker_core::types::{min_coverage_date, Coverage, SpanRequest};

use crate::cli::SpanArgs;

pub async fn run(args: SpanArgs) -> Result<()> {
    let now = Utc::now();
    let mut invalid = 0;

    for spec in &args.specs {
        let resolved = spec
            .parse::<SpanRequest>()
            .and_then(|request| Ok((request.normalize()?, min_coverage_date(&request, now)?)));

        match resolved {
            Ok((canonical, coverage)) => {
                let canonical = canonical.map_or("max", |s| s.as_str());
                let coverage = match coverage {
                    Coverage::Since(start) => start.format("%Y-%m-%d").to_string(),
                    Coverage::Unbounded => "unbounded".to_string(),
                };
                println!("{:>8}  ->  {:<4}  covers from {}", spec, canonical, coverage);
            }
            Err(e) => {
                invalid += 1;
                println!("{:>8}  ->  {}", spec, e);
            }
        }
    }

    if invalid > 0 {
        bail!("{} invalid span specifier(s)", invalid);
    }
    Ok(())
}
