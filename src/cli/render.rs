//! Text rendering for command output.

use chrono::NaiveDate;
use std::fmt::Write;
use ticker_analysis::HistorySummary;
use ticker_core::types::PriceHistory;

fn date(d: NaiveDate) -> String {
    d.format("%d.%m.%Y").to_string()
}

/// Render a history summary.
pub fn summary(symbol: &str, summary: Option<&HistorySummary>) -> String {
    let Some(summary) = summary else {
        return format!("\n{}: no data available", symbol);
    };

    let mut s = String::new();
    let _ = writeln!(s, "\n{}", symbol);
    let _ = writeln!(s, "───────────────────────────────────────────────────────────");
    let _ = writeln!(
        s,
        "  Interval:         {} - {} ({} bars)",
        date(summary.start_date),
        date(summary.end_date),
        summary.bars
    );
    let _ = writeln!(
        s,
        "  Latest close:     ${:.2} ({})",
        summary.latest_close.price,
        date(summary.latest_close.date)
    );
    let _ = writeln!(
        s,
        "  High:             ${:.2} ({})",
        summary.high.price,
        date(summary.high.date)
    );
    let _ = write!(
        s,
        "  Low:              ${:.2} ({})",
        summary.low.price,
        date(summary.low.date)
    );

    if let Some(ytd) = &summary.ytd {
        let _ = write!(
            s,
            "\n  Year to date:     {:+}% (open ${:.2}, close ${:.2})",
            ytd.change_pct, ytd.start_open, ytd.latest_close
        );
    }

    s
}

/// Render every bar of a history.
pub fn bars(symbol: &str, history: &PriceHistory) -> String {
    if history.is_empty() {
        return format!("\n{}: no data available", symbol);
    }

    let mut s = String::new();
    let _ = writeln!(s, "\n{}", symbol);
    let _ = writeln!(
        s,
        "  {:<10}  {:>10}  {:>10}  {:>10}  {:>10}  {:>12}",
        "Date", "Open", "High", "Low", "Close", "Volume"
    );
    for bar in history.iter() {
        let _ = writeln!(
            s,
            "  {:<10}  {:>10.2}  {:>10.2}  {:>10.2}  {:>10.2}  {:>12.0}",
            date(bar.date()),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        );
    }
    s.pop();
    s
}
