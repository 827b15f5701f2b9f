//! CLI definitions.

pub mod commands;
pub mod render;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ticker")]
#[command(author, version, about = "Cached historical price lookups")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (overrides the config file)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show history summaries for symbols
    Quote(QuoteArgs),
    /// Show history between two dates (not cached)
    Range(RangeArgs),
    /// Query symbols repeatedly from stdin, sharing one cache
    Interactive(InteractiveArgs),
    /// Show how span specifiers are normalized
    Span(SpanArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct QuoteArgs {
    /// Symbols to look up (comma-separated)
    #[arg(short = 'S', long, value_delimiter = ',', required = true)]
    pub symbols: Vec<String>,

    /// Span of history, e.g. 5d, 3mo, 1y, ytd, max
    #[arg(short, long)]
    pub span: Option<String>,

    /// Data directory (defaults to data.source_dir)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub output: String,
}

#[derive(clap::Args)]
pub struct RangeArgs {
    /// Symbols to look up (comma-separated)
    #[arg(short = 'S', long, value_delimiter = ',', required = true)]
    pub symbols: Vec<String>,

    /// Start date (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub start: NaiveDate,

    /// End date (YYYY-MM-DD), exclusive
    #[arg(long)]
    pub end: NaiveDate,

    /// Data directory (defaults to data.source_dir)
    #[arg(long)]
    pub data: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct InteractiveArgs {
    /// Span of history, e.g. 5d, 3mo, 1y, ytd, max
    #[arg(short, long)]
    pub span: Option<String>,

    /// Data directory (defaults to data.source_dir)
    #[arg(long)]
    pub data: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct SpanArgs {
    /// Span specifiers to normalize
    #[arg(required = true)]
    pub specs: Vec<String>,
}
