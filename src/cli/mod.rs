//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "candleflow")]
#[command(author, version, about = "Real-time multi-timeframe candle aggregation engine")]
pub struct Cli {
    /// Configuration file path (defaults and environment when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (overrides the configured level)
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
    /// Run the live aggregation engine
    Run(RunArgs),
    /// List available models
    Models,
    /// Validate configuration
    CheckConfig,
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Instruments to aggregate (comma-separated, overrides config)
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub instruments: Vec<String>,

    /// Timeframes to form (comma-separated, overrides config)
    #[arg(short, long, value_delimiter = ',')]
    pub timeframes: Vec<String>,

    /// Models to run (comma-separated, overrides config)
    #[arg(short, long, value_delimiter = ',')]
    pub models: Vec<String>,

    /// Disable the paper execution sink
    #[arg(long)]
    pub no_exec: bool,
}
