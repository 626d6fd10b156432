//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scalper")]
#[command(author, version, about = "XAU/USD scalping bot")]
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

#[derive(Clone, ValueEnum)]
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
    /// Start the trading loop
    Run(RunArgs),
    /// Show the live dashboard
    Dashboard(DashboardArgs),
    /// Sweep the TP/SL multiplier over historical bars
    Optimize(OptimizeArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Use the paper broker regardless of the config file
    #[arg(long)]
    pub paper: bool,

    /// Bar history (CSV) replayed by the paper broker
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Stop after this many cycles
    #[arg(long)]
    pub cycles: Option<usize>,
}

#[derive(clap::Args)]
pub struct DashboardArgs {
    /// Print one plain-text snapshot and exit
    #[arg(long)]
    pub once: bool,

    /// Use the paper broker regardless of the config file
    #[arg(long)]
    pub paper: bool,

    /// Bar history (CSV) for the paper broker
    #[arg(long)]
    pub data: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct OptimizeArgs {
    /// Data file (CSV); bars are fetched from the broker when omitted
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Score trades by first TP/SL touch instead of the close direction
    #[arg(long)]
    pub barrier: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub output: String,

    /// Save results to file (CSV, or JSON when the name ends in .json)
    #[arg(long)]
    pub save: Option<PathBuf>,
}
