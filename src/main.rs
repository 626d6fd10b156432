//! Scalping bot CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use scalper_config::{load_config, AppConfig, ConfigError};
use scalper_monitor::setup_logging;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let loaded = load_config(&cli.config);

    // Setup logging
    let logging = loaded.as_ref().map(|c| c.logging.clone()).unwrap_or_default();
    let interactive = matches!(&cli.command, Commands::Dashboard(args) if !args.once);
    let level = match &cli.log_level {
        // Stdout belongs to the TUI.
        _ if interactive => "off",
        Some(level) => level.as_str(),
        None => logging.level.as_str(),
    };
    let json = cli.json_logs || logging.format == "json";
    let _guard = setup_logging(level, json, logging.file.as_deref().map(Path::new));

    // Execute command
    match cli.command {
        Commands::Run(args) => cli::commands::run::run(args, ready(loaded, &cli.config)?).await,
        Commands::Dashboard(args) => {
            cli::commands::dashboard::run(args, ready(loaded, &cli.config)?).await
        }
        Commands::Optimize(args) => {
            cli::commands::optimize::run(args, ready(loaded, &cli.config)?).await
        }
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config, loaded).await,
    }
}

/// Loaded and validated configuration.
fn ready(loaded: Result<AppConfig, ConfigError>, path: &Path) -> Result<AppConfig> {
    let config = loaded.with_context(|| format!("Failed to load {}", path.display()))?;
    config.validate()?;
    Ok(config)
}
