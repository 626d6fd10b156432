//! Parameter sweep command implementation.

use anyhow::{Context, Result};
use scalper_backtest::{Outcome, ParameterSweep};
use scalper_config::AppConfig;
use scalper_core::Bar;
use scalper_data::load_csv;
use scalper_indicators::IndicatorEngine;
use std::path::{Path, PathBuf};
use tracing::info;

use super::wiring::{self, PaperMode};
use crate::cli::OptimizeArgs;

pub async fn run(args: OptimizeArgs, config: AppConfig) -> Result<()> {
    let bars = match &args.data {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Data file '{}' does not exist", path.display());
            }
            load_csv(path)?
        }
        None => fetch_from_broker(&config).await?,
    };
    info!(bars = bars.len(), "Loaded bars for the sweep");

    let mut sweep_config = config.sweep.clone();
    if args.barrier {
        sweep_config.outcome = Outcome::Barrier;
    }
    let sweep = ParameterSweep::new(
        sweep_config,
        config.signals,
        IndicatorEngine::new(&config.indicators),
    );
    let report = sweep.run(&bars);

    match args.output.as_str() {
        "json" => println!("{}", report.to_json()?),
        _ => println!("{}", report.summary()),
    }

    let save_path = args
        .save
        .unwrap_or_else(|| PathBuf::from(&config.journal.sweep_results));
    if is_json(&save_path) {
        std::fs::write(&save_path, report.to_json()?)?;
    } else {
        report.save_csv(&save_path)?;
    }
    info!("Results saved to {:?}", save_path);

    Ok(())
}

async fn fetch_from_broker(config: &AppConfig) -> Result<Vec<Bar>> {
    let broker = wiring::broker(config, false, None, PaperMode::Static)?;
    broker
        .initialize()
        .await
        .context("Could not connect to the trading terminal")?;
    let bars = broker
        .fetch_bars(
            &config.trading.symbol,
            config.trading.timeframe,
            config.trading.history_bars,
        )
        .await?;
    Ok(bars)
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
