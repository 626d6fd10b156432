//! Trading loop command implementation.

use anyhow::{Context, Result};
use scalper_config::AppConfig;
use scalper_core::SystemClock;
use scalper_data::{SignalLog, TradeLog};
use scalper_engine::{OrderExecutor, PositionManager, Scheduler, Trader, TraderSettings};
use scalper_indicators::IndicatorEngine;
use scalper_monitor::AlertPolicy;
use scalper_risk::RiskManager;
use scalper_strategy::SignalGenerator;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use super::wiring::{self, PaperMode};
use crate::cli::RunArgs;

pub async fn run(args: RunArgs, config: AppConfig) -> Result<()> {
    let symbol = config.trading.symbol.clone();
    let broker = wiring::broker(&config, args.paper, args.data.as_deref(), PaperMode::Replay)?;
    let notifier = wiring::notifier(&config)?;
    let risk = RiskManager::new(config.risk.clone());

    let trader = Trader::new(
        TraderSettings {
            symbol: symbol.clone(),
            timeframe: config.trading.timeframe,
            history_bars: config.trading.history_bars,
            atr_window: config.risk.atr_window,
        },
        broker.clone(),
        Arc::new(SystemClock),
        notifier.clone(),
        IndicatorEngine::new(&config.indicators),
        SignalGenerator::new(config.signals, SignalLog::new(&config.journal.signal_log)),
        OrderExecutor::new(
            broker.clone(),
            risk.clone(),
            TradeLog::new(&config.journal.trade_log),
            &symbol,
        ),
        PositionManager::new(broker, risk, notifier, &symbol),
        AlertPolicy {
            threshold: config.alerts.threshold,
            cooldown: chrono::Duration::seconds(config.alerts.cooldown_secs as i64),
        },
    );

    trader
        .initialize()
        .await
        .context("Could not connect to the trading terminal")?;

    let mut scheduler = Scheduler::new(
        trader,
        Duration::from_secs(config.trading.poll_interval_secs),
    );
    if let Some(cycles) = args.cycles {
        scheduler = scheduler.with_max_cycles(cycles);
    }

    info!(
        %symbol,
        interval_secs = config.trading.poll_interval_secs,
        "Scalper started, press Ctrl+C to stop"
    );

    let cycles = scheduler
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Cannot listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        })
        .await;

    info!(cycles, "Scalper stopped");
    Ok(())
}
