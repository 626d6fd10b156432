//! Dashboard command implementation.

use anyhow::Result;
use chrono::Utc;
use scalper_config::AppConfig;
use scalper_data::{SignalLog, TradeLog};
use scalper_engine::{SnapshotLoader, SnapshotSettings};
use scalper_indicators::IndicatorEngine;
use scalper_monitor::Dashboard;
use std::time::Duration;
use tracing::warn;

use super::wiring::{self, PaperMode};
use crate::cli::DashboardArgs;

pub async fn run(args: DashboardArgs, config: AppConfig) -> Result<()> {
    let broker = wiring::broker(&config, args.paper, args.data.as_deref(), PaperMode::Static)?;
    if let Err(e) = broker.initialize().await {
        // Journals are still worth showing without live prices.
        warn!(error = %e, "Broker unavailable, proximity will show as missing");
    }

    let loader = SnapshotLoader::new(
        broker,
        IndicatorEngine::new(&config.indicators),
        config.signals,
        SignalLog::new(&config.journal.signal_log),
        TradeLog::new(&config.journal.trade_log),
        SnapshotSettings {
            symbol: config.trading.symbol.clone(),
            timeframe: config.trading.timeframe,
            history_bars: config.trading.history_bars,
            signal_lines: config.dashboard.signal_lines,
            trades: config.dashboard.trades,
        },
    );

    if args.once {
        print!("{}", loader.load(Utc::now()).await.render_text());
        return Ok(());
    }

    let refresh = Duration::from_secs(config.dashboard.refresh_secs);
    let handle = tokio::runtime::Handle::current();
    tokio::task::spawn_blocking(move || {
        Dashboard::new(refresh).run(|| handle.block_on(loader.load(Utc::now())))
    })
    .await??;

    Ok(())
}
