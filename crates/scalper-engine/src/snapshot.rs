//! Data for the dashboard, read fresh from the broker and the journals.

use chrono::{DateTime, Utc};
use scalper_core::{Broker, Timeframe};
use scalper_data::{SignalLog, TradeLog};
use scalper_indicators::IndicatorEngine;
use scalper_monitor::DashboardSnapshot;
use scalper_strategy::{Proximity, SignalRules};
use std::sync::Arc;
use tracing::warn;

/// What a snapshot covers.
#[derive(Debug, Clone)]
pub struct SnapshotSettings {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub history_bars: usize,
    /// Signal-log lines shown
    pub signal_lines: usize,
    /// Trades charted
    pub trades: usize,
}

/// Builds [`DashboardSnapshot`]s. Never fails: anything that cannot be
/// read shows up as missing data.
pub struct SnapshotLoader {
    broker: Arc<dyn Broker>,
    engine: IndicatorEngine,
    rules: SignalRules,
    signal_log: SignalLog,
    trade_log: TradeLog,
    settings: SnapshotSettings,
}

impl SnapshotLoader {
    pub fn new(
        broker: Arc<dyn Broker>,
        engine: IndicatorEngine,
        rules: SignalRules,
        signal_log: SignalLog,
        trade_log: TradeLog,
        settings: SnapshotSettings,
    ) -> Self {
        Self {
            broker,
            engine,
            rules,
            signal_log,
            trade_log,
            settings,
        }
    }

    pub async fn load(&self, now: DateTime<Utc>) -> DashboardSnapshot {
        DashboardSnapshot {
            symbol: self.settings.symbol.clone(),
            proximity: self.proximity().await.map(|p| (p.buy, p.sell)),
            signal_lines: self
                .signal_log
                .tail(self.settings.signal_lines)
                .unwrap_or_else(|e| {
                    warn!(error = %e, "Signal log unreadable");
                    vec![]
                }),
            trades: self
                .trade_log
                .tail(self.settings.trades)
                .unwrap_or_else(|e| {
                    warn!(error = %e, "Trade log unreadable");
                    vec![]
                }),
            updated: Some(now),
        }
    }

    async fn proximity(&self) -> Option<Proximity> {
        let bars = self
            .broker
            .fetch_bars(
                &self.settings.symbol,
                self.settings.timeframe,
                self.settings.history_bars,
            )
            .await
            .map_err(|e| warn!(error = %e, "Bar fetch failed"))
            .ok()?;
        Proximity::latest(&self.engine.compute(&bars), &self.rules)
    }
}
