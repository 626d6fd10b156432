//! One polling cycle of the bot.

use scalper_core::error::BrokerError;
use scalper_core::{Broker, Clock, Signal, Timeframe, Trade};
use scalper_indicators::{atr_proxy, IndicatorEngine};
use scalper_monitor::{evaluate, notify, AlertPolicy, AlertState, Notifier};
use scalper_strategy::{Proximity, SignalGenerator};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::{OrderExecutor, PositionManager};

/// What the trader polls.
#[derive(Debug, Clone)]
pub struct TraderSettings {
    pub symbol: String,
    pub timeframe: Timeframe,
    /// Bars fetched per cycle
    pub history_bars: usize,
    /// Window of the range ATR used for stops and break-even
    pub atr_window: usize,
}

/// Outcome of one cycle, for logging and tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    /// `true` when no bars or no indicator rows were available
    pub skipped: bool,
    pub signal: Option<Signal>,
    pub proximity: Option<Proximity>,
    pub alerts_sent: usize,
    pub trade: Option<Trade>,
    /// Tickets moved to break-even
    pub breakeven: Vec<u64>,
}

impl CycleReport {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Default::default()
        }
    }
}

/// Fetch, compute, decide and act, once per call.
pub struct Trader {
    broker: Arc<dyn Broker>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    engine: IndicatorEngine,
    generator: SignalGenerator,
    executor: OrderExecutor,
    positions: PositionManager,
    alert_policy: AlertPolicy,
    alert_state: AlertState,
    settings: TraderSettings,
}

impl Trader {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        settings: TraderSettings,
        broker: Arc<dyn Broker>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        engine: IndicatorEngine,
        generator: SignalGenerator,
        executor: OrderExecutor,
        positions: PositionManager,
        alert_policy: AlertPolicy,
    ) -> Self {
        Self {
            broker,
            clock,
            notifier,
            engine,
            generator,
            executor,
            positions,
            alert_policy,
            alert_state: AlertState::default(),
            settings,
        }
    }

    /// Connect to the terminal. Failure here should abort the process.
    pub async fn initialize(&self) -> Result<(), BrokerError> {
        self.broker.initialize().await?;
        info!(
            broker = self.broker.name(),
            symbol = %self.settings.symbol,
            timeframe = %self.settings.timeframe,
            "Broker connected"
        );
        Ok(())
    }

    pub fn alert_state(&self) -> AlertState {
        self.alert_state
    }

    /// Run one cycle.
    ///
    /// Missing data skips the cycle without touching the signal log. Broker
    /// failures after that point are logged and the cycle carries on.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let symbol = self.settings.symbol.clone();

        let bars = match self
            .broker
            .fetch_bars(&symbol, self.settings.timeframe, self.settings.history_bars)
            .await
        {
            Ok(bars) => bars,
            Err(e) => {
                warn!(error = %e, "Bar fetch failed, skipping cycle");
                return CycleReport::skipped();
            }
        };
        let rows = self.engine.compute(&bars);
        if rows.is_empty() {
            debug!(bars = bars.len(), "Not enough data, skipping cycle");
            return CycleReport::skipped();
        }

        let now = self.clock.now();
        let mut report = CycleReport {
            signal: self.generator.generate(&rows, now),
            proximity: Proximity::latest(&rows, self.generator.rules()),
            ..Default::default()
        };

        if let Some(proximity) = report.proximity {
            let (state, alerts) = evaluate(
                self.alert_state,
                &symbol,
                proximity.buy,
                proximity.sell,
                &self.alert_policy,
                now,
            );
            self.alert_state = state;
            for alert in &alerts {
                notify(self.notifier.as_ref(), &alert.message()).await;
            }
            report.alerts_sent = alerts.len();
        }

        let atr = atr_proxy(&rows, self.settings.atr_window);

        if let Some(side) = report.signal.and_then(|s| s.direction) {
            match atr {
                Some(atr) => match self.executor.execute(side, atr, now).await {
                    Ok(trade) => report.trade = Some(trade),
                    Err(e) => error!(
                        %side,
                        retcode = e.retcode(),
                        error = %e,
                        "Order failed"
                    ),
                },
                None => warn!(%side, "Not enough history for ATR, order skipped"),
            }
        }

        if let Some(atr) = atr {
            report.breakeven = self.positions.manage(atr).await;
        }

        report
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::testing::{flat_bars, sell_setup, FixedClock, RecordingNotifier, SYMBOL};
    use rust_decimal_macros::dec;
    use scalper_broker::PaperBroker;
    use scalper_core::Side;
    use scalper_data::{SignalLog, TradeLog};
    use scalper_risk::{RiskManager, RiskParams};
    use scalper_strategy::SignalRules;

    pub(crate) struct Harness {
        pub broker: PaperBroker,
        pub clock: Arc<FixedClock>,
        pub notifier: Arc<RecordingNotifier>,
        pub signal_log: SignalLog,
        pub trade_log: TradeLog,
        pub trader: Trader,
        _dir: tempfile::TempDir,
    }

    pub(crate) fn harness(broker: PaperBroker) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let signal_log = SignalLog::new(dir.path().join("signals.txt"));
        let trade_log = TradeLog::new(dir.path().join("trades.csv"));
        let clock = Arc::new(FixedClock::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let shared: Arc<dyn Broker> = Arc::new(broker.clone());
        let risk = RiskManager::new(RiskParams::default());

        let trader = Trader::new(
            TraderSettings {
                symbol: SYMBOL.to_string(),
                timeframe: Timeframe::M1,
                history_bars: 1000,
                atr_window: 14,
            },
            shared.clone(),
            clock.clone(),
            notifier.clone(),
            IndicatorEngine::default(),
            SignalGenerator::new(SignalRules::default(), signal_log.clone()),
            OrderExecutor::new(shared.clone(), risk.clone(), trade_log.clone(), SYMBOL),
            PositionManager::new(shared, risk, notifier.clone(), SYMBOL),
            AlertPolicy::default(),
        );

        Harness {
            broker,
            clock,
            notifier,
            signal_log,
            trade_log,
            trader,
            _dir: dir,
        }
    }

    #[tokio::test]
    async fn test_empty_bars_skip_cycle() {
        let mut h = harness(PaperBroker::new(SYMBOL, vec![], dec!(10000)));

        let report = h.trader.run_cycle().await;
        assert!(report.skipped);
        assert!(h.signal_log.tail(10).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_quiet_market_logs_none() {
        let mut h = harness(PaperBroker::new(SYMBOL, flat_bars(120, 2000.0), dec!(10000)));

        let report = h.trader.run_cycle().await;
        assert!(!report.skipped);
        assert_eq!(report.signal.and_then(|s| s.direction), None);
        assert!(report.trade.is_none());

        let lines = h.signal_log.tail(10).unwrap();
        assert_eq!(
            lines,
            vec!["2024-05-02 09:00:00.000000 - Signal: none | Price: 2000.00".to_string()]
        );
        assert!(h.trade_log.read_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sell_signal_places_order_and_alerts() {
        let mut h = harness(PaperBroker::new(SYMBOL, sell_setup(), dec!(10000)));

        let report = h.trader.run_cycle().await;
        let signal = report.signal.unwrap();
        assert_eq!(signal.direction, Some(Side::Sell));

        let trade = report.trade.clone().unwrap();
        assert_eq!(trade.signal, Side::Sell);
        assert!(trade.stop_loss > trade.entry_price);
        assert_eq!(h.trade_log.read_all().unwrap(), vec![trade]);
        assert_eq!(h.broker.open_positions().len(), 1);

        // Sell proximity is far above 90; buy is not.
        assert_eq!(report.alerts_sent, 1);
        assert!(h.notifier.messages()[0].contains("SELL signal close"));
        assert!(h.trader.alert_state().last_sell.is_some());
        assert!(h.trader.alert_state().last_buy.is_none());
    }

    #[tokio::test]
    async fn test_alert_cooldown_across_cycles() {
        let mut h = harness(PaperBroker::new(SYMBOL, sell_setup(), dec!(10000)));

        assert_eq!(h.trader.run_cycle().await.alerts_sent, 1);
        h.clock.advance(15);
        assert_eq!(h.trader.run_cycle().await.alerts_sent, 0);
        h.clock.advance(45);
        assert_eq!(h.trader.run_cycle().await.alerts_sent, 1);
    }

    #[tokio::test]
    async fn test_order_rejection_keeps_looping() {
        let mut h = harness(PaperBroker::new(SYMBOL, sell_setup(), dec!(10000)));
        h.broker
            .reject_orders(scalper_broker::RETCODE_INVALID_VOLUME, "Invalid volume");

        let report = h.trader.run_cycle().await;
        assert!(report.signal.unwrap().is_actionable());
        assert!(report.trade.is_none());
        assert!(h.trade_log.read_all().unwrap().is_empty());
        assert_eq!(h.signal_log.tail(10).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_breakeven_runs_every_cycle() {
        let mut h = harness(PaperBroker::new(SYMBOL, flat_bars(120, 2000.0), dec!(10000)));
        // Flat bars: ATR proxy 0.2, threshold 0.1; bid 1999.90.
        let ticket = h
            .broker
            .open_position(Side::Buy, dec!(0.1), 1999.0, 1995.0, 2010.0);

        let report = h.trader.run_cycle().await;
        assert_eq!(report.breakeven, vec![ticket]);
        assert!(h.notifier.messages()[0].contains("break-even"));
    }
}
