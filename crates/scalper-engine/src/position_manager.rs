//! Break-even stop management for open positions.

use scalper_core::Broker;
use scalper_monitor::{notify, Notifier};
use scalper_risk::RiskManager;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Moves stops to entry once a position has run far enough.
pub struct PositionManager {
    broker: Arc<dyn Broker>,
    risk: RiskManager,
    notifier: Arc<dyn Notifier>,
    symbol: String,
}

impl PositionManager {
    pub fn new(
        broker: Arc<dyn Broker>,
        risk: RiskManager,
        notifier: Arc<dyn Notifier>,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            broker,
            risk,
            notifier,
            symbol: symbol.into(),
        }
    }

    /// Check every open position on the symbol against the break-even rule.
    ///
    /// Buys are measured at the bid and sells at the ask. Each accepted move
    /// sends one alert. Rejections are logged and retried on the next call.
    ///
    /// # Returns
    /// Tickets whose stop was moved.
    pub async fn manage(&self, atr: f64) -> Vec<u64> {
        let positions = match self.broker.positions(&self.symbol).await {
            Ok(positions) => positions,
            Err(e) => {
                warn!(error = %e, "Could not list positions");
                return vec![];
            }
        };
        if positions.is_empty() {
            return vec![];
        }

        let quote = match self.broker.quote(&self.symbol).await {
            Ok(quote) => quote,
            Err(e) => {
                warn!(error = %e, "No quote for break-even check");
                return vec![];
            }
        };

        let mut moved = Vec::new();
        for position in &positions {
            let current = quote.exit_price(position.side);
            let Some(new_stop) = self.risk.breakeven(position, current, atr) else {
                debug!(ticket = position.ticket, current, "Break-even not reached");
                continue;
            };

            match self.broker.modify_stop_loss(position, new_stop).await {
                Ok(_) => {
                    info!(ticket = position.ticket, sl = new_stop, "Stop moved to break-even");
                    let text = format!(
                        "🔔 SL moved to break-even for position {} on {}",
                        position.ticket, self.symbol
                    );
                    notify(self.notifier.as_ref(), &text).await;
                    moved.push(position.ticket);
                }
                Err(e) => {
                    error!(
                        ticket = position.ticket,
                        retcode = e.retcode(),
                        error = %e,
                        "Break-even modification rejected"
                    );
                }
            }
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{flat_bars, RecordingNotifier, SYMBOL};
    use rust_decimal_macros::dec;
    use scalper_broker::{PaperBroker, RETCODE_INVALID_STOPS};
    use scalper_core::Side;
    use scalper_risk::RiskParams;

    /// Bid 1999.90, ask 2000.10.
    fn setup() -> (PaperBroker, Arc<RecordingNotifier>, PositionManager) {
        let broker = PaperBroker::new(SYMBOL, flat_bars(50, 2000.0), dec!(10000));
        let notifier = Arc::new(RecordingNotifier::default());
        let manager = PositionManager::new(
            Arc::new(broker.clone()),
            RiskManager::new(RiskParams::default()),
            notifier.clone(),
            SYMBOL,
        );
        (broker, notifier, manager)
    }

    #[tokio::test]
    async fn test_moves_buy_stop_once() {
        let (broker, notifier, manager) = setup();
        // Needs bid >= 1995 + 0.5 * 2 = 1996.
        let ticket = broker.open_position(Side::Buy, dec!(0.1), 1995.0, 1990.0, 2010.0);

        assert_eq!(manager.manage(2.0).await, vec![ticket]);
        assert_eq!(broker.open_positions()[0].stop_loss, 1995.0);
        assert_eq!(
            notifier.messages(),
            vec![format!("🔔 SL moved to break-even for position {} on XAUUSD", ticket)]
        );

        // Stop already at entry: nothing to do.
        assert!(manager.manage(2.0).await.is_empty());
        assert_eq!(broker.modify_calls(), 1);
        assert_eq!(notifier.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_sell_uses_ask() {
        let (broker, _notifier, manager) = setup();
        // Ask 2000.10 must be <= 2001 - 1 = 2000.00: not yet.
        broker.open_position(Side::Sell, dec!(0.1), 2001.0, 2006.0, 1990.0);
        assert!(manager.manage(2.0).await.is_empty());

        // 2003 - 1 = 2002 >= 2000.10.
        let ticket = broker.open_position(Side::Sell, dec!(0.1), 2003.0, 2008.0, 1990.0);
        assert_eq!(manager.manage(2.0).await, vec![ticket]);
    }

    #[tokio::test]
    async fn test_rejection_is_retried_next_call() {
        let (broker, notifier, manager) = setup();
        broker.open_position(Side::Buy, dec!(0.1), 1995.0, 1990.0, 2010.0);
        broker.reject_modifications(RETCODE_INVALID_STOPS, "Invalid stops");

        assert!(manager.manage(2.0).await.is_empty());
        assert_eq!(broker.open_positions()[0].stop_loss, 1990.0);
        assert!(notifier.messages().is_empty());

        broker.accept_modifications();
        assert_eq!(manager.manage(2.0).await.len(), 1);
        assert_eq!(broker.modify_calls(), 2);
    }

    #[tokio::test]
    async fn test_no_positions() {
        let (broker, _notifier, manager) = setup();
        assert!(manager.manage(2.0).await.is_empty());
        assert_eq!(broker.modify_calls(), 0);
    }
}
