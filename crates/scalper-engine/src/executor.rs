//! Order sizing and placement.

use chrono::{DateTime, Utc};
use scalper_core::error::BrokerError;
use scalper_core::{Broker, OrderRequest, Side, Trade};
use scalper_data::TradeLog;
use scalper_risk::RiskManager;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Turns a signal into a market order and journals the accepted trade.
pub struct OrderExecutor {
    broker: Arc<dyn Broker>,
    risk: RiskManager,
    trade_log: TradeLog,
    symbol: String,
}

impl OrderExecutor {
    pub fn new(
        broker: Arc<dyn Broker>,
        risk: RiskManager,
        trade_log: TradeLog,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            broker,
            risk,
            trade_log,
            symbol: symbol.into(),
        }
    }

    /// Place a market order on `side` with stops `atr * multiplier` away.
    ///
    /// Buys enter at the ask, sells at the bid. When the account cannot be
    /// read the fallback lot is used. An accepted order is appended to the
    /// trade log; a rejected one leaves no trace but the returned error.
    pub async fn execute(
        &self,
        side: Side,
        atr: f64,
        now: DateTime<Utc>,
    ) -> Result<Trade, BrokerError> {
        let quote = self.broker.quote(&self.symbol).await?;
        let entry = quote.entry_price(side);

        let equity = match self.broker.account().await {
            Ok(account) => Some(account.equity),
            Err(e) => {
                warn!(error = %e, "Could not read account");
                None
            }
        };

        let plan = self.risk.plan_order(side, entry, atr, equity);
        let request = OrderRequest::market(
            &self.symbol,
            side,
            plan.volume,
            plan.entry_price,
            plan.levels.stop_loss,
            plan.levels.take_profit,
        );

        let result = self.broker.submit_order(request).await?;
        info!(
            ticket = result.ticket,
            %side,
            price = plan.entry_price,
            tp = plan.levels.take_profit,
            sl = plan.levels.stop_loss,
            volume = %plan.volume,
            "Order placed"
        );

        let trade = Trade {
            time: now,
            signal: side,
            entry_price: plan.entry_price,
            take_profit: plan.levels.take_profit,
            stop_loss: plan.levels.stop_loss,
            volume: plan.volume,
        };
        if let Err(e) = self.trade_log.append(&trade) {
            error!(error = %e, "Failed to write trade log");
        }

        Ok(trade)
    }
}
