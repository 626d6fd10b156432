//! Unified risk manager.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use scalper_core::{Position, ScalperError, ScalperResult, Side};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{breakeven_stop, tp_sl, PositionSizer, StopLevels};

/// Risk configuration (`[risk]` in the config file).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskParams {
    /// Percentage of equity risked per trade
    pub risk_percent: Decimal,
    /// ATR multiple used for both TP and SL distance
    pub tp_sl_multiplier: f64,
    /// Smallest lot the broker accepts
    pub min_lot: Decimal,
    /// Largest lot the bot will send
    pub max_lot: Decimal,
    /// Lot used when the account cannot be read
    pub default_lot: Decimal,
    /// Account-currency value of one price unit per lot
    pub pip_value: Decimal,
    /// ATR multiple of favourable move before the stop goes to entry
    pub breakeven_atr_multiplier: f64,
    /// Bars in the range-ATR window
    pub atr_window: usize,
}

impl Default for RiskParams {
    fn default() -> Self {
        Self {
            risk_percent: dec!(1),
            tp_sl_multiplier: 1.5,
            min_lot: dec!(0.01),
            max_lot: dec!(5.0),
            default_lot: dec!(0.5),
            pip_value: dec!(10),
            breakeven_atr_multiplier: 0.5,
            atr_window: 14,
        }
    }
}

impl RiskParams {
    /// Sanity-check the parameters.
    pub fn validate(&self) -> ScalperResult<()> {
        if self.risk_percent <= Decimal::ZERO || self.risk_percent > dec!(100) {
            return Err(ScalperError::Validation(format!(
                "risk_percent must be in (0, 100], got {}",
                self.risk_percent
            )));
        }
        if self.min_lot <= Decimal::ZERO || self.min_lot > self.max_lot {
            return Err(ScalperError::Validation(format!(
                "lot bounds invalid: min {} max {}",
                self.min_lot, self.max_lot
            )));
        }
        if self.default_lot < self.min_lot || self.default_lot > self.max_lot {
            return Err(ScalperError::Validation(format!(
                "default_lot {} outside lot bounds",
                self.default_lot
            )));
        }
        if self.tp_sl_multiplier <= 0.0 || self.breakeven_atr_multiplier <= 0.0 {
            return Err(ScalperError::Validation(
                "ATR multipliers must be positive".to_string(),
            ));
        }
        if self.pip_value <= Decimal::ZERO {
            return Err(ScalperError::Validation("pip_value must be positive".to_string()));
        }
        if self.atr_window == 0 {
            return Err(ScalperError::Validation("atr_window must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Everything needed to send a market order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPlan {
    pub side: Side,
    pub entry_price: f64,
    pub levels: StopLevels,
    pub volume: Decimal,
}

/// Combines TP/SL placement, lot sizing and the break-even rule.
#[derive(Debug, Clone)]
pub struct RiskManager {
    params: RiskParams,
    sizer: PositionSizer,
}

impl RiskManager {
    pub fn new(params: RiskParams) -> Self {
        let sizer = PositionSizer::new(params.risk_percent, params.pip_value)
            .with_lot_bounds(params.min_lot, params.max_lot);
        Self { params, sizer }
    }

    pub fn params(&self) -> &RiskParams {
        &self.params
    }

    /// Plan an order at `entry_price`.
    ///
    /// `equity` is `None` when the account could not be read, in which case
    /// the fallback lot is used.
    pub fn plan_order(
        &self,
        side: Side,
        entry_price: f64,
        atr: f64,
        equity: Option<Decimal>,
    ) -> OrderPlan {
        let levels = tp_sl(entry_price, atr, self.params.tp_sl_multiplier, side);
        let volume = match equity {
            Some(equity) => self.sizer.calculate(equity, entry_price, levels.stop_loss),
            None => {
                warn!(lot = %self.params.default_lot, "Account unavailable, using fallback lot");
                self.params.default_lot
            }
        };

        OrderPlan {
            side,
            entry_price,
            levels,
            volume,
        }
    }

    /// Break-even stop for `position`, if it qualifies.
    pub fn breakeven(&self, position: &Position, current_price: f64, atr: f64) -> Option<f64> {
        breakeven_stop(
            position,
            current_price,
            atr,
            self.params.breakeven_atr_multiplier,
        )
    }
}

impl Default for RiskManager {
    fn default() -> Self {
        Self::new(RiskParams::default())
    }
}
