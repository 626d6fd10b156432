//! Lot sizing.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

/// Smallest stop distance used for sizing, in price units.
pub const MIN_STOP_DISTANCE: f64 = 0.01;

/// Risk-based lot sizer.
///
/// `lot = clamp(round(equity * risk% / (stop_distance * pip_value), 2), min, max)`
#[derive(Debug, Clone)]
pub struct PositionSizer {
    risk_percent: Decimal,
    pip_value: Decimal,
    min_lot: Decimal,
    max_lot: Decimal,
}

impl PositionSizer {
    /// Create a new sizer.
    pub fn new(risk_percent: Decimal, pip_value: Decimal) -> Self {
        Self {
            risk_percent,
            pip_value,
            min_lot: dec!(0.01),
            max_lot: dec!(5.0),
        }
    }

    /// Set the lot bounds.
    pub fn with_lot_bounds(mut self, min_lot: Decimal, max_lot: Decimal) -> Self {
        self.min_lot = min_lot;
        self.max_lot = max_lot;
        self
    }

    /// Calculate the order volume for the given entry and stop.
    ///
    /// Rounds half to even at two decimals, then clamps to the lot bounds.
    pub fn calculate(&self, equity: Decimal, entry_price: f64, stop_loss: f64) -> Decimal {
        let distance = (entry_price - stop_loss).abs().max(MIN_STOP_DISTANCE);
        let stop_distance =
            Decimal::from_f64(distance).unwrap_or_else(|| Decimal::new(1, 2));

        let risk_amount = equity * (self.risk_percent / dec!(100));
        let divisor = stop_distance * self.pip_value;
        let raw_lot = if divisor > Decimal::ZERO {
            risk_amount / divisor
        } else {
            self.max_lot
        };

        let lot = raw_lot.round_dp(2).max(self.min_lot).min(self.max_lot);
        debug!(%equity, %stop_distance, %raw_lot, %lot, "Sized order");
        lot
    }
}
