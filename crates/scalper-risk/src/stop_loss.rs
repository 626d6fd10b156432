//! Take-profit / stop-loss geometry and the break-even rule.

use scalper_core::{Position, Side};
use serde::{Deserialize, Serialize};

/// Protective levels attached to an order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopLevels {
    pub take_profit: f64,
    pub stop_loss: f64,
}

/// Symmetric TP/SL at `atr * multiplier` around the entry.
///
/// Buy: TP above, SL below. Sell: mirrored.
pub fn tp_sl(entry_price: f64, atr: f64, multiplier: f64, side: Side) -> StopLevels {
    let offset = atr * multiplier;
    match side {
        Side::Buy => StopLevels {
            take_profit: entry_price + offset,
            stop_loss: entry_price - offset,
        },
        Side::Sell => StopLevels {
            take_profit: entry_price - offset,
            stop_loss: entry_price + offset,
        },
    }
}

/// New stop for a position that has earned a break-even move, if any.
///
/// Triggers once price has moved `atr * multiplier` in the position's favour
/// while the stop is still on the losing side of entry. Returns the entry
/// price as the new stop. Once the stop sits at entry the guard no longer
/// holds, so applying the result twice is a no-op.
pub fn breakeven_stop(
    position: &Position,
    current_price: f64,
    atr: f64,
    multiplier: f64,
) -> Option<f64> {
    let threshold = atr * multiplier;
    let entry = position.price_open;

    let triggered = match position.side {
        Side::Buy => current_price >= entry + threshold,
        Side::Sell => current_price <= entry - threshold,
    };

    if triggered && position.stop_worse_than_entry() {
        Some(entry)
    } else {
        None
    }
}

/// Check if a stop is hit at the given price.
pub fn is_triggered(stop_price: f64, current_price: f64, side: Side) -> bool {
    match side {
        Side::Buy => current_price <= stop_price,
        Side::Sell => current_price >= stop_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn position(side: Side, open: f64, sl: f64) -> Position {
        Position {
            ticket: 7,
            symbol: "XAUUSD".to_string(),
            side,
            volume: dec!(0.5),
            price_open: open,
            stop_loss: sl,
            take_profit: 0.0,
        }
    }

    #[test]
    fn test_tp_sl_buy() {
        let levels = tp_sl(2000.0, 4.0, 1.5, Side::Buy);
        assert!((levels.take_profit - 2006.0).abs() < 1e-9);
        assert!((levels.stop_loss - 1994.0).abs() < 1e-9);
    }

    #[test]
    fn test_tp_sl_sell() {
        let levels = tp_sl(2000.0, 4.0, 1.5, Side::Sell);
        assert!((levels.take_profit - 1994.0).abs() < 1e-9);
        assert!((levels.stop_loss - 2006.0).abs() < 1e-9);
    }

    #[test]
    fn test_breakeven_buy() {
        let pos = position(Side::Buy, 2000.0, 1994.0);

        // needs +2.0 (4 * 0.5)
        assert_eq!(breakeven_stop(&pos, 2001.9, 4.0, 0.5), None);
        assert_eq!(breakeven_stop(&pos, 2002.0, 4.0, 0.5), Some(2000.0));
    }

    #[test]
    fn test_breakeven_sell() {
        let pos = position(Side::Sell, 2000.0, 2006.0);

        assert_eq!(breakeven_stop(&pos, 1998.5, 4.0, 0.5), None);
        assert_eq!(breakeven_stop(&pos, 1997.0, 4.0, 0.5), Some(2000.0));
    }

    #[test]
    fn test_breakeven_idempotent() {
        let mut pos = position(Side::Buy, 2000.0, 1994.0);
        let new_sl = breakeven_stop(&pos, 2010.0, 4.0, 0.5).unwrap();
        pos.stop_loss = new_sl;

        assert_eq!(breakeven_stop(&pos, 2010.0, 4.0, 0.5), None);
    }

    #[test]
    fn test_stop_already_in_profit() {
        let pos = position(Side::Sell, 2000.0, 1999.0);
        assert_eq!(breakeven_stop(&pos, 1990.0, 4.0, 0.5), None);
    }

    #[test]
    fn test_stop_triggered() {
        assert!(is_triggered(1995.0, 1994.0, Side::Buy));
        assert!(is_triggered(1995.0, 1995.0, Side::Buy));
        assert!(!is_triggered(1995.0, 1996.0, Side::Buy));

        assert!(is_triggered(2005.0, 2006.0, Side::Sell));
        assert!(!is_triggered(2005.0, 2004.0, Side::Sell));
    }
}
