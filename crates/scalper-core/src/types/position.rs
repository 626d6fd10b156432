//! Open positions and account information.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Side;

/// An open position as reported by the terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Terminal ticket
    pub ticket: u64,
    /// Symbol
    pub symbol: String,
    /// Long (buy) or short (sell)
    pub side: Side,
    /// Lot size
    pub volume: Decimal,
    /// Entry price
    pub price_open: f64,
    /// Current stop-loss (0.0 when none is set)
    pub stop_loss: f64,
    /// Current take-profit (0.0 when none is set)
    pub take_profit: f64,
}

impl Position {
    /// Whether the stop still sits on the losing side of the entry.
    pub fn stop_worse_than_entry(&self) -> bool {
        match self.side {
            Side::Buy => self.stop_loss < self.price_open,
            Side::Sell => self.stop_loss > self.price_open,
        }
    }

    /// Favourable move from entry given the closing-side price.
    pub fn favourable_move(&self, current: f64) -> f64 {
        (current - self.price_open) * self.side.sign()
    }
}

/// Account snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Balance without floating P&L
    pub balance: Decimal,
    /// Balance including floating P&L
    pub equity: Decimal,
    /// Deposit currency
    #[serde(default)]
    pub currency: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn position(side: Side, stop_loss: f64) -> Position {
        Position {
            ticket: 1,
            symbol: "XAUUSD".to_string(),
            side,
            volume: dec!(0.1),
            price_open: 2000.0,
            stop_loss,
            take_profit: 0.0,
        }
    }

    #[test]
    fn test_stop_worse_than_entry() {
        assert!(position(Side::Buy, 1995.0).stop_worse_than_entry());
        assert!(!position(Side::Buy, 2000.0).stop_worse_than_entry());
        assert!(position(Side::Sell, 2005.0).stop_worse_than_entry());
        assert!(!position(Side::Sell, 2000.0).stop_worse_than_entry());
    }

    #[test]
    fn test_favourable_move() {
        assert!((position(Side::Buy, 0.0).favourable_move(2003.0) - 3.0).abs() < 1e-9);
        assert!((position(Side::Sell, 0.0).favourable_move(1996.0) - 4.0).abs() < 1e-9);
    }
}
