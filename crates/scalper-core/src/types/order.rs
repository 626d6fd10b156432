//! Order types and structures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Get the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// +1 for buy, -1 for sell.
    pub fn sign(&self) -> f64 {
        match self {
            Side::Buy => 1.0,
            Side::Sell => -1.0,
        }
    }

    /// Lowercase name used in the signal and trade logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(format!("Invalid side: {}", other)),
        }
    }
}

/// Time in force for orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    /// Good til canceled
    #[default]
    #[serde(rename = "gtc")]
    GTC,
    /// Valid for the trading day only
    Day,
}

/// Fill policy for market orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FillPolicy {
    /// Immediate or cancel
    #[default]
    #[serde(rename = "ioc")]
    IOC,
    /// Fill or kill
    #[serde(rename = "fok")]
    FOK,
}

/// Fixed execution parameters for every market order.
pub const ORDER_DEVIATION_POINTS: u32 = 10;
pub const ORDER_MAGIC: u64 = 42;
pub const ORDER_COMMENT: &str = "Scalping bot";

/// Market order with attached protective levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Symbol to trade
    pub symbol: String,
    /// Buy or sell
    pub side: Side,
    /// Lot size
    pub volume: Decimal,
    /// Requested price (ask for buys, bid for sells)
    pub price: f64,
    /// Stop-loss level
    pub stop_loss: f64,
    /// Take-profit level
    pub take_profit: f64,
    /// Maximum slippage in points
    pub deviation: u32,
    /// Expert identifier
    pub magic: u64,
    /// Free-text order comment
    pub comment: String,
    pub time_in_force: TimeInForce,
    pub filling: FillPolicy,
}

impl OrderRequest {
    /// Create a market order request with the bot's fixed execution parameters.
    pub fn market(
        symbol: impl Into<String>,
        side: Side,
        volume: Decimal,
        price: f64,
        stop_loss: f64,
        take_profit: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            volume,
            price,
            stop_loss,
            take_profit,
            deviation: ORDER_DEVIATION_POINTS,
            magic: ORDER_MAGIC,
            comment: ORDER_COMMENT.to_string(),
            time_in_force: TimeInForce::GTC,
            filling: FillPolicy::IOC,
        }
    }
}

/// Terminal return code for a completed request.
pub const RETCODE_DONE: u32 = 10009;

/// Result of an accepted trade request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResult {
    /// Ticket of the order or position
    pub ticket: u64,
    /// Terminal return code
    pub retcode: u32,
    /// Execution price
    pub price: f64,
    /// Executed volume
    pub volume: Decimal,
    /// Terminal comment
    #[serde(default)]
    pub comment: String,
}

impl OrderResult {
    /// Whether the terminal reported the request as done.
    pub fn is_done(&self) -> bool {
        self.retcode == RETCODE_DONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_market_request_defaults() {
        let request = OrderRequest::market("XAUUSD", Side::Buy, dec!(0.5), 2000.0, 1995.0, 2005.0);
        assert_eq!(request.symbol, "XAUUSD");
        assert_eq!(request.deviation, 10);
        assert_eq!(request.magic, 42);
        assert_eq!(request.comment, "Scalping bot");
        assert_eq!(request.time_in_force, TimeInForce::GTC);
        assert_eq!(request.filling, FillPolicy::IOC);
    }

    #[test]
    fn test_side_helpers() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.sign(), -1.0);
        assert_eq!(Side::Buy.to_string(), "buy");
        assert_eq!("SELL".parse::<Side>().unwrap(), Side::Sell);
        assert!("hold".parse::<Side>().is_err());
    }

    #[test]
    fn test_order_result_done() {
        let result = OrderResult {
            ticket: 7,
            retcode: RETCODE_DONE,
            price: 2000.0,
            volume: dec!(1),
            comment: String::new(),
        };
        assert!(result.is_done());
    }
}
