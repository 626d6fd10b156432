//! Threshold rule combining RSI, Bollinger Bands and MACD.
//!
//! Buys when RSI is oversold, price is below the lower band and MACD is above
//! its signal line. Sells on the mirrored conditions.

use scalper_core::{IndicatorRow, ScalperError, ScalperResult, Side};
use serde::{Deserialize, Serialize};

/// RSI thresholds for the rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalRules {
    /// Buy only below this RSI
    pub oversold: f64,
    /// Sell only above this RSI
    pub overbought: f64,
}

impl Default for SignalRules {
    fn default() -> Self {
        Self {
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

impl SignalRules {
    pub fn validate(&self) -> ScalperResult<()> {
        if self.overbought <= self.oversold {
            return Err(ScalperError::Validation(
                "Overbought must be greater than oversold".into(),
            ));
        }
        if self.overbought > 100.0 || self.oversold < 0.0 {
            return Err(ScalperError::Validation(
                "RSI thresholds must be between 0 and 100".into(),
            ));
        }
        Ok(())
    }

    fn is_buy(&self, row: &IndicatorRow) -> bool {
        row.rsi < self.oversold && row.close() < row.bb_low && row.macd > row.macd_signal
    }

    fn is_sell(&self, row: &IndicatorRow) -> bool {
        row.rsi > self.overbought && row.close() > row.bb_high && row.macd < row.macd_signal
    }
}

/// Classify a single row.
///
/// The two conditions need opposite MACD orderings, so at most one holds.
pub fn classify(row: &IndicatorRow, rules: &SignalRules) -> Option<Side> {
    if rules.is_buy(row) {
        Some(Side::Buy)
    } else if rules.is_sell(row) {
        Some(Side::Sell)
    } else {
        None
    }
}
