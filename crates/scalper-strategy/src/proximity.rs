//! How close the latest row is to triggering each side of the rule.

use scalper_core::IndicatorRow;
use serde::{Deserialize, Serialize};

use crate::SignalRules;

/// RSI distance (in RSI points) over which the RSI sub-score decays to zero.
const RSI_SPAN: f64 = 20.0;
/// Band distance, as a fraction of price, over which the band sub-score decays.
const BAND_SPAN_PCT: f64 = 0.01;

/// Buy and sell proximity, in percent.
///
/// Each is the mean of three sub-scores times 100. The RSI and band
/// sub-scores are floored at zero but not capped, so a row deep past a
/// threshold can score above 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Proximity {
    pub buy: f64,
    pub sell: f64,
}

impl Proximity {
    /// Score a single row.
    pub fn of(row: &IndicatorRow, rules: &SignalRules) -> Self {
        let close = row.close();
        let band_span = BAND_SPAN_PCT * close;

        let buy_rsi = (1.0 - (row.rsi - rules.oversold) / RSI_SPAN).max(0.0);
        let buy_band = (1.0 - (close - row.bb_low) / band_span).max(0.0);
        let buy_macd = if row.macd > row.macd_signal { 1.0 } else { 0.0 };

        let sell_rsi = (1.0 - (rules.overbought - row.rsi) / RSI_SPAN).max(0.0);
        let sell_band = (1.0 - (row.bb_high - close) / band_span).max(0.0);
        let sell_macd = if row.macd < row.macd_signal { 1.0 } else { 0.0 };

        Self {
            buy: (buy_rsi + buy_band + buy_macd) / 3.0 * 100.0,
            sell: (sell_rsi + sell_band + sell_macd) / 3.0 * 100.0,
        }
    }

    /// Score the last row, if there is one.
    pub fn latest(rows: &[IndicatorRow], rules: &SignalRules) -> Option<Self> {
        rows.last().map(|row| Self::of(row, rules))
    }
}
