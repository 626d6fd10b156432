//! OHLCV bars and their indicator-augmented form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV bar as delivered by the broker terminal.
/// Uses f64 for fast indicator calculations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Tick volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Calculate the bar's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or(DateTime::UNIX_EPOCH)
    }
}

/// A bar together with every indicator the signal rule reads.
///
/// Rows are only produced once all indicators have enough history, so no
/// field is ever a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub bar: Bar,
    pub rsi: f64,
    pub bb_mid: f64,
    pub bb_high: f64,
    pub bb_low: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub adx: f64,
    pub ema20: f64,
}

impl IndicatorRow {
    #[inline]
    pub fn close(&self) -> f64 {
        self.bar.close
    }

    #[inline]
    pub fn timestamp(&self) -> i64 {
        self.bar.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_range() {
        let bar = Bar::new(1000, 2000.0, 2004.5, 1998.0, 2003.0, 120.0);
        assert!((bar.range() - 6.5).abs() < 1e-9);
    }

    #[test]
    fn test_bar_datetime() {
        let bar = Bar::new(1_700_000_000_000, 1.0, 1.0, 1.0, 1.0, 0.0);
        assert_eq!(bar.datetime().timestamp(), 1_700_000_000);
    }
}
