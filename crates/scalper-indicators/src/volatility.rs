//! Volatility indicators.

use scalper_core::traits::{Indicator, MultiOutputIndicator, OhlcIndicator};
use serde::{Deserialize, Serialize};

/// Population standard deviation over a rolling window.
#[derive(Debug, Clone)]
pub struct StdDev {
    period: usize,
}

impl StdDev {
    /// Create a new standard deviation indicator.
    pub fn new(period: usize) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        Self { period }
    }
}

fn mean_and_std(window: &[f64]) -> (f64, f64) {
    let n = window.len() as f64;
    let mean: f64 = window.iter().sum::<f64>() / n;
    let variance: f64 = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

impl Indicator for StdDev {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.period {
            return vec![];
        }

        data.windows(self.period)
            .map(|window| mean_and_std(window).1)
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "StdDev"
    }
}

/// Bollinger Bands output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerOutput {
    /// Upper band
    pub upper: f64,
    /// Middle band (SMA)
    pub middle: f64,
    /// Lower band
    pub lower: f64,
}

impl BollingerOutput {
    /// Check if price is above upper band.
    pub fn is_overbought(&self, price: f64) -> bool {
        price > self.upper
    }

    /// Check if price is below lower band.
    pub fn is_oversold(&self, price: f64) -> bool {
        price < self.lower
    }

    /// Distance between the outer bands.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Bollinger Bands.
///
/// Consists of a middle band (SMA) with upper and lower bands
/// at a specified number of standard deviations.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl BollingerBands {
    /// Create new Bollinger Bands with default parameters (20, 2.0).
    pub fn new() -> Self {
        Self::with_params(20, 2.0)
    }

    /// Create Bollinger Bands with custom parameters.
    pub fn with_params(period: usize, std_dev_multiplier: f64) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        assert!(
            std_dev_multiplier > 0.0,
            "Std dev multiplier must be positive"
        );
        Self {
            period,
            std_dev_multiplier,
        }
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for BollingerBands {
    type Outputs = BollingerOutput;

    fn calculate(&self, data: &[f64]) -> Vec<BollingerOutput> {
        if data.len() < self.period {
            return vec![];
        }

        data.windows(self.period)
            .map(|window| {
                let (mean, std_dev) = mean_and_std(window);
                BollingerOutput {
                    upper: mean + self.std_dev_multiplier * std_dev,
                    middle: mean,
                    lower: mean - self.std_dev_multiplier * std_dev,
                }
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }
}

/// Range-based volatility proxy used to place stops.
///
/// For each window this is `max(high) - min(low)` over the last `period` bars.
/// It is deliberately not Wilder's ATR; stop distances are derived from it.
#[derive(Debug, Clone)]
pub struct RangeAtr {
    period: usize,
}

impl RangeAtr {
    /// Create a new range proxy. The bot uses 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl OhlcIndicator for RangeAtr {
    type Output = f64;

    fn calculate_ohlc(&self, high: &[f64], low: &[f64], _close: &[f64]) -> Vec<f64> {
        let len = high.len().min(low.len());
        if len < self.period {
            return vec![];
        }

        high[..len]
            .windows(self.period)
            .zip(low[..len].windows(self.period))
            .map(|(highs, lows)| {
                let max_high = highs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let min_low = lows.iter().copied().fold(f64::INFINITY, f64::min);
                max_high - min_low
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "RangeATR"
    }
}
