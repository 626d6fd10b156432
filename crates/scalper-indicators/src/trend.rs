//! Trend strength indicators.

use scalper_core::traits::OhlcIndicator;
use serde::{Deserialize, Serialize};

use crate::momentum::wilder_smooth;

/// ADX output with the directional indices it was derived from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdxOutput {
    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,
}

/// Average Directional Index.
///
/// 0-100 measure of trend strength. Above 25 is a strong trend, below 20
/// a ranging market. True range and directional movement are smoothed with
/// Wilder's method, and ADX itself is the Wilder-smoothed DX.
#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
}

impl Adx {
    /// Create a new ADX. The bot uses 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl OhlcIndicator for Adx {
    type Output = AdxOutput;

    fn calculate_ohlc(&self, high: &[f64], low: &[f64], close: &[f64]) -> Vec<AdxOutput> {
        let len = high.len().min(low.len()).min(close.len());
        if len < self.period() {
            return vec![];
        }

        let mut true_ranges = Vec::with_capacity(len - 1);
        let mut plus_dms = Vec::with_capacity(len - 1);
        let mut minus_dms = Vec::with_capacity(len - 1);

        for i in 1..len {
            let tr = (high[i] - low[i])
                .max((high[i] - close[i - 1]).abs())
                .max((low[i] - close[i - 1]).abs());
            true_ranges.push(tr);

            let up_move = high[i] - high[i - 1];
            let down_move = low[i - 1] - low[i];

            plus_dms.push(if up_move > down_move && up_move > 0.0 {
                up_move
            } else {
                0.0
            });
            minus_dms.push(if down_move > up_move && down_move > 0.0 {
                down_move
            } else {
                0.0
            });
        }

        let smoothed_tr = wilder_smooth(&true_ranges, self.period);
        let smoothed_plus = wilder_smooth(&plus_dms, self.period);
        let smoothed_minus = wilder_smooth(&minus_dms, self.period);

        let directional: Vec<(f64, f64, f64)> = smoothed_tr
            .iter()
            .zip(smoothed_plus.iter())
            .zip(smoothed_minus.iter())
            .map(|((&tr, &plus), &minus)| {
                let (plus_di, minus_di) = if tr > 0.0 {
                    (plus / tr * 100.0, minus / tr * 100.0)
                } else {
                    (0.0, 0.0)
                };
                let di_sum = plus_di + minus_di;
                let dx = if di_sum > 0.0 {
                    (plus_di - minus_di).abs() / di_sum * 100.0
                } else {
                    0.0
                };
                (plus_di, minus_di, dx)
            })
            .collect();

        let dx: Vec<f64> = directional.iter().map(|d| d.2).collect();
        let adx = wilder_smooth(&dx, self.period);

        // ADX starts `period - 1` DX values later; align on the last bar.
        let offset = directional.len() - adx.len();
        adx.iter()
            .zip(directional[offset..].iter())
            .map(|(&adx, &(plus_di, minus_di, _))| AdxOutput {
                adx,
                plus_di,
                minus_di,
            })
            .collect()
    }

    fn period(&self) -> usize {
        2 * self.period
    }

    fn name(&self) -> &str {
        "ADX"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(n: usize, step: f64) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let close: Vec<f64> = (0..n).map(|i| 2300.0 + i as f64 * step).collect();
        let high = close.iter().map(|c| c + 1.0).collect();
        let low = close.iter().map(|c| c - 1.0).collect();
        (high, low, close)
    }

    #[test]
    fn test_adx_output_length() {
        let adx = Adx::new(14);
        let (high, low, close) = series(60, 0.5);
        let result = adx.calculate_ohlc(&high, &low, &close);

        // n - 2p + 1
        assert_eq!(result.len(), 60 - 28 + 1);
    }

    #[test]
    fn test_adx_strong_uptrend() {
        let adx = Adx::new(14);
        let (high, low, close) = series(80, 2.0);
        let last = *adx.calculate_ohlc(&high, &low, &close).last().unwrap();

        assert!(last.plus_di > last.minus_di);
        assert!(last.adx > 25.0);
        assert!(last.adx <= 100.0);
    }

    #[test]
    fn test_adx_downtrend_direction() {
        let adx = Adx::new(14);
        let (high, low, close) = series(80, -2.0);
        let last = *adx.calculate_ohlc(&high, &low, &close).last().unwrap();

        assert!(last.minus_di > last.plus_di);
    }

    #[test]
    fn test_adx_flat_market() {
        let adx = Adx::new(5);
        let flat = vec![2300.0; 30];
        let result = adx.calculate_ohlc(&flat, &flat, &flat);

        assert!(!result.is_empty());
        assert!(result.iter().all(|o| o.adx == 0.0));
    }

    #[test]
    fn test_adx_insufficient_data() {
        let adx = Adx::new(14);
        let (high, low, close) = series(27, 1.0);
        assert!(adx.calculate_ohlc(&high, &low, &close).is_empty());
    }
}
