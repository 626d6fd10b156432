//! Builds indicator rows from raw bars.
//!
//! Every indicator is computed over the full bar history and then aligned on
//! the last bar. Leading bars that lack any indicator are dropped, so each
//! returned row is complete.

use scalper_core::traits::{Indicator, MultiOutputIndicator, OhlcIndicator};
use scalper_core::{Bar, IndicatorRow, ScalperError, ScalperResult};
use serde::{Deserialize, Serialize};

use crate::momentum::{Macd, Rsi};
use crate::moving_average::Ema;
use crate::trend::Adx;
use crate::volatility::{BollingerBands, RangeAtr};

/// Periods for every indicator in a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorSettings {
    pub rsi_period: usize,
    pub bb_period: usize,
    pub bb_std_dev: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub adx_period: usize,
    pub ema_period: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            bb_period: 20,
            bb_std_dev: 2.0,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            adx_period: 14,
            ema_period: 20,
        }
    }
}

impl IndicatorSettings {
    /// Reject periods the indicator constructors cannot accept.
    pub fn validate(&self) -> ScalperResult<()> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("adx_period", self.adx_period),
            ("ema_period", self.ema_period),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, period)| *period == 0) {
            return Err(ScalperError::Validation(format!(
                "{name} must be greater than 0"
            )));
        }
        if self.bb_period < 2 {
            return Err(ScalperError::Validation(
                "bb_period must be at least 2".into(),
            ));
        }
        if self.bb_std_dev.is_nan() || self.bb_std_dev <= 0.0 {
            return Err(ScalperError::Validation(
                "bb_std_dev must be positive".into(),
            ));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(ScalperError::Validation(
                "macd_fast must be less than macd_slow".into(),
            ));
        }
        Ok(())
    }
}

/// Computes [`IndicatorRow`]s for a bar history.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    rsi: Rsi,
    bollinger: BollingerBands,
    macd: Macd,
    adx: Adx,
    ema: Ema,
}

impl IndicatorEngine {
    pub fn new(settings: &IndicatorSettings) -> Self {
        Self {
            rsi: Rsi::new(settings.rsi_period),
            bollinger: BollingerBands::with_params(settings.bb_period, settings.bb_std_dev),
            macd: Macd::with_periods(settings.macd_fast, settings.macd_slow, settings.macd_signal),
            adx: Adx::new(settings.adx_period),
            ema: Ema::new(settings.ema_period),
        }
    }

    /// Number of bars needed before the first complete row.
    pub fn warmup(&self) -> usize {
        [
            Indicator::period(&self.rsi),
            MultiOutputIndicator::period(&self.bollinger),
            MultiOutputIndicator::period(&self.macd),
            OhlcIndicator::period(&self.adx),
            Indicator::period(&self.ema),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// Compute indicator rows. Returns an empty vector when the history is too
    /// short for any indicator.
    pub fn compute(&self, bars: &[Bar]) -> Vec<IndicatorRow> {
        let close: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let high: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let low: Vec<f64> = bars.iter().map(|b| b.low).collect();

        let rsi = self.rsi.calculate(&close);
        let bollinger = self.bollinger.calculate(&close);
        let macd = self.macd.calculate(&close);
        let adx = self.adx.calculate_ohlc(&high, &low, &close);
        let ema = self.ema.calculate(&close);

        let shortest = [rsi.len(), bollinger.len(), macd.len(), adx.len(), ema.len()]
            .into_iter()
            .min()
            .unwrap_or(0);
        if shortest == 0 {
            return vec![];
        }

        let n = bars.len();
        let start = n - shortest;

        // Index into an end-aligned series for bar `i`.
        let at = |len: usize, i: usize| i - (n - len);

        (start..n)
            .map(|i| {
                let bb = bollinger[at(bollinger.len(), i)];
                let m = macd[at(macd.len(), i)];
                IndicatorRow {
                    bar: bars[i],
                    rsi: rsi[at(rsi.len(), i)],
                    bb_mid: bb.middle,
                    bb_high: bb.upper,
                    bb_low: bb.lower,
                    macd: m.macd,
                    macd_signal: m.signal,
                    adx: adx[at(adx.len(), i)].adx,
                    ema20: ema[at(ema.len(), i)],
                }
            })
            .collect()
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new(&IndicatorSettings::default())
    }
}

/// Range-based ATR over the last `window` rows.
///
/// `None` when fewer than `window` rows are available.
pub fn atr_proxy(rows: &[IndicatorRow], window: usize) -> Option<f64> {
    if window == 0 || rows.len() < window {
        return None;
    }
    let tail = &rows[rows.len() - window..];
    let high: Vec<f64> = tail.iter().map(|r| r.bar.high).collect();
    let low: Vec<f64> = tail.iter().map(|r| r.bar.low).collect();
    let close: Vec<f64> = tail.iter().map(|r| r.bar.close).collect();

    RangeAtr::new(window)
        .calculate_ohlc(&high, &low, &close)
        .last()
        .copied()
}
