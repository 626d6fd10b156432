//! Brute-force sweep over the TP/SL multiplier.
//!
//! Replays the signal rule over a bar history and scores each hypothetical
//! trade a few bars later. No orders are placed.

use scalper_core::{Bar, IndicatorRow, Side};
use scalper_indicators::{atr_proxy, IndicatorEngine};
use scalper_risk::{is_triggered, tp_sl};
use scalper_strategy::{classify, SignalRules};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::report::SweepReport;

/// How a hypothetical trade is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Sign of the close `horizon` bars later versus the signal close
    #[default]
    Direction,
    /// First TP/SL touch within the horizon; untouched trades fall back to
    /// the direction rule
    Barrier,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Direction => f.write_str("direction"),
            Outcome::Barrier => f.write_str("barrier"),
        }
    }
}

/// Sweep configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// First multiplier tried
    pub start: f64,
    /// Last multiplier tried (inclusive)
    pub end: f64,
    pub step: f64,
    /// Indicator rows skipped at the start of the history
    pub warmup: usize,
    /// Bars between signal and evaluation
    pub horizon: usize,
    pub outcome: Outcome,
    /// Window of the range ATR used by the barrier mode
    pub atr_window: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            start: 0.5,
            end: 3.0,
            step: 0.5,
            warmup: 60,
            horizon: 3,
            outcome: Outcome::Direction,
            atr_window: 14,
        }
    }
}

impl SweepConfig {
    /// Candidate multipliers, `start..=end` by `step`.
    pub fn multipliers(&self) -> Vec<f64> {
        if self.step <= 0.0 || self.end < self.start {
            return vec![];
        }
        // Multiply instead of accumulating so 3.0 is not lost to rounding.
        let count = ((self.end - self.start) / self.step + 1e-9).floor() as usize + 1;
        (0..count)
            .map(|k| self.start + k as f64 * self.step)
            .collect()
    }
}

/// Score for one multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    pub tp_multiplier: f64,
    /// Percentage of winning trades; 0 when there were none
    pub win_rate: f64,
    pub total_trades: usize,
    #[serde(skip_serializing, default)]
    pub wins: usize,
}

impl SweepResult {
    fn new(tp_multiplier: f64, wins: usize, losses: usize) -> Self {
        let total_trades = wins + losses;
        let win_rate = if total_trades > 0 {
            wins as f64 / total_trades as f64 * 100.0
        } else {
            0.0
        };
        Self {
            tp_multiplier,
            win_rate,
            total_trades,
            wins,
        }
    }
}

/// Runs the multiplier sweep.
pub struct ParameterSweep {
    config: SweepConfig,
    rules: SignalRules,
    engine: IndicatorEngine,
}

impl ParameterSweep {
    pub fn new(config: SweepConfig, rules: SignalRules, engine: IndicatorEngine) -> Self {
        Self {
            config,
            rules,
            engine,
        }
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Evaluate every candidate multiplier over `bars`.
    ///
    /// An empty history yields a report without results.
    pub fn run(&self, bars: &[Bar]) -> SweepReport {
        let rows = self.engine.compute(bars);
        if rows.is_empty() {
            info!(bars = bars.len(), "Not enough history for the sweep");
            return SweepReport::new(self.config.outcome, bars.len(), vec![]);
        }

        let results = self
            .config
            .multipliers()
            .into_iter()
            .map(|multiplier| self.evaluate(bars, &rows, multiplier))
            .collect();

        SweepReport::new(self.config.outcome, bars.len(), results)
    }

    /// Score one multiplier. `rows` must be `engine.compute(bars)`.
    ///
    /// The warmup and horizon count indicator rows; each row is matched to
    /// its bar for the look-ahead.
    pub fn evaluate(&self, bars: &[Bar], rows: &[IndicatorRow], multiplier: f64) -> SweepResult {
        // Rows are aligned on the last bar.
        let offset = bars.len().saturating_sub(rows.len());
        let horizon = self.config.horizon;
        let end = rows.len().saturating_sub(horizon);

        let mut wins = 0;
        let mut losses = 0;

        for j in self.config.warmup..end {
            let row = &rows[j];
            let Some(side) = classify(row, &self.rules) else {
                continue;
            };

            let i = j + offset;
            let Some(future) = bars.get(i + horizon) else {
                break;
            };
            let entry = row.close();
            let by_direction = || direction_wins(side, entry, future.close);

            let won = match self.config.outcome {
                Outcome::Direction => by_direction(),
                Outcome::Barrier => atr_proxy(&rows[..=j], self.config.atr_window)
                    .and_then(|atr| {
                        barrier_wins(side, entry, atr, multiplier, &bars[i + 1..=i + horizon])
                    })
                    .unwrap_or_else(by_direction),
            };

            if won {
                wins += 1;
            } else {
                losses += 1;
            }
        }

        let result = SweepResult::new(multiplier, wins, losses);
        debug!(
            multiplier,
            wins,
            losses,
            win_rate = result.win_rate,
            "Evaluated multiplier"
        );
        result
    }
}

/// Win iff price moved in the trade's favour; a flat move is a loss.
fn direction_wins(side: Side, entry: f64, future: f64) -> bool {
    side.sign() * (future - entry) > 0.0
}

/// First barrier touched within `path`. `None` when neither is reached.
/// A bar touching both counts as a stop.
fn barrier_wins(side: Side, entry: f64, atr: f64, multiplier: f64, path: &[Bar]) -> Option<bool> {
    let levels = tp_sl(entry, atr, multiplier, side);
    for bar in path {
        let (adverse, favourable) = match side {
            Side::Buy => (bar.low, bar.high),
            Side::Sell => (bar.high, bar.low),
        };
        if is_triggered(levels.stop_loss, adverse, side) {
            return Some(false);
        }
        if is_triggered(levels.take_profit, favourable, side.opposite()) {
            return Some(true);
        }
    }
    None
}
