//! Sweep report generation.

use scalper_core::error::DataError;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::sweep::{Outcome, SweepResult};

/// Results of one sweep, in multiplier order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    /// Scoring mode used
    pub outcome: Outcome,
    /// Bars in the replayed history
    pub bars: usize,
    pub results: Vec<SweepResult>,
}

impl SweepReport {
    pub fn new(outcome: Outcome, bars: usize, results: Vec<SweepResult>) -> Self {
        Self {
            outcome,
            bars,
            results,
        }
    }

    /// Candidate with the highest win rate among those that traded.
    /// Ties keep the smaller multiplier.
    pub fn best(&self) -> Option<&SweepResult> {
        self.results
            .iter()
            .filter(|r| r.total_trades > 0)
            .fold(None, |best: Option<&SweepResult>, r| match best {
                Some(b) if b.win_rate >= r.win_rate => Some(b),
                _ => Some(r),
            })
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                 TP/SL MULTIPLIER SWEEP                     \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str(&format!("  Bars Replayed:       {}\n", self.bars));
        s.push_str(&format!("  Outcome Mode:        {}\n", self.outcome));
        s.push('\n');

        if self.results.is_empty() {
            s.push_str("  No data: the history is too short to evaluate.\n\n");
            s.push_str("═══════════════════════════════════════════════════════════\n");
            return s;
        }

        s.push_str("RESULTS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str("  TP Multiplier     Win Rate     Total Trades\n");
        for r in &self.results {
            s.push_str(&format!(
                "  {:>13.1}   {:>9.2}%   {:>14}\n",
                r.tp_multiplier, r.win_rate, r.total_trades
            ));
        }
        s.push('\n');

        match self.best() {
            Some(best) => s.push_str(&format!(
                "  Best Multiplier:     {:.1} ({:.2}% over {} trades)\n",
                best.tp_multiplier, best.win_rate, best.total_trades
            )),
            None => s.push_str("  No signals fired in the replayed history.\n"),
        }
        s.push('\n');

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV with columns `tp_multiplier,win_rate,total_trades`.
    pub fn to_csv(&self) -> Result<String, DataError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        self.write_rows(&mut writer)?;
        let bytes = writer
            .into_inner()
            .map_err(|e| DataError::Internal(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| DataError::Internal(e.to_string()))
    }

    /// Write the CSV export to `path`, replacing any previous file.
    pub fn save_csv(&self, path: impl AsRef<Path>) -> Result<(), DataError> {
        let mut writer =
            csv::Writer::from_path(path.as_ref()).map_err(|e| DataError::Internal(e.to_string()))?;
        self.write_rows(&mut writer)?;
        writer.flush().map_err(|e| DataError::Internal(e.to_string()))
    }

    fn write_rows<W: std::io::Write>(&self, writer: &mut csv::Writer<W>) -> Result<(), DataError> {
        for r in &self.results {
            writer
                .serialize(r)
                .map_err(|e| DataError::Internal(e.to_string()))?;
        }
        if self.results.is_empty() {
            writer
                .write_record(["tp_multiplier", "win_rate", "total_trades"])
                .map_err(|e| DataError::Internal(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(tp_multiplier: f64, wins: usize, total: usize) -> SweepResult {
        SweepResult {
            tp_multiplier,
            win_rate: if total > 0 {
                wins as f64 / total as f64 * 100.0
            } else {
                0.0
            },
            total_trades: total,
            wins,
        }
    }

    fn report() -> SweepReport {
        SweepReport::new(
            Outcome::Direction,
            500,
            vec![result(0.5, 3, 4), result(1.0, 0, 0), result(1.5, 3, 4)],
        )
    }

    #[test]
    fn test_report_summary() {
        let summary = report().summary();
        assert!(summary.contains("TP/SL MULTIPLIER SWEEP"));
        assert!(summary.contains("75.00%"));
        assert!(summary.contains("Best Multiplier:     0.5"));
    }

    #[test]
    fn test_empty_summary() {
        let summary = SweepReport::new(Outcome::Barrier, 10, vec![]).summary();
        assert!(summary.contains("No data"));
    }

    #[test]
    fn test_csv_columns() {
        let csv = report().to_csv().unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("tp_multiplier,win_rate,total_trades"));
        assert_eq!(lines.next(), Some("0.5,75.0,4"));
        assert_eq!(lines.next(), Some("1.0,0.0,0"));
    }

    #[test]
    fn test_save_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("optimization_results.csv");
        report().save_csv(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 4);
    }

    #[test]
    fn test_json() {
        let json = report().to_json().unwrap();
        assert!(json.contains("\"outcome\": \"direction\""));
        assert!(!json.contains("wins"));
    }
}
