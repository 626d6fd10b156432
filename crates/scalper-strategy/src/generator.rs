//! Signal generation with its signal-log side effect.

use chrono::{DateTime, Utc};
use scalper_core::{IndicatorRow, Signal};
use scalper_data::SignalLog;
use tracing::{debug, error, info};

use crate::{classify, SignalRules};

/// Applies [`SignalRules`] to the latest row and records every evaluation.
pub struct SignalGenerator {
    rules: SignalRules,
    log: SignalLog,
}

impl SignalGenerator {
    pub fn new(rules: SignalRules, log: SignalLog) -> Self {
        Self { rules, log }
    }

    pub fn rules(&self) -> &SignalRules {
        &self.rules
    }

    /// Classify the last row and append it to the signal log.
    ///
    /// Returns `None` (and writes nothing) when `rows` is empty. A failed
    /// log write is reported but does not suppress the signal.
    pub fn generate(&self, rows: &[IndicatorRow], now: DateTime<Utc>) -> Option<Signal> {
        let row = rows.last()?;
        let signal = Signal::new(now, classify(row, &self.rules), row.close());

        match signal.direction {
            Some(side) => info!(%side, price = signal.price, rsi = row.rsi, "Signal"),
            None => debug!(price = signal.price, rsi = row.rsi, "No signal"),
        }

        if let Err(e) = self.log.append(&signal) {
            error!(error = %e, "Failed to write signal log");
        }

        Some(signal)
    }
}
