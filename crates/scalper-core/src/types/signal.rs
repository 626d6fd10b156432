//! Trading signals and their signal-log line format.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Side;

/// Timestamp layout shared by the signal log and the trade log.
pub const JOURNAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Parse a journal timestamp, accepting whole seconds as well.
pub fn parse_journal_time(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// One evaluation of the signal rule.
///
/// Every evaluation is recorded, including those that produced no direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub timestamp: DateTime<Utc>,
    pub direction: Option<Side>,
    pub price: f64,
}

impl Signal {
    pub fn new(timestamp: DateTime<Utc>, direction: Option<Side>, price: f64) -> Self {
        Self {
            timestamp,
            direction,
            price,
        }
    }

    /// Whether the rule asked for a trade.
    pub fn is_actionable(&self) -> bool {
        self.direction.is_some()
    }

    fn direction_str(&self) -> &'static str {
        self.direction.map(|side| side.as_str()).unwrap_or("none")
    }
}

/// Renders the signal-log line (without trailing newline).
impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - Signal: {} | Price: {:.2}",
            self.timestamp.format(JOURNAL_TIME_FORMAT),
            self.direction_str(),
            self.price
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 2, 14, 30, 5).unwrap()
    }

    #[test]
    fn test_log_line_format() {
        let signal = Signal::new(at(), Some(Side::Buy), 2315.456);
        assert_eq!(
            signal.to_string(),
            "2024-05-02 14:30:05.000000 - Signal: buy | Price: 2315.46"
        );

        let none = Signal::new(at(), None, 2315.0);
        assert_eq!(
            none.to_string(),
            "2024-05-02 14:30:05.000000 - Signal: none | Price: 2315.00"
        );
    }
}
