//! Proximity alerts with a per-direction cooldown.
//!
//! [`evaluate`] is pure: it takes the previous [`AlertState`] and returns the
//! next one together with the alerts to deliver.

use chrono::{DateTime, Duration, Utc};
use scalper_core::Side;
use serde::{Deserialize, Serialize};

/// When to alert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertPolicy {
    /// Proximity (percent) that must be exceeded
    pub threshold: f64,
    /// Minimum gap between two alerts of the same direction
    pub cooldown: Duration,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            threshold: 90.0,
            cooldown: Duration::seconds(60),
        }
    }
}

/// Last alert time per direction. Starts empty at process start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertState {
    pub last_buy: Option<DateTime<Utc>>,
    pub last_sell: Option<DateTime<Utc>>,
}

impl AlertState {
    fn last(&self, side: Side) -> Option<DateTime<Utc>> {
        match side {
            Side::Buy => self.last_buy,
            Side::Sell => self.last_sell,
        }
    }

    fn record(&mut self, side: Side, at: DateTime<Utc>) {
        match side {
            Side::Buy => self.last_buy = Some(at),
            Side::Sell => self.last_sell = Some(at),
        }
    }
}

/// A proximity alert ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub side: Side,
    pub proximity: f64,
    pub symbol: String,
}

impl Alert {
    /// Chat message text.
    pub fn message(&self) -> String {
        let (icon, label) = match self.side {
            Side::Buy => ("📈", "BUY"),
            Side::Sell => ("📉", "SELL"),
        };
        format!(
            "{} {} signal close ({:.0}%) on {}",
            icon, label, self.proximity, self.symbol
        )
    }
}

/// Decide which proximity alerts fire at `now`.
///
/// Each direction fires when its proximity is strictly above the threshold
/// and it has never fired or fired at least `cooldown` ago. Firing updates
/// only that direction's timestamp.
pub fn evaluate(
    state: AlertState,
    symbol: &str,
    buy_proximity: f64,
    sell_proximity: f64,
    policy: &AlertPolicy,
    now: DateTime<Utc>,
) -> (AlertState, Vec<Alert>) {
    let mut next = state;
    let mut alerts = Vec::new();

    for (side, proximity) in [(Side::Buy, buy_proximity), (Side::Sell, sell_proximity)] {
        if proximity <= policy.threshold {
            continue;
        }
        let cooled = match state.last(side) {
            None => true,
            Some(last) => now - last >= policy.cooldown,
        };
        if cooled {
            next.record(side, now);
            alerts.push(Alert {
                side,
                proximity,
                symbol: symbol.to_string(),
            });
        }
    }

    (next, alerts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap() + Duration::seconds(secs)
    }

    #[test]
    fn test_cooldown_sequence() {
        let policy = AlertPolicy::default();
        let state = AlertState::default();

        let (state, alerts) = evaluate(state, "XAUUSD", 95.0, 10.0, &policy, t(0));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].side, Side::Buy);

        let (state, alerts) = evaluate(state, "XAUUSD", 95.0, 10.0, &policy, t(30));
        assert!(alerts.is_empty());

        let (state, alerts) = evaluate(state, "XAUUSD", 95.0, 10.0, &policy, t(61));
        assert_eq!(alerts.len(), 1);
        assert_eq!(state.last_buy, Some(t(61)));
        assert_eq!(state.last_sell, None);
    }

    #[test]
    fn test_threshold_is_strict() {
        let (state, alerts) = evaluate(
            AlertState::default(),
            "XAUUSD",
            90.0,
            90.0,
            &AlertPolicy::default(),
            t(0),
        );
        assert!(alerts.is_empty());
        assert_eq!(state, AlertState::default());
    }

    #[test]
    fn test_directions_independent() {
        let policy = AlertPolicy::default();
        let (state, _) = evaluate(AlertState::default(), "XAUUSD", 95.0, 0.0, &policy, t(0));

        let (state, alerts) = evaluate(state, "XAUUSD", 95.0, 92.0, &policy, t(10));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].side, Side::Sell);
        assert_eq!(state.last_buy, Some(t(0)));
        assert_eq!(state.last_sell, Some(t(10)));
    }

    #[test]
    fn test_message() {
        let alert = Alert {
            side: Side::Sell,
            proximity: 93.4,
            symbol: "XAUUSD".into(),
        };
        assert_eq!(alert.message(), "📉 SELL signal close (93%) on XAUUSD");
    }
}
