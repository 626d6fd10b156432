//! Placed trades as recorded in the trade log.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Side;

/// A trade placed by the bot.
///
/// Field names follow the trade-log columns:
/// `time,signal,entry_price,tp,sl,volume`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    #[serde(with = "journal_time")]
    pub time: DateTime<Utc>,
    pub signal: Side,
    pub entry_price: f64,
    #[serde(rename = "tp")]
    pub take_profit: f64,
    #[serde(rename = "sl")]
    pub stop_loss: f64,
    #[serde(with = "rust_decimal::serde::str")]
    pub volume: Decimal,
}

/// Serde adapter for journal timestamps.
pub mod journal_time {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::types::signal::{parse_journal_time, JOURNAL_TIME_FORMAT};

    pub fn serialize<S>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&time.format(JOURNAL_TIME_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_journal_time(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid journal time: {}", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_trade_json_roundtrip() {
        let trade = Trade {
            time: Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap(),
            signal: Side::Sell,
            entry_price: 2331.27,
            take_profit: 2324.52,
            stop_loss: 2338.02,
            volume: dec!(0.15),
        };

        let json = serde_json::to_string(&trade).unwrap();
        assert!(json.contains("\"tp\":2324.52"));
        assert!(json.contains("\"volume\":\"0.15\""));

        let back: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trade);
    }
}
