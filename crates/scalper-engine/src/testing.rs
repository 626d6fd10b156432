//! Shared test fixtures.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use scalper_core::error::NotifyError;
use scalper_core::{Bar, Clock};
use scalper_monitor::Notifier;
use std::sync::Mutex;

pub const SYMBOL: &str = "XAUUSD";

/// Clock that only moves when told to.
pub struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    pub fn new() -> Self {
        Self(Mutex::new(Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap()))
    }

    pub fn advance(&self, secs: i64) {
        *self.0.lock().unwrap() += Duration::seconds(secs);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Notifier that keeps every message.
#[derive(Default)]
pub struct RecordingNotifier(Mutex<Vec<String>>);

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        self.0.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

fn bar(i: usize, close: f64) -> Bar {
    Bar::new(
        1_714_640_400_000 + i as i64 * 60_000,
        close,
        close + 0.1,
        close - 0.1,
        close,
        100.0,
    )
}

/// Flat history at `price`: never signals.
pub fn flat_bars(n: usize, price: f64) -> Vec<Bar> {
    (0..n).map(|i| bar(i, price)).collect()
}

/// Long rally, a flat stretch and a small uptick on the last bar.
///
/// On the last row RSI is 100 (no losses in the history), the uptick closes
/// above a near-zero-width upper band and MACD is still decaying below its
/// signal line, so the rule reads `sell`.
pub fn sell_setup() -> Vec<Bar> {
    let mut bars = Vec::new();
    for i in 0..100 {
        bars.push(bar(i, 2000.0 + i as f64));
    }
    for i in 100..125 {
        bars.push(bar(i, 2100.0));
    }
    bars.push(bar(125, 2100.05));
    bars
}
