//! Bar files and the bot's two journals.
//!
//! The signal log and the trade log are the only state shared between the
//! trader and the dashboard. Both are append-only with a single writer.

mod csv_source;
mod signal_log;
mod trade_log;

pub use csv_source::{load_csv, CsvDataSource};
pub use signal_log::SignalLog;
pub use trade_log::TradeLog;
