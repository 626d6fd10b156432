//! Core data types for the scalping bot.

mod ohlcv;
mod order;
mod position;
mod quote;
mod signal;
mod timeframe;
mod trade;

pub use ohlcv::{Bar, IndicatorRow};
pub use order::{
    FillPolicy, OrderRequest, OrderResult, Side, TimeInForce, ORDER_COMMENT,
    ORDER_DEVIATION_POINTS, ORDER_MAGIC, RETCODE_DONE,
};
pub use position::{AccountInfo, Position};
pub use quote::Quote;
pub use signal::{parse_journal_time, Signal, JOURNAL_TIME_FORMAT};
pub use timeframe::Timeframe;
pub use trade::{journal_time, Trade};
