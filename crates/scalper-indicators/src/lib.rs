//! Technical indicators.
//!
//! This crate provides the indicators the signal rule reads:
//! - Moving averages (SMA, EMA)
//! - Momentum indicators (RSI, MACD)
//! - Volatility indicators (Bollinger Bands, Standard Deviation, rolling range)
//! - Trend strength (ADX)
//!
//! [`IndicatorEngine`] combines them into [`scalper_core::IndicatorRow`]s.

pub mod engine;
pub mod momentum;
pub mod moving_average;
pub mod trend;
pub mod volatility;

pub use engine::{atr_proxy, IndicatorEngine, IndicatorSettings};
pub use momentum::{Macd, MacdOutput, Rsi};
pub use moving_average::{Ema, Sma};
pub use trend::{Adx, AdxOutput};
pub use volatility::{BollingerBands, BollingerOutput, RangeAtr, StdDev};
