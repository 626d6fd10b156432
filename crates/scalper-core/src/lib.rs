//! Core types and traits for the scalping bot.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, IndicatorRow, Quote)
//! - Order, position and trade records
//! - Trading signals
//! - Core traits for brokers, indicators and clocks

pub mod types;
pub mod traits;
pub mod error;

pub use error::{ScalperError, ScalperResult};
pub use types::*;
pub use traits::*;
