//! Broker integrations.
//!
//! [`PaperBroker`] simulates the terminal in memory; [`BridgeBroker`] talks
//! to a live terminal through its HTTP bridge.

mod bridge;
mod paper;

pub use bridge::{BridgeBroker, BridgeConfig};
pub use paper::{PaperBroker, RETCODE_INVALID_STOPS, RETCODE_INVALID_VOLUME};
