//! Signal rule, proximity score and signal generation.

mod generator;
mod proximity;
mod rules;

pub use generator::SignalGenerator;
pub use proximity::Proximity;
pub use rules::{classify, SignalRules};
