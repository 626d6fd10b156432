//! Offline sweep of the TP/SL multiplier over a bar history.

mod report;
mod sweep;

pub use report::SweepReport;
pub use sweep::{Outcome, ParameterSweep, SweepConfig, SweepResult};
