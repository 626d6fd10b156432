//! The trading loop.
//!
//! Each cycle fetches bars, computes indicators, records a signal, sends an
//! order when the rule fires and moves stops to break-even.

mod executor;
mod position_manager;
mod scheduler;
mod snapshot;
mod trader;

#[cfg(test)]
pub(crate) mod testing;

pub use executor::OrderExecutor;
pub use position_manager::PositionManager;
pub use scheduler::Scheduler;
pub use snapshot::{SnapshotLoader, SnapshotSettings};
pub use trader::{CycleReport, Trader, TraderSettings};
