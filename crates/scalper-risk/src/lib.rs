//! Risk management for the scalper.
//!
//! Provides TP/SL placement, lot sizing, and the break-even stop rule.

mod position_sizer;
mod risk_manager;
mod stop_loss;

pub use position_sizer::{PositionSizer, MIN_STOP_DISTANCE};
pub use risk_manager::{OrderPlan, RiskManager, RiskParams};
pub use stop_loss::{breakeven_stop, is_triggered, tp_sl, StopLevels};
