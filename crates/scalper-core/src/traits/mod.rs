//! Core traits for the scalping bot.

mod broker;
mod clock;
mod indicator;

pub use broker::Broker;
pub use clock::{Clock, SystemClock};
pub use indicator::{Indicator, MultiOutputIndicator, OhlcIndicator};
