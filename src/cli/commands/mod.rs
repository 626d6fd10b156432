//! CLI command implementations.

pub mod dashboard;
pub mod optimize;
pub mod run;
pub mod validate;

mod wiring;
