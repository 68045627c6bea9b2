//! Simulation configuration: RON-backed settings and their error type.

mod error;
mod sim;

pub(crate) use error::check;
pub use error::ConfigError;
pub use sim::SimConfig;
