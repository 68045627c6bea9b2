//! Grid hydraulic erosion.
//!
//! An [`Engine`] owns height, water and sediment fields of one fixed size and
//! advances them tick by tick: rainfall, snapshot-based flow routing with
//! erosion and deposition, then evaporation.

mod config;
mod engine;
pub mod flow;

pub use config::ErosionConfig;
pub use engine::{Engine, EngineError, FieldStats};
