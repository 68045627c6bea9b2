//! Procedural terrain with grid-based hydraulic erosion.
//!
//! Fractal value noise builds a heightmap; an erosion [`Engine`] then owns the
//! height, water and sediment fields and advances them one deterministic tick
//! at a time.

pub mod config;
pub mod controller;
pub mod erosion;
pub mod export;
pub mod logging;
pub mod noise;
pub mod terrain;

pub use config::{ConfigError, SimConfig};
pub use controller::Simulation;
pub use erosion::{Engine, EngineError, ErosionConfig, FieldStats};
pub use noise::FractalNoiseConfig;
pub use terrain::{Grid, GridError};
