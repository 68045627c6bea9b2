//! Terrain generation module.
//!
//! Provides the flat [`Grid`] storage shared by every simulation field and the
//! noise-driven heightmap generator.

mod grid;
mod heightmap;

pub use grid::{Grid, GridError, NEIGHBORS_4};
pub use heightmap::{fill_heightmap, generate_heightmap};
