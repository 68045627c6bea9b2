//! Export module for saving simulation fields as images.
//!
//! Scalar fields go out as 16-bit grayscale PNG; the combined view is an RGB
//! map colored by terrain band.

mod bands;
mod png;
mod terrain_map;

pub use bands::{BandThresholds, TerrainBand};
pub use png::{ExportError, PngExportOptions, export_scalar_png};
pub use terrain_map::{TerrainMapOptions, export_snapshot, export_terrain_png};
