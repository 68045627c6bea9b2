//! Heightmap generation using fractal noise.

use rayon::prelude::*;

use super::grid::{Grid, GridError};
use crate::noise::{FractalNoiseConfig, sample_fractal_noise};

/// Generates a `width × height` heightmap from fractal noise.
///
/// Every cell is `noise * elevation_scale + elevation_offset`, which with the
/// default configuration lands in `[10, 60)`. Fails only for zero dimensions.
pub fn generate_heightmap(
    width: usize,
    height: usize,
    config: &FractalNoiseConfig,
) -> Result<Grid<f64>, GridError> {
    let mut grid = Grid::filled(width, height, 0.0)?;
    fill_heightmap(&mut grid, config);
    Ok(grid)
}

/// Overwrites every cell of `grid` with freshly sampled terrain.
///
/// Rows are sampled in parallel; each cell depends only on its own
/// coordinates, so the result is identical to a sequential fill.
pub fn fill_heightmap(grid: &mut Grid<f64>, config: &FractalNoiseConfig) {
    let width = grid.width();
    grid.as_mut_slice()
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, height)| {
            let x = (i % width) as f64;
            let z = (i / width) as f64;
            let value = sample_fractal_noise(x, z, config);
            // Negative offsets are allowed in config; terrain never is.
            *height = config.elevation(value).max(0.0);
        });
}
