//! The erosion engine: three parallel fields advanced one tick at a time.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, trace};

use super::flow::{apply_transfers, evaporate, plan_transfers};
use crate::config::ConfigError;
use crate::erosion::ErosionConfig;
use crate::noise::FractalNoiseConfig;
use crate::terrain::{Grid, GridError, fill_heightmap, generate_heightmap};

/// Stream offset separating the rainfall RNG from the terrain seed.
const RAIN_STREAM: u64 = 0x5241_494E_4641_4C4C;

/// Errors raised while constructing an [`Engine`].
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Aggregate view of the fields after a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldStats {
    pub ticks: u64,
    pub min_height: f64,
    pub max_height: f64,
    pub total_height: f64,
    pub total_water: f64,
    pub total_sediment: f64,
    /// Cells holding more than the flow threshold of water.
    pub wet_cells: usize,
}

/// Owns the height, water and sediment grids and advances them per tick.
///
/// An `Engine` is always ready to tick: construction either returns a fully
/// initialized engine or an error. Reads never mutate; only [`Engine::tick`],
/// [`Engine::reset`] and [`Engine::rain_at`] change the fields.
#[derive(Debug, Clone)]
pub struct Engine {
    heights: Grid<f64>,
    water: Grid<f64>,
    sediment: Grid<f64>,
    /// Scratch buffer for the water field of the tick in progress.
    next_water: Grid<f64>,
    noise: FractalNoiseConfig,
    erosion: ErosionConfig,
    rng: ChaCha8Rng,
    ticks: u64,
}

fn rain_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed ^ RAIN_STREAM)
}

impl Engine {
    /// Builds a `width × height` engine with default parameters.
    ///
    /// Fails only when either dimension is zero.
    pub fn new(width: usize, height: usize, seed: u64) -> Result<Self, EngineError> {
        Self::with_config(
            width,
            height,
            FractalNoiseConfig::with_seed(seed),
            ErosionConfig::default(),
        )
    }

    /// Builds an engine with explicit terrain and erosion parameters.
    pub fn with_config(
        width: usize,
        height: usize,
        noise: FractalNoiseConfig,
        erosion: ErosionConfig,
    ) -> Result<Self, EngineError> {
        noise.validate()?;
        erosion.validate()?;
        let heights = generate_heightmap(width, height, &noise)?;
        debug!(width, height, seed = noise.seed, "generated terrain");
        Ok(Self::from_parts(heights, noise, erosion))
    }

    /// Starts from an existing heightmap instead of generated terrain.
    ///
    /// Negative or non-finite heights are clamped to zero. `seed` drives
    /// rainfall and any later [`Engine::reset`].
    pub fn from_heights(
        mut heights: Grid<f64>,
        erosion: ErosionConfig,
        seed: u64,
    ) -> Result<Self, EngineError> {
        erosion.validate()?;
        for h in heights.as_mut_slice() {
            *h = if h.is_finite() { h.max(0.0) } else { 0.0 };
        }
        Ok(Self::from_parts(heights, FractalNoiseConfig::with_seed(seed), erosion))
    }

    fn from_parts(heights: Grid<f64>, noise: FractalNoiseConfig, erosion: ErosionConfig) -> Self {
        let zeros = heights.filled_like(0.0);
        let rng = rain_rng(noise.seed);
        Self {
            heights,
            water: zeros.clone(),
            sediment: zeros.clone(),
            next_water: zeros,
            noise,
            erosion,
            rng,
            ticks: 0,
        }
    }

    /// Regenerates terrain from `seed` in place and clears water and sediment.
    ///
    /// The same seed always yields the same heights as [`Engine::new`].
    pub fn reset(&mut self, seed: u64) {
        self.noise.seed = seed;
        fill_heightmap(&mut self.heights, &self.noise);
        self.water.fill(0.0);
        self.sediment.fill(0.0);
        self.next_water.fill(0.0);
        self.rng = rain_rng(seed);
        self.ticks = 0;
        debug!(seed, "reset terrain");
    }

    /// Advances the simulation by one step.
    ///
    /// Rain falls on random cells, then flow, erosion and deposition are
    /// planned from a snapshot of the fields and committed together with
    /// evaporation. Never fails; every value is clamped non-negative.
    pub fn tick(&mut self) {
        self.inject_rainfall();

        let transfers = plan_transfers(&self.heights, &self.water, &self.sediment, &self.erosion);

        self.next_water
            .as_mut_slice()
            .copy_from_slice(self.water.as_slice());
        apply_transfers(
            &transfers,
            &mut self.heights,
            &mut self.next_water,
            &mut self.sediment,
        );
        evaporate(&mut self.next_water, &self.erosion);
        std::mem::swap(&mut self.water, &mut self.next_water);

        self.ticks += 1;
        trace!(
            tick = self.ticks,
            transfers = transfers.len(),
            water = self.water.sum(),
            sediment = self.sediment.sum(),
            "tick"
        );
    }

    fn inject_rainfall(&mut self) {
        let cells = self.water.len();
        let amount = self.erosion.rain_amount;
        for _ in 0..self.erosion.rain_drops {
            let i = self.rng.random_range(0..cells);
            self.water.as_mut_slice()[i] += amount;
        }
    }

    /// Adds `amount` of water at `(x, z)`, clamping the coordinate into range.
    ///
    /// Negative or non-finite amounts are ignored, as is any amount that
    /// would push the cell's water past the largest finite depth.
    pub fn rain_at(&mut self, x: usize, z: usize, amount: f64) {
        if !amount.is_finite() || amount <= 0.0 {
            return;
        }
        let i = self.water.clamped_index(x, z);
        let cell = &mut self.water.as_mut_slice()[i];
        let total = *cell + amount;
        if total.is_finite() {
            *cell = total;
        }
    }

    /// Terrain height at `(x, z)`. Out-of-range coordinates are clamped to
    /// the nearest edge cell.
    pub fn height_at(&self, x: usize, z: usize) -> f64 {
        self.heights.at_clamped(x, z)
    }

    /// Water depth at `(x, z)`. Out-of-range coordinates are clamped to the
    /// nearest edge cell.
    pub fn water_at(&self, x: usize, z: usize) -> f64 {
        self.water.at_clamped(x, z)
    }

    /// Suspended sediment at `(x, z)`. Out-of-range coordinates are clamped
    /// to the nearest edge cell.
    pub fn sediment_at(&self, x: usize, z: usize) -> f64 {
        self.sediment.at_clamped(x, z)
    }

    pub fn heights(&self) -> &Grid<f64> {
        &self.heights
    }

    pub fn water(&self) -> &Grid<f64> {
        &self.water
    }

    pub fn sediment(&self) -> &Grid<f64> {
        &self.sediment
    }

    pub fn width(&self) -> usize {
        self.heights.width()
    }

    pub fn height(&self) -> usize {
        self.heights.height()
    }

    /// Seed of the current terrain.
    pub fn seed(&self) -> u64 {
        self.noise.seed
    }

    /// Ticks since construction or the last reset.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn erosion_config(&self) -> &ErosionConfig {
        &self.erosion
    }

    pub fn noise_config(&self) -> &FractalNoiseConfig {
        &self.noise
    }

    /// Swaps in new erosion parameters; fields are left untouched.
    pub fn set_erosion_config(&mut self, config: ErosionConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.erosion = config;
        Ok(())
    }

    pub fn total_water(&self) -> f64 {
        self.water.sum()
    }

    pub fn total_sediment(&self) -> f64 {
        self.sediment.sum()
    }

    pub fn total_height(&self) -> f64 {
        self.heights.sum()
    }

    /// Lowest and highest terrain cell.
    pub fn height_range(&self) -> (f64, f64) {
        self.heights.range()
    }

    pub fn stats(&self) -> FieldStats {
        let (min_height, max_height) = self.height_range();
        let threshold = self.erosion.min_water;
        FieldStats {
            ticks: self.ticks,
            min_height,
            max_height,
            total_height: self.total_height(),
            total_water: self.total_water(),
            total_sediment: self.total_sediment(),
            wet_cells: self.water.iter().filter(|&&w| w > threshold).count(),
        }
    }
}
