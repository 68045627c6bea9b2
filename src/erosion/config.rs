//! Erosion configuration.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, check};

/// Parameters for one erosion tick.
///
/// Defaults reproduce the reference behaviour: five raindrops of 0.5 per tick,
/// 10% evaporation, 30% of the height difference moved per step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErosionConfig {
    /// Random cells that receive rain each tick.
    pub rain_drops: u32,
    /// Water added to each rained-on cell.
    pub rain_amount: f64,
    /// Fraction of water removed per tick (0-1).
    pub evaporation: f64,
    /// Residual water below this depth evaporates completely.
    pub dry_threshold: f64,

    /// Cells with this much water or less do not route flow.
    pub min_water: f64,
    /// Fraction of the surface-level difference moved downhill per tick.
    pub transfer_rate: f64,
    /// Height removed per unit of water flow (Ks).
    pub erosion_rate: f64,
    /// Slopes below this drop deposit suspended sediment.
    pub calm_slope: f64,
    /// Fraction of suspended sediment deposited on calm cells (0-1).
    pub deposition_fraction: f64,
}

impl Default for ErosionConfig {
    fn default() -> Self {
        Self {
            rain_drops: 5,
            rain_amount: 0.5,
            evaporation: 0.1,
            dry_threshold: 1e-4,

            min_water: 0.01,
            transfer_rate: 0.3,
            erosion_rate: 0.02,
            calm_slope: 0.5,
            deposition_fraction: 0.1,
        }
    }
}

impl ErosionConfig {
    /// Rejects non-finite values and out-of-range rates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check("rain_amount", self.rain_amount, self.rain_amount >= 0.0, ">= 0")?;
        check("evaporation", self.evaporation, (0.0..=1.0).contains(&self.evaporation), "0..=1")?;
        check("dry_threshold", self.dry_threshold, self.dry_threshold >= 0.0, ">= 0")?;
        check("min_water", self.min_water, self.min_water >= 0.0, ">= 0")?;
        check("transfer_rate", self.transfer_rate, self.transfer_rate >= 0.0, ">= 0")?;
        check("erosion_rate", self.erosion_rate, self.erosion_rate >= 0.0, ">= 0")?;
        check("calm_slope", self.calm_slope, self.calm_slope >= 0.0, ">= 0")?;
        check(
            "deposition_fraction",
            self.deposition_fraction,
            (0.0..=1.0).contains(&self.deposition_fraction),
            "0..=1",
        )?;
        Ok(())
    }

    /// Returns a copy whose calm-slope threshold is scaled by `density`.
    ///
    /// Negative or non-finite densities are treated as zero.
    pub fn with_density(&self, density: f64) -> Self {
        let density = if density.is_finite() { density.max(0.0) } else { 0.0 };
        Self {
            calm_slope: self.calm_slope * density,
            ..self.clone()
        }
    }

    /// Water kept per tick after evaporation.
    #[inline]
    pub fn retention(&self) -> f64 {
        1.0 - self.evaporation.clamp(0.0, 1.0)
    }

    /// Configuration with rainfall, flow, erosion and deposition switched off,
    /// leaving evaporation as the only active process.
    pub fn evaporation_only(&self) -> Self {
        Self {
            rain_drops: 0,
            transfer_rate: 0.0,
            erosion_rate: 0.0,
            deposition_fraction: 0.0,
            ..self.clone()
        }
    }
}
