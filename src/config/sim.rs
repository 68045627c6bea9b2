//! Top-level simulation settings loaded from RON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::ConfigError;
use crate::erosion::ErosionConfig;
use crate::noise::FractalNoiseConfig;

/// Everything needed to build and drive one simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height (depth) in cells.
    pub height: usize,
    /// Terrain noise parameters, including the seed.
    pub noise: FractalNoiseConfig,
    /// Per-tick erosion parameters.
    pub erosion: ErosionConfig,
    /// Multiplier applied to the calm-slope threshold.
    pub density: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
            noise: FractalNoiseConfig::default(),
            erosion: ErosionConfig::default(),
            density: 1.0,
        }
    }
}

impl SimConfig {
    /// Parses RON text. Missing fields take their defaults.
    pub fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        ron::from_str(contents).map_err(ConfigError::ParseError)
    }

    /// Serializes to pretty-printed RON.
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(ConfigError::SerializeError)
    }

    /// Loads and validates a RON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config = Self::from_ron_str(&contents)?;
        config.validate()?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Writes the config as RON, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::WriteError)?;
        }
        let contents = self.to_ron_string()?;
        std::fs::write(path, contents).map_err(ConfigError::WriteError)
    }

    /// Checks grid dimensions, density, terrain and erosion parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::OutOfRange {
                field: "width",
                value: 0.0,
                expected: ">= 1",
            });
        }
        if self.height == 0 {
            return Err(ConfigError::OutOfRange {
                field: "height",
                value: 0.0,
                expected: ">= 1",
            });
        }
        if !self.density.is_finite() || self.density < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "density",
                value: self.density,
                expected: ">= 0",
            });
        }
        self.noise.validate()?;
        self.erosion.validate()
    }

    /// Erosion parameters with the density multiplier applied.
    pub fn effective_erosion(&self) -> ErosionConfig {
        self.erosion.with_density(self.density)
    }
}
