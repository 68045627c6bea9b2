//! Terrain color bands derived from height and water depth.

use serde::{Deserialize, Serialize};

/// Surface classes a renderer colors cells by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainBand {
    Water,
    Snow,
    Rock,
    Grass,
    Lowland,
}

impl TerrainBand {
    /// Returns the preview RGB color for the band.
    pub fn preview_rgb(self) -> [u8; 3] {
        match self {
            TerrainBand::Water => [40, 90, 200],
            TerrainBand::Snow => [240, 244, 250],
            TerrainBand::Rock => [125, 115, 105],
            TerrainBand::Grass => [70, 150, 60],
            TerrainBand::Lowland => [175, 160, 100],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TerrainBand::Water => "water",
            TerrainBand::Snow => "snow",
            TerrainBand::Rock => "rock",
            TerrainBand::Grass => "grass",
            TerrainBand::Lowland => "lowland",
        }
    }
}

/// Height and water cut-offs between bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandThresholds {
    /// Water deeper than this paints the cell as water.
    pub water_depth: f64,
    /// Minimum height of snow caps.
    pub snow: f64,
    /// Minimum height of bare rock.
    pub rock: f64,
    /// Minimum height of grass.
    pub grass: f64,
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            water_depth: 0.1,
            snow: 45.0,
            rock: 35.0,
            grass: 20.0,
        }
    }
}

impl BandThresholds {
    /// Classifies one cell. Water wins over any height band.
    pub fn classify(&self, height: f64, water: f64) -> TerrainBand {
        if water > self.water_depth {
            TerrainBand::Water
        } else if height >= self.snow {
            TerrainBand::Snow
        } else if height >= self.rock {
            TerrainBand::Rock
        } else if height >= self.grass {
            TerrainBand::Grass
        } else {
            TerrainBand::Lowland
        }
    }
}
