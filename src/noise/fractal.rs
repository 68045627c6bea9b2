//! Multi-octave fractal Brownian motion (fBm) over seeded value noise.

use serde::{Deserialize, Serialize};

use super::hash::{UNIT_MAX, hash};
use crate::config::{ConfigError, check};

/// Configuration for multi-octave fractal noise generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalNoiseConfig {
    /// Number of noise octaves.
    pub octaves: u8,
    /// Base frequency in lattice cells per grid cell.
    pub frequency: f64,
    /// Frequency multiplier per octave (typically 2.0).
    pub lacunarity: f64,
    /// Amplitude decay per octave (typically 0.5).
    pub persistence: f64,
    /// Random seed for reproducible generation.
    pub seed: u64,
    /// Elevation span that a noise value of 1.0 maps to.
    pub elevation_scale: f64,
    /// Elevation added to every sample.
    pub elevation_offset: f64,
}

impl Default for FractalNoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 4,
            frequency: 0.1,
            lacunarity: 2.0,
            persistence: 0.5,
            seed: 42,
            elevation_scale: 50.0,
            elevation_offset: 10.0,
        }
    }
}

impl FractalNoiseConfig {
    /// Creates a new noise configuration with the given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Rejects parameters that would produce non-finite elevations.
    ///
    /// Besides each field being finite, the top octave's frequency, the
    /// amplitude sum and `|elevation_scale| + |elevation_offset|` must not
    /// overflow, which bounds every sample of [`Self::elevation`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        check("frequency", self.frequency, self.frequency >= 0.0, ">= 0")?;
        check("lacunarity", self.lacunarity, self.lacunarity >= 0.0, ">= 0")?;
        check("persistence", self.persistence, self.persistence >= 0.0, ">= 0")?;
        check("elevation_scale", self.elevation_scale, true, "a finite number")?;
        check("elevation_offset", self.elevation_offset, true, "a finite number")?;

        let span = self.elevation_scale.abs() + self.elevation_offset.abs();
        check("elevation_scale", span, true, "|scale| + |offset| to be finite")?;

        let mut frequency = self.frequency;
        let mut amplitude = 1.0;
        let mut max_amplitude = 0.0;
        for _ in 0..self.octaves {
            max_amplitude += amplitude;
            amplitude *= self.persistence;
            frequency *= self.lacunarity;
        }
        check("lacunarity", frequency, true, "a finite top-octave frequency")?;
        check("persistence", max_amplitude, true, "a finite amplitude sum")
    }

    /// Maps a unit noise value into the elevation range.
    #[inline]
    pub fn elevation(&self, value: f64) -> f64 {
        value * self.elevation_scale + self.elevation_offset
    }
}

#[inline]
fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Value noise at a continuous position: lattice hashes blended with a
/// smoothstep-weighted bilinear interpolation. Result is in `[0, 1)`.
pub fn smooth_noise(seed: u64, x: f64, z: f64) -> f64 {
    let x0 = x.floor();
    let z0 = z.floor();
    let tx = smoothstep(x - x0);
    let tz = smoothstep(z - z0);
    let (ix, iz) = (x0 as i64, z0 as i64);

    let v00 = hash(seed, ix, iz);
    let v10 = hash(seed, ix.wrapping_add(1), iz);
    let v01 = hash(seed, ix, iz.wrapping_add(1));
    let v11 = hash(seed, ix.wrapping_add(1), iz.wrapping_add(1));

    let top = v00 + (v10 - v00) * tx;
    let bottom = v01 + (v11 - v01) * tx;
    (top + (bottom - top) * tz).clamp(0.0, UNIT_MAX)
}

/// Samples fractal noise at grid position `(x, z)`.
///
/// Each octave hashes with its own seed offset. The sum is normalized by the
/// total amplitude used, so the result stays in `[0, 1)` for any octave count.
/// Zero octaves yield 0.0.
pub fn sample_fractal_noise(x: f64, z: f64, config: &FractalNoiseConfig) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = config.frequency;
    let mut max_amplitude = 0.0;

    for octave in 0..config.octaves {
        let octave_seed = config.seed.wrapping_add(octave as u64 * 31337);
        total += smooth_noise(octave_seed, x * frequency, z * frequency) * amplitude;
        max_amplitude += amplitude;
        amplitude *= config.persistence;
        frequency *= config.lacunarity;
    }

    if max_amplitude <= 0.0 {
        return 0.0;
    }
    (total / max_amplitude).clamp(0.0, UNIT_MAX)
}

/// fBm with doubling frequency and halving amplitude, sampled directly at
/// `(x, z)` in lattice units.
pub fn fractal_noise(seed: u64, x: f64, z: f64, octaves: u8) -> f64 {
    let config = FractalNoiseConfig {
        octaves,
        frequency: 1.0,
        lacunarity: 2.0,
        persistence: 0.5,
        seed,
        ..Default::default()
    };
    sample_fractal_noise(x, z, &config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FractalNoiseConfig::default();
        assert_eq!(config.octaves, 4);
        assert_eq!(config.lacunarity, 2.0);
        assert_eq!(config.persistence, 0.5);
        assert_eq!(config.elevation(0.0), 10.0);
        assert_eq!(config.elevation(0.5), 35.0);
    }

    #[test]
    fn test_validate_rejects_overflowing_elevation() {
        FractalNoiseConfig::default().validate().unwrap();

        let infinite = FractalNoiseConfig {
            elevation_scale: f64::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            infinite.validate(),
            Err(ConfigError::OutOfRange { field: "elevation_scale", .. })
        ));

        let overflowing = FractalNoiseConfig {
            elevation_scale: 1e308,
            elevation_offset: 1e308,
            ..Default::default()
        };
        assert!(overflowing.validate().is_err());

        let negative = FractalNoiseConfig {
            elevation_offset: -5.0,
            ..Default::default()
        };
        negative.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_runaway_octaves() {
        let nan = FractalNoiseConfig {
            frequency: f64::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());

        let lacunarity = FractalNoiseConfig {
            octaves: 8,
            lacunarity: 1e300,
            ..Default::default()
        };
        assert!(matches!(
            lacunarity.validate(),
            Err(ConfigError::OutOfRange { field: "lacunarity", .. })
        ));

        let persistence = FractalNoiseConfig {
            octaves: 8,
            persistence: 1e300,
            ..Default::default()
        };
        assert!(matches!(
            persistence.validate(),
            Err(ConfigError::OutOfRange { field: "persistence", .. })
        ));
    }

    #[test]
    fn test_noise_reproducibility() {
        let config = FractalNoiseConfig::with_seed(12345);
        let a = sample_fractal_noise(3.25, 7.5, &config);
        let b = sample_fractal_noise(3.25, 7.5, &config);
        assert_eq!(a, b, "Same seed and position should produce same result");
    }

    #[test]
    fn test_noise_range_any_octave_count() {
        for octaves in [0u8, 1, 4, 12] {
            for i in 0..200 {
                let x = i as f64 * 0.37 - 20.0;
                let z = i as f64 * 1.13 - 50.0;
                let v = fractal_noise(7, x, z, octaves);
                assert!((0.0..1.0).contains(&v), "octaves={octaves} value={v}");
            }
        }
    }

    #[test]
    fn test_smooth_noise_matches_lattice() {
        // At integer coordinates the interpolation weights collapse to the hash.
        assert_eq!(smooth_noise(5, 3.0, -2.0), hash(5, 3, -2));
    }

    #[test]
    fn test_smooth_noise_continuity() {
        let a = smooth_noise(9, 2.999_999, 4.0);
        let b = smooth_noise(9, 3.0, 4.0);
        assert!((a - b).abs() < 1e-4);
    }

    #[test]
    fn test_different_seeds_produce_different_results() {
        let a = sample_fractal_noise(4.3, 1.7, &FractalNoiseConfig::with_seed(1));
        let b = sample_fractal_noise(4.3, 1.7, &FractalNoiseConfig::with_seed(2));
        assert_ne!(a, b, "Different seeds should produce different results");
    }
}
