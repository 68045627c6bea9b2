//! Noise generation module for terrain synthesis.
//!
//! Seeded integer hashing feeds an interpolated value noise, which is summed
//! over octaves into fractal Brownian motion.

mod fractal;
mod hash;

pub use fractal::{FractalNoiseConfig, fractal_noise, sample_fractal_noise, smooth_noise};
pub use hash::hash;
