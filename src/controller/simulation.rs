//! Frame-driven simulation control: run, pause, density and regeneration.

use tracing::{debug, info};

use crate::config::{ConfigError, SimConfig};
use crate::erosion::{Engine, EngineError, ErosionConfig, FieldStats};

/// Drives an [`Engine`] the way an interactive front end does.
///
/// Keeps the undensified erosion parameters so density changes always scale
/// from the same base rather than compounding.
#[derive(Debug, Clone)]
pub struct Simulation {
    engine: Engine,
    base_erosion: ErosionConfig,
    density: f64,
    running: bool,
}

impl Simulation {
    /// Builds the engine described by `config`. The simulation starts paused.
    pub fn new(config: &SimConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let engine = Engine::with_config(
            config.width,
            config.height,
            config.noise.clone(),
            config.effective_erosion(),
        )?;
        Ok(Self {
            engine,
            base_erosion: config.erosion.clone(),
            density: config.density,
            running: false,
        })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn resume(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Flips between running and paused, returning the new state.
    pub fn toggle(&mut self) -> bool {
        self.running = !self.running;
        self.running
    }

    /// Advances one tick if running. Returns whether a tick happened.
    pub fn frame(&mut self) -> bool {
        if self.running {
            self.engine.tick();
        }
        self.running
    }

    /// Rescales the calm-slope threshold. Takes effect on the next tick.
    pub fn set_density(&mut self, density: f64) -> Result<(), ConfigError> {
        if !density.is_finite() || density < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "density",
                value: density,
                expected: ">= 0",
            });
        }
        self.engine
            .set_erosion_config(self.base_erosion.with_density(density))?;
        self.density = density;
        debug!(density, "density changed");
        Ok(())
    }

    /// Discards all state and rebuilds the terrain from `seed`.
    pub fn regenerate(&mut self, seed: u64) {
        self.engine.reset(seed);
        info!(seed, "terrain regenerated");
    }

    /// Runs `ticks` steps regardless of the paused flag, calling `on_tick`
    /// with the 1-based step and the engine after each one.
    ///
    /// Stops at the first error from `on_tick` and returns it; the engine
    /// keeps the ticks already taken.
    pub fn run_ticks<F, E>(&mut self, ticks: u64, mut on_tick: F) -> Result<FieldStats, E>
    where
        F: FnMut(u64, &Engine) -> Result<(), E>,
    {
        for step in 1..=ticks {
            self.engine.tick();
            on_tick(step, &self.engine)?;
        }
        Ok(self.engine.stats())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SimConfig {
        SimConfig {
            width: 16,
            height: 16,
            ..Default::default()
        }
    }

    #[test]
    fn test_starts_paused() {
        let mut sim = Simulation::new(&small()).unwrap();
        assert!(!sim.is_running());
        assert!(!sim.frame());
        assert_eq!(sim.engine().tick_count(), 0);
    }

    #[test]
    fn test_frame_ticks_only_when_running() {
        let mut sim = Simulation::new(&small()).unwrap();
        sim.resume();
        assert!(sim.frame());
        assert!(sim.frame());
        assert!(!sim.toggle());
        assert!(!sim.frame());
        assert_eq!(sim.engine().tick_count(), 2);
    }

    #[test]
    fn test_density_scales_from_base() {
        let mut sim = Simulation::new(&small()).unwrap();
        sim.set_density(2.0).unwrap();
        sim.set_density(3.0).unwrap();
        assert_eq!(sim.engine().erosion_config().calm_slope, 1.5);
        assert_eq!(sim.density(), 3.0);

        assert!(sim.set_density(-1.0).is_err());
        assert_eq!(sim.density(), 3.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimConfig {
            density: f64::NAN,
            ..small()
        };
        assert!(matches!(Simulation::new(&config), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_regenerate_clears_state() {
        let mut sim = Simulation::new(&small()).unwrap();
        sim.run_ticks(20, |_, _| Ok::<_, ()>(())).unwrap();
        sim.regenerate(5);
        assert_eq!(sim.engine().tick_count(), 0);
        assert_eq!(sim.engine().total_water(), 0.0);
        assert_eq!(sim.engine().seed(), 5);
    }

    #[test]
    fn test_run_ticks_reports_progress() {
        let mut sim = Simulation::new(&small()).unwrap();
        let mut seen = Vec::new();
        let stats = sim
            .run_ticks(3, |step, engine| {
                seen.push((step, engine.tick_count()));
                Ok::<_, ()>(())
            })
            .unwrap();
        assert_eq!(seen, vec![(1, 1), (2, 2), (3, 3)]);
        assert_eq!(stats.ticks, 3);
    }

    #[test]
    fn test_run_ticks_stops_on_error() {
        let mut sim = Simulation::new(&small()).unwrap();
        let mut calls = 0;
        let result = sim.run_ticks(10, |step, _| {
            calls += 1;
            if step == 4 { Err(step) } else { Ok(()) }
        });
        assert_eq!(result.unwrap_err(), 4);
        assert_eq!(calls, 4);
        assert_eq!(sim.engine().tick_count(), 4);
    }
}
