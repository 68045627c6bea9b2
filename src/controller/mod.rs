//! Interactive control loop around the erosion engine.

mod simulation;

pub use simulation::Simulation;
