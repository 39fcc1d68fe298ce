//! Simulation engine for RAMPART.
//!
//! Owns the hecs-backed entity registry, runs systems at a fixed tick rate,
//! and produces GameStateSnapshots for the presentation layer.

pub mod economy;
pub mod engine;
pub mod loader;
pub mod path;
pub mod placement;
pub mod registry;
pub mod systems;

pub use engine::SimulationEngine;
pub use rampart_core as core;

#[cfg(test)]
mod tests;
