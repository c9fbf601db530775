//! Simulation engine for WORDKEEP.
//!
//! Owns the hecs ECS world, advances it by caller-supplied frame deltas,
//! and produces GameStateSnapshots for the frontend.

pub mod castle;
pub mod effects;
pub mod engine;
pub mod session;
pub mod systems;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use wordkeep_core as core;

#[cfg(test)]
mod tests;
