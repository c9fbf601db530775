//! Systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` plus the engine-owned state
//! they need (session, castle, effects). They do not own state.

pub mod cleanup;
pub mod collision;
pub mod input;
pub mod progression;
pub mod snapshot;
pub mod spawner;
