//! Player commands sent from the frontend to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// A single decoded character from the keyboard.
    TypeChar { ch: char },
    /// Start a new game (from the title screen or after a defeat).
    StartGame,
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
}
