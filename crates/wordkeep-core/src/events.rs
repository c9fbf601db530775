//! Events emitted by the simulation for audio and UI feedback.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Audio events for the frontend sound system. Fire-and-forget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AudioEvent {
    /// A word struck the castle.
    Impact {
        /// Leftmost column of the word's footprint.
        column: usize,
        cells_cleared: u32,
        bonus: bool,
    },
    /// The player finished typing a word.
    WordCompleted { text: String, points: u32 },
    /// Difficulty advanced.
    LevelUp { level: usize },
    /// The castle fell; the game is over.
    CastleFallen { cause: DefeatCause },
}

/// Alert for the UI alert queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    pub tick: u64,
}
