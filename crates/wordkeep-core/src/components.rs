//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

/// A word (or single letter) falling toward the castle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingWord {
    /// Uppercase text, fixed at spawn.
    pub text: String,
    /// Number of leading characters typed so far (0..=text length).
    pub typed_progress: usize,
    /// Bonus words fall faster, score more, and hit harder.
    pub is_bonus: bool,
    /// Drawn from the level's review pool rather than its fresh candidates.
    pub from_review: bool,
    /// Spawn order within the current game; breaks ties in targeting.
    pub spawn_seq: u64,
    /// Cleared when the word is completed or strikes the castle.
    /// Dead words are despawned at the end of the tick.
    pub alive: bool,
}

/// Fall speed fixed at spawn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FallSpeed {
    pub pixels_per_sec: f64,
}

// Position is defined in types.rs and attached to words as a component.
