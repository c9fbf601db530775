//! Per-game session state, passed by reference into every system.
//!
//! Stored in `SimulationEngine`, NOT as ECS entities. Replaced wholesale when
//! a new game starts.

use hecs::Entity;

use wordkeep_core::enums::DefeatCause;

#[derive(Debug, Clone)]
pub struct SessionState {
    /// Cumulative score; never decreases.
    pub score: u32,
    /// Current difficulty level (1-based); never decreases.
    pub level: usize,
    /// The locked word, if any. May refer to a despawned entity, in which
    /// case it resolves to no target.
    pub current_target: Option<Entity>,
    /// Latches true; only a new session clears it.
    pub game_over: bool,
    pub defeat: Option<DefeatCause>,
    /// Simulation time of the last spawn (seconds).
    pub last_spawn_time: f64,
    pub next_spawn_seq: u64,

    // --- Statistics ---
    pub words_completed: u32,
    /// Words that struck the castle.
    pub words_missed: u32,
    pub keystrokes: u32,
    pub mistypes: u32,

    /// Last level reported as having nothing to spawn.
    pub warned_empty_level: Option<usize>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            score: 0,
            level: 1,
            current_target: None,
            game_over: false,
            defeat: None,
            last_spawn_time: 0.0,
            next_spawn_seq: 0,
            words_completed: 0,
            words_missed: 0,
            keystrokes: 0,
            mistypes: 0,
            warned_empty_level: None,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Correct keystrokes over all keystrokes; 1.0 before any input.
    pub fn accuracy(&self) -> f64 {
        if self.keystrokes == 0 {
            return 1.0;
        }
        let correct = self.keystrokes.saturating_sub(self.mistypes);
        correct as f64 / self.keystrokes as f64
    }

    /// Latch game over. Returns true only on the first call.
    pub fn end_game(&mut self, cause: DefeatCause) -> bool {
        if self.game_over {
            return false;
        }
        self.game_over = true;
        self.defeat = Some(cause);
        self.current_target = None;
        true
    }
}
