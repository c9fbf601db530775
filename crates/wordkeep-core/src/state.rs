//! Game state snapshot — the complete visible state handed to the renderer each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{Alert, AudioEvent};
use crate::types::{Position, SimTime};

/// Complete game state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    /// Current difficulty level (1-based).
    pub level: usize,
    /// Id of the locked target word, if any.
    pub current_target: Option<u64>,
    pub words: Vec<WordView>,
    pub castle: CastleView,
    pub effects: Vec<EffectView>,
    pub alerts: Vec<Alert>,
    pub audio_events: Vec<AudioEvent>,
    pub score: ScoreView,
    pub defeat: Option<DefeatCause>,
}

/// A falling word on the play field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WordView {
    /// Stable id for the word's lifetime.
    pub id: u64,
    pub text: String,
    pub typed_progress: usize,
    /// Top-left corner in pixels.
    pub position: Position,
    pub is_bonus: bool,
    pub targeted: bool,
}

/// The castle as it stands.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CastleView {
    /// Rows top to bottom; the last row sits on the bottom of the play field.
    pub rows: Vec<Vec<Cell>>,
    /// Grid row of the first castle row.
    pub top_grid_row: usize,
    pub mass: u32,
    pub initial_mass: u32,
    /// Keep columns, `[start, end)`.
    pub keep_columns: (usize, usize),
    /// Live index into `rows` of the keep row, if it still stands.
    pub keep_row: Option<usize>,
    pub keep_intact: bool,
}

/// A short-lived visual effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectView {
    pub kind: EffectKind,
    /// Explosion centre, or beam start.
    pub origin: Position,
    /// Beam end; equal to `origin` for explosions.
    pub target: Position,
    /// 0.0 at creation, 1.0 at expiry.
    pub age_fraction: f64,
    /// Live debris particles (explosions only).
    pub particles: Vec<ParticleView>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ParticleView {
    pub position: Position,
    pub radius: f64,
}

/// Running score for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub score: u32,
    pub words_completed: u32,
    /// Words that struck the castle.
    pub words_missed: u32,
    pub keystrokes: u32,
    pub mistypes: u32,
    /// Correct keystrokes / keystrokes, 1.0 before any input.
    pub accuracy: f64,
}
