//! Entity spawn factories for the simulation world.

use hecs::World;

use wordkeep_core::components::{FallSpeed, FallingWord};
use wordkeep_core::config::GameRules;
use wordkeep_core::types::Position;

use crate::session::SessionState;

/// Parameters for a new falling word.
#[derive(Debug, Clone)]
pub struct WordSpawn {
    pub text: String,
    pub column: usize,
    pub y: f64,
    /// Grid rows per second.
    pub fall_speed: f64,
    pub is_bonus: bool,
    pub from_review: bool,
}

/// Spawn a falling word with its top-left corner at (`column`, `y`).
pub fn spawn_word(
    world: &mut World,
    session: &mut SessionState,
    rules: &GameRules,
    spawn: WordSpawn,
) -> hecs::Entity {
    let spawn_seq = session.next_spawn_seq;
    session.next_spawn_seq += 1;

    let position = Position::new(spawn.column as f64 * rules.cell_width, spawn.y);
    let speed = FallSpeed {
        pixels_per_sec: spawn.fall_speed * rules.cell_height,
    };
    let word = FallingWord {
        text: spawn.text.to_uppercase(),
        typed_progress: 0,
        is_bonus: spawn.is_bonus,
        from_review: spawn.from_review,
        spawn_seq,
        alive: true,
    };

    world.spawn((word, position, speed))
}
