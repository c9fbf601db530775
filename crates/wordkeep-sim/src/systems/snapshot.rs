//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only — it never modifies the world.

use hecs::{Entity, World};

use wordkeep_core::components::FallingWord;
use wordkeep_core::config::GameRules;
use wordkeep_core::enums::GamePhase;
use wordkeep_core::events::{Alert, AudioEvent};
use wordkeep_core::state::*;
use wordkeep_core::types::{Position, SimTime};

use crate::castle::Castle;
use crate::effects::EffectsRegistry;
use crate::session::SessionState;

/// Stable snapshot id for a word entity.
pub fn word_id(entity: Entity) -> u64 {
    entity.to_bits().get()
}

/// Build a complete GameStateSnapshot from the current world state.
#[allow(clippy::too_many_arguments)]
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    session: &SessionState,
    castle: &Castle,
    effects: &EffectsRegistry,
    rules: &GameRules,
    alerts: Vec<Alert>,
    audio_events: Vec<AudioEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: *time,
        phase,
        level: session.level,
        current_target: session.current_target.map(word_id),
        words: build_words(world, session.current_target),
        castle: build_castle(castle, rules),
        effects: effects.views(time.elapsed_secs),
        alerts,
        audio_events,
        score: ScoreView {
            score: session.score,
            words_completed: session.words_completed,
            words_missed: session.words_missed,
            keystrokes: session.keystrokes,
            mistypes: session.mistypes,
            accuracy: session.accuracy(),
        },
        defeat: session.defeat,
    }
}

/// Live words in spawn order.
fn build_words(world: &World, target: Option<Entity>) -> Vec<WordView> {
    let mut words: Vec<(u64, WordView)> = world
        .query::<(&FallingWord, &Position)>()
        .iter()
        .filter(|(_, (word, _))| word.alive)
        .map(|(entity, (word, pos))| {
            (
                word.spawn_seq,
                WordView {
                    id: word_id(entity),
                    text: word.text.clone(),
                    typed_progress: word.typed_progress,
                    position: *pos,
                    is_bonus: word.is_bonus,
                    targeted: target == Some(entity),
                },
            )
        })
        .collect();

    words.sort_by_key(|(seq, _)| *seq);
    words.into_iter().map(|(_, view)| view).collect()
}

fn build_castle(castle: &Castle, rules: &GameRules) -> CastleView {
    CastleView {
        rows: castle.rows().to_vec(),
        top_grid_row: castle.top_grid_row(rules.grid_height),
        mass: castle.mass(),
        initial_mass: castle.initial_mass(),
        keep_columns: castle
            .keep()
            .map(|keep| (keep.columns.start, keep.columns.end))
            .unwrap_or_default(),
        keep_row: castle.keep_row(),
        keep_intact: castle.keep_intact(),
    }
}
