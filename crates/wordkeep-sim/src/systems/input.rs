//! Input resolver — turns one keystroke into target acquisition, progress,
//! completion, or a cancelled lock.
//!
//! Policy: a wrong character while locked resets the word's progress and
//! drops the lock; that keystroke is spent and does not acquire anything.
//! With no lock (or a lock on a word that has since retired), the alive word
//! nearest the castle whose text starts with the character is acquired and
//! immediately advanced, so single-letter words complete in one keystroke.

use hecs::{Entity, World};
use tracing::debug;

use wordkeep_core::components::FallingWord;
pub use wordkeep_core::config::is_typeable;
use wordkeep_core::config::GameRules;
use wordkeep_core::events::AudioEvent;
use wordkeep_core::types::Position;

use crate::effects::EffectsRegistry;
use crate::session::SessionState;

/// What a keystroke did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not an accepted character.
    Ignored,
    /// Nothing on the field starts with this character.
    NoTarget,
    /// Locked word advanced by one character.
    Advanced,
    /// Locked word finished.
    Completed { points: u32 },
    /// Wrong character; progress reset and lock dropped.
    Mistyped,
}

/// Mutable state the resolver touches besides the world.
pub struct InputContext<'a> {
    pub session: &'a mut SessionState,
    pub effects: &'a mut EffectsRegistry,
    pub audio_events: &'a mut Vec<AudioEvent>,
    pub rules: &'a GameRules,
    /// Where completion beams start (castle top centre).
    pub beam_origin: Position,
    pub now: f64,
}

/// Resolve one typed character.
pub fn run(world: &mut World, ctx: &mut InputContext<'_>, ch: char) -> KeyOutcome {
    if ctx.session.game_over || !is_typeable(ch) {
        return KeyOutcome::Ignored;
    }
    let typed = ch.to_ascii_uppercase();
    ctx.session.keystrokes += 1;

    let locked = ctx.session.current_target.filter(|&entity| is_alive(world, entity));
    let target = match locked {
        Some(entity) => entity,
        None => {
            ctx.session.current_target = None;
            match acquire(world, typed) {
                Some(entity) => {
                    ctx.session.current_target = Some(entity);
                    entity
                }
                None => {
                    ctx.session.mistypes += 1;
                    return KeyOutcome::NoTarget;
                }
            }
        }
    };

    advance(world, ctx, target, typed)
}

fn is_alive(world: &World, entity: Entity) -> bool {
    world
        .get::<&FallingWord>(entity)
        .map(|word| word.alive)
        .unwrap_or(false)
}

/// Alive word starting with `typed`, nearest the castle; earliest spawn wins ties.
fn acquire(world: &World, typed: char) -> Option<Entity> {
    world
        .query::<(&FallingWord, &Position)>()
        .iter()
        .filter(|(_, (word, _))| word.alive && word.text.starts_with(typed))
        .max_by(|(_, (word_a, pos_a)), (_, (word_b, pos_b))| {
            pos_a
                .y
                .total_cmp(&pos_b.y)
                .then(word_b.spawn_seq.cmp(&word_a.spawn_seq))
        })
        .map(|(entity, _)| entity)
}

/// Apply one character to the locked word.
fn advance(world: &mut World, ctx: &mut InputContext<'_>, entity: Entity, typed: char) -> KeyOutcome {
    let (text, is_bonus, from_review, position) = {
        let Ok((word, position)) = world.query_one_mut::<(&mut FallingWord, &Position)>(entity)
        else {
            ctx.session.current_target = None;
            return KeyOutcome::NoTarget;
        };

        let expected = word
            .text
            .chars()
            .nth(word.typed_progress)
            .map(|c| c.to_ascii_uppercase());
        if expected != Some(typed) {
            word.typed_progress = 0;
            ctx.session.current_target = None;
            ctx.session.mistypes += 1;
            return KeyOutcome::Mistyped;
        }

        word.typed_progress += 1;
        if word.typed_progress < word.text.chars().count() {
            return KeyOutcome::Advanced;
        }

        word.alive = false;
        (word.text.clone(), word.is_bonus, word.from_review, *position)
    };

    let rules = ctx.rules;
    let len = text.chars().count() as u32;
    let mut points = len * rules.points_per_char;
    if is_bonus {
        points *= rules.bonus_score_multiplier;
    }
    if from_review {
        points *= rules.review_score_multiplier;
    }

    ctx.session.score += points;
    ctx.session.words_completed += 1;
    ctx.session.current_target = None;

    let center = Position::new(
        position.x + len as f64 * rules.cell_width / 2.0,
        position.y + rules.cell_height / 2.0,
    );
    ctx.effects
        .spawn_beam(ctx.beam_origin, center, ctx.now, rules.beam_duration_secs);
    ctx.audio_events.push(AudioEvent::WordCompleted {
        text: text.clone(),
        points,
    });
    debug!(%text, points, score = ctx.session.score, "word completed");

    KeyOutcome::Completed { points }
}
