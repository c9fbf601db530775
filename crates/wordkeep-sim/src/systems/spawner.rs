//! Spawner system — releases one word whenever the level's interval elapses.

use hecs::World;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use wordkeep_core::config::{DifficultyTable, GameRules};

use crate::session::SessionState;
use crate::world_setup::{self, WordSpawn};

/// Spawn a word if one is due. `last_spawn_time` only moves on an actual spawn.
pub fn run(
    world: &mut World,
    session: &mut SessionState,
    table: &DifficultyTable,
    rules: &GameRules,
    rng: &mut ChaCha8Rng,
    now: f64,
) -> Option<hecs::Entity> {
    if session.game_over {
        return None;
    }

    let level = table.level(session.level);
    if now - session.last_spawn_time <= level.spawn_interval_secs {
        return None;
    }
    if !level.has_candidates() {
        if session.warned_empty_level != Some(level.index) {
            warn!(level = level.index, "level has no candidate words, skipping spawns");
            session.warned_empty_level = Some(level.index);
        }
        return None;
    }

    let want_review =
        !level.review_pool.is_empty() && rng.gen_bool(rules.review_chance.clamp(0.0, 1.0));
    let (pool, from_review) = match (want_review, level.candidates.is_empty()) {
        (true, _) | (false, true) => (&level.review_pool, true),
        (false, false) => (&level.candidates, false),
    };
    let text = pool.choose(rng)?.clone();

    let is_bonus = rng.gen_bool(rules.bonus_chance.clamp(0.0, 1.0));
    let base = level.fall_speed;
    let fall_speed = if is_bonus {
        (base * rules.bonus_speed_multiplier).max(base * rules.bonus_min_speed_factor)
    } else {
        base
    };

    let len = text.chars().count();
    let column = rng.gen_range(0..=rules.grid_width.saturating_sub(len));

    debug!(%text, column, is_bonus, from_review, level = level.index, "spawn word");
    let entity = world_setup::spawn_word(
        world,
        session,
        rules,
        WordSpawn {
            text,
            column,
            y: 0.0,
            fall_speed,
            is_bonus,
            from_review,
        },
    );
    session.last_spawn_time = now;
    Some(entity)
}
