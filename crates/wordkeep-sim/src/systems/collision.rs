//! Fall and collision system.
//!
//! Moves every live word down by `speed * dt`, then checks each one against
//! the castle surface under its footprint. A word that reaches the surface
//! retires and knocks a hole in the row it hit; bonus words hit wider.

use std::ops::Range;

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use wordkeep_core::components::{FallSpeed, FallingWord};
use wordkeep_core::config::GameRules;
use wordkeep_core::enums::DefeatCause;
use wordkeep_core::events::AudioEvent;
use wordkeep_core::types::Position;

use crate::castle::Castle;
use crate::effects::EffectsRegistry;
use crate::session::SessionState;

/// Integrate word positions and resolve castle impacts.
/// Returns the defeat cause if this pass ended the game.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    session: &mut SessionState,
    castle: &mut Castle,
    effects: &mut EffectsRegistry,
    rng: &mut ChaCha8Rng,
    audio_events: &mut Vec<AudioEvent>,
    rules: &GameRules,
    now: f64,
    dt: f64,
) -> Option<DefeatCause> {
    if session.game_over {
        return None;
    }

    let mut falling: Vec<(u64, Entity)> = Vec::new();
    for (entity, (word, pos, speed)) in
        world.query_mut::<(&FallingWord, &mut Position, &FallSpeed)>()
    {
        if !word.alive {
            continue;
        }
        pos.y += speed.pixels_per_sec * dt;
        falling.push((word.spawn_seq, entity));
    }
    // Oldest word resolves first.
    falling.sort_unstable_by_key(|(seq, _)| *seq);

    for (_, entity) in falling {
        let Ok((word, pos)) = world.query_one_mut::<(&mut FallingWord, &Position)>(entity) else {
            continue;
        };

        if castle.row_count() == 0 {
            word.alive = false;
            finish(session, audio_events, DefeatCause::Leveled);
            return Some(DefeatCause::Leveled);
        }

        let footprint = footprint(pos.x, word.text.chars().count(), rules);
        let (row, boundary) = match castle.topmost_solid_row(footprint.clone()) {
            Some(row) => (row, castle.row_top_pixel(row, rules)),
            None => (castle.row_count() - 1, rules.field_height()),
        };
        if pos.y + rules.cell_height < boundary {
            continue;
        }

        word.alive = false;
        session.words_missed += 1;
        if session.current_target == Some(entity) {
            session.current_target = None;
        }

        let len = word.text.chars().count();
        let width = if word.is_bonus {
            len * rules.bonus_damage_multiplier
        } else {
            len
        };
        let damage = damage_columns(&footprint, width, rules.grid_width);
        let row_top = castle.row_top_pixel(row, rules);
        let report = castle.apply_damage(row, damage.clone());

        if let Some(span) = &report.cleared_span {
            let center = Position::new(
                (span.start + span.end) as f64 * rules.cell_width / 2.0,
                row_top + rules.cell_height / 2.0,
            );
            effects.spawn_explosion(center, now, rules.explosion_duration_secs, rng);
        }
        audio_events.push(AudioEvent::Impact {
            column: footprint.start,
            cells_cleared: report.cells_cleared,
            bonus: word.is_bonus,
        });
        debug!(
            text = %word.text,
            row,
            cells_cleared = report.cells_cleared,
            rows_pruned = report.rows_pruned,
            mass = castle.mass(),
            "word struck castle"
        );

        if let Some(cause) = castle.defeat(rules.loss_threshold) {
            finish(session, audio_events, cause);
            return Some(cause);
        }
    }

    None
}

/// Grid columns under a word whose left edge is at pixel `x`, clipped to the grid.
pub fn footprint(x: f64, len: usize, rules: &GameRules) -> Range<usize> {
    let start = (x / rules.cell_width).floor().max(0.0) as usize;
    let start = start.min(rules.grid_width);
    start..(start + len).min(rules.grid_width)
}

/// `width` columns centred on `footprint`, clipped to the grid.
pub fn damage_columns(footprint: &Range<usize>, width: usize, grid_width: usize) -> Range<usize> {
    let start = ((footprint.start + footprint.end) as i64 - width as i64).div_euclid(2);
    let end = start + width as i64;
    let clip = |v: i64| v.clamp(0, grid_width as i64) as usize;
    clip(start)..clip(end)
}

fn finish(session: &mut SessionState, audio_events: &mut Vec<AudioEvent>, cause: DefeatCause) {
    if session.end_game(cause) {
        audio_events.push(AudioEvent::CastleFallen { cause });
        info!(?cause, score = session.score, "castle has fallen");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use wordkeep_core::enums::{Cell, Material};

    use crate::world_setup::{spawn_word, WordSpawn};

    fn solid_rows(count: usize, width: usize) -> Vec<Vec<Cell>> {
        vec![vec![Cell::Solid(Material::Rampart); width]; count]
    }

    struct Field {
        world: World,
        session: SessionState,
        castle: Castle,
        effects: EffectsRegistry,
        rng: ChaCha8Rng,
        audio: Vec<AudioEvent>,
        rules: GameRules,
    }

    impl Field {
        fn new(castle: Castle, rules: GameRules) -> Self {
            Self {
                world: World::new(),
                session: SessionState::new(),
                castle,
                effects: EffectsRegistry::new(),
                rng: ChaCha8Rng::seed_from_u64(3),
                audio: Vec::new(),
                rules,
            }
        }

        fn drop_word(&mut self, text: &str, column: usize, y: f64, is_bonus: bool) -> Entity {
            spawn_word(
                &mut self.world,
                &mut self.session,
                &self.rules,
                WordSpawn {
                    text: text.into(),
                    column,
                    y,
                    fall_speed: 1.0,
                    is_bonus,
                    from_review: false,
                },
            )
        }

        fn step(&mut self, dt: f64) -> Option<DefeatCause> {
            run(
                &mut self.world,
                &mut self.session,
                &mut self.castle,
                &mut self.effects,
                &mut self.rng,
                &mut self.audio,
                &self.rules,
                0.0,
                dt,
            )
        }

        fn alive(&self, entity: Entity) -> bool {
            self.world.get::<&FallingWord>(entity).unwrap().alive
        }
    }

    #[test]
    fn test_footprint_clips_to_grid() {
        let rules = GameRules::default();
        assert_eq!(footprint(0.0, 3, &rules), 0..3);
        assert_eq!(footprint(25.0, 2, &rules), 2..4);
        assert_eq!(footprint(580.0, 5, &rules), 58..60);
    }

    #[test]
    fn test_damage_columns_centred() {
        assert_eq!(damage_columns(&(10..13), 3, 60), 10..13);
        assert_eq!(damage_columns(&(10..13), 6, 60), 8..14);
        assert_eq!(damage_columns(&(0..2), 4, 60), 0..3);
        assert_eq!(damage_columns(&(58..60), 4, 60), 57..60);
    }

    #[test]
    fn test_word_falls_by_speed() {
        let rules = GameRules::default();
        let mut field = Field::new(Castle::from_rows(solid_rows(3, 60), 60, None), rules);
        let word = field.drop_word("CAT", 0, 0.0, false);
        field.step(0.5);
        let y = field.world.get::<&Position>(word).unwrap().y;
        assert!((y - 0.5 * field.rules.cell_height).abs() < 1e-9);
        assert!(field.alive(word));
    }

    #[test]
    fn test_impact_clears_footprint_on_top_row() {
        let rules = GameRules::default();
        let mut field = Field::new(Castle::from_rows(solid_rows(3, 60), 60, None), rules);
        let top = field.castle.row_top_pixel(0, &field.rules);
        let word = field.drop_word("CAT", 10, top - field.rules.cell_height, false);

        let mass_before = field.castle.mass();
        assert_eq!(field.step(0.0), None);
        assert!(!field.alive(word));
        assert_eq!(field.session.words_missed, 1);
        assert_eq!(field.castle.mass(), mass_before - 3);
        assert!(field.castle.rows()[0][10..13].iter().all(|c| !c.is_solid()));
        assert_eq!(field.effects.len(), 1);
        assert!(matches!(
            field.audio.as_slice(),
            [AudioEvent::Impact { column: 10, cells_cleared: 3, bonus: false }]
        ));
    }

    #[test]
    fn test_word_above_boundary_survives() {
        let rules = GameRules::default();
        let mut field = Field::new(Castle::from_rows(solid_rows(3, 60), 60, None), rules);
        let top = field.castle.row_top_pixel(0, &field.rules);
        let word = field.drop_word("CAT", 10, top - field.rules.cell_height - 1.0, false);
        field.step(0.0);
        assert!(field.alive(word));
        assert_eq!(field.castle.mass(), field.castle.initial_mass());
    }

    #[test]
    fn test_bonus_word_hits_wider() {
        let rules = GameRules::default();
        let mut field = Field::new(Castle::from_rows(solid_rows(3, 60), 60, None), rules);
        let top = field.castle.row_top_pixel(0, &field.rules);
        field.drop_word("AB", 20, top, true);
        field.step(0.0);
        assert_eq!(field.castle.initial_mass() - field.castle.mass(), 4);
        assert!(field.castle.rows()[0][19..23].iter().all(|c| !c.is_solid()));
    }

    #[test]
    fn test_hole_lets_word_reach_lower_row() {
        let rules = GameRules::default();
        let mut rows = solid_rows(2, 60);
        for cell in &mut rows[0][10..13] {
            *cell = Cell::Empty;
        }
        let mut field = Field::new(Castle::from_rows(rows, 60, None), rules);
        let top_row_pixel = field.castle.row_top_pixel(0, &field.rules);
        let word = field.drop_word("CAT", 10, top_row_pixel - field.rules.cell_height, false);
        field.step(0.0);
        assert!(field.alive(word), "Nothing solid under the word on row 0");

        let lower = field.castle.row_top_pixel(1, &field.rules);
        field
            .world
            .get::<&mut Position>(word)
            .unwrap()
            .y = lower - field.rules.cell_height;
        field.step(0.0);
        assert!(!field.alive(word));
        assert!(field.castle.rows()[1][10..13].iter().all(|c| !c.is_solid()));
    }

    #[test]
    fn test_leveling_castle_ends_game() {
        let rules = GameRules {
            grid_width: 20,
            ..Default::default()
        };
        let mut rows = vec![vec![Cell::Empty; 20]];
        for cell in &mut rows[0][5..10] {
            *cell = Cell::Solid(Material::Keep);
        }
        let castle = Castle::from_rows(rows, 20, Some((5..10, 0)));
        let mut field = Field::new(castle, rules);
        let top = field.castle.row_top_pixel(0, &field.rules);
        field.drop_word("HELLO", 5, top, false);

        assert_eq!(field.step(0.0), Some(DefeatCause::Leveled));
        assert!(field.session.game_over);
        assert_eq!(field.session.defeat, Some(DefeatCause::Leveled));
        assert!(matches!(
            field.audio.last(),
            Some(AudioEvent::CastleFallen { cause: DefeatCause::Leveled })
        ));
    }

    #[test]
    fn test_processing_stops_after_defeat() {
        let rules = GameRules {
            grid_width: 20,
            ..Default::default()
        };
        let mut rows = vec![vec![Cell::Empty; 20]];
        for cell in &mut rows[0][5..10] {
            *cell = Cell::Solid(Material::Keep);
        }
        let castle = Castle::from_rows(rows, 20, Some((5..10, 0)));
        let mut field = Field::new(castle, rules);
        let top = field.castle.row_top_pixel(0, &field.rules);
        field.drop_word("HELLO", 5, top, false);
        let late = field.drop_word("LATE", 12, top, false);

        field.step(0.0);
        assert!(field.alive(late));
        assert_eq!(field.session.words_missed, 1);
    }

    #[test]
    fn test_impact_clears_lock_on_struck_word() {
        let rules = GameRules::default();
        let mut field = Field::new(Castle::from_rows(solid_rows(3, 60), 60, None), rules);
        let top = field.castle.row_top_pixel(0, &field.rules);
        let word = field.drop_word("CAT", 10, top, false);
        field.session.current_target = Some(word);
        field.step(0.0);
        assert!(field.session.current_target.is_none());
    }
}
