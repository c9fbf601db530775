//! Tests for the simulation engine: command flow, typing, impacts, and progression.

use wordkeep_core::commands::PlayerCommand;
use wordkeep_core::components::FallingWord;
use wordkeep_core::config::{CastleTemplate, DifficultyLevel, DifficultyTable, GameRules};
use wordkeep_core::constants::{DT, MAX_FRAME_DT};
use wordkeep_core::enums::*;
use wordkeep_core::events::AudioEvent;

use crate::engine::{SimConfig, SimulationEngine};

fn started(config: SimConfig) -> SimulationEngine {
    let mut engine = SimulationEngine::new(config).unwrap();
    engine.queue_command(PlayerCommand::StartGame);
    engine.tick(0.0);
    engine
}

fn type_keys(engine: &mut SimulationEngine, keys: &str) {
    engine.queue_commands(keys.chars().map(|ch| PlayerCommand::TypeChar { ch }));
}

fn word_count(engine: &SimulationEngine) -> usize {
    let mut q = engine.world().query::<&FallingWord>();
    q.iter().count()
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = started(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    let mut engine_b = started(SimConfig {
        seed: 12345,
        ..Default::default()
    });

    for i in 0..2000 {
        if i % 97 == 0 {
            type_keys(&mut engine_a, "fj");
            type_keys(&mut engine_b, "fj");
        }
        let snap_a = engine_a.tick(DT);
        let snap_b = engine_b.tick(DT);

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = started(SimConfig {
        seed: 111,
        ..Default::default()
    });
    let mut engine_b = started(SimConfig {
        seed: 222,
        ..Default::default()
    });

    let mut diverged = false;
    for _ in 0..1000 {
        let json_a = serde_json::to_string(&engine_a.tick(DT)).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick(DT)).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent output");
}

// ---- Phases ----

#[test]
fn test_title_screen_is_idle() {
    let mut engine = SimulationEngine::new(SimConfig::default()).unwrap();
    type_keys(&mut engine, "f");
    for _ in 0..300 {
        engine.tick(DT);
    }
    assert_eq!(engine.phase(), GamePhase::Title);
    assert_eq!(engine.time().tick, 0);
    assert_eq!(engine.session().keystrokes, 0);
    assert_eq!(word_count(&engine), 0);
}

#[test]
fn test_invalid_config_rejected() {
    let config = SimConfig {
        rules: GameRules {
            grid_width: 40,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(
        SimulationEngine::new(config).is_err(),
        "Default castle is wider than a 40-column grid"
    );
}

#[test]
fn test_pause_stops_simulation() {
    let mut engine = started(SimConfig::default());
    let word = engine.spawn_test_word("CAT", 0, 0.0, false);

    for _ in 0..10 {
        engine.tick(DT);
    }
    assert_eq!(engine.time().tick, 11);
    let y_before = engine.world().get::<&wordkeep_core::types::Position>(word).unwrap().y;

    engine.queue_command(PlayerCommand::Pause);
    type_keys(&mut engine, "c");
    for _ in 0..10 {
        engine.tick(DT);
    }
    assert_eq!(engine.phase(), GamePhase::Paused);
    assert_eq!(engine.time().tick, 11, "Time should not advance while paused");
    let y_paused = engine.world().get::<&wordkeep_core::types::Position>(word).unwrap().y;
    assert_eq!(y_before, y_paused);
    assert_eq!(engine.session().keystrokes, 0, "Keys are dropped while paused");

    engine.queue_command(PlayerCommand::Resume);
    for _ in 0..10 {
        engine.tick(DT);
    }
    assert_eq!(engine.time().tick, 21);
    assert_eq!(engine.phase(), GamePhase::Active);
}

#[test]
fn test_start_ignored_while_active() {
    let mut engine = started(SimConfig::default());
    engine.session_mut().score = 40;
    engine.queue_command(PlayerCommand::StartGame);
    engine.tick(DT);
    assert_eq!(engine.session().score, 40);
}

#[test]
fn test_dt_is_clamped() {
    let mut engine = started(SimConfig::default());
    engine.tick(5.0);
    assert!((engine.time().elapsed_secs - MAX_FRAME_DT).abs() < 1e-12);
    engine.tick(-1.0);
    engine.tick(f64::NAN);
    assert!((engine.time().elapsed_secs - MAX_FRAME_DT).abs() < 1e-12);
    // One tick was spent starting the game.
    assert_eq!(engine.time().tick, 4);
}

// ---- Typing ----

#[test]
fn test_single_letter_word_completes() {
    let table =
        DifficultyTable::from_levels(vec![DifficultyLevel::new(&["F"], &[], 0.3, 2.0, 50)])
            .unwrap();
    let mut engine = started(SimConfig {
        difficulty: table,
        ..Default::default()
    });
    engine.spawn_test_word("F", 0, 0.0, false);

    type_keys(&mut engine, "F");
    let snap = engine.tick(DT);

    assert_eq!(snap.score.score, 10);
    assert_eq!(snap.score.words_completed, 1);
    assert!(snap.words.is_empty());
    assert_eq!(word_count(&engine), 0, "Completed word despawned");
    assert_eq!(snap.effects.len(), 1);
    assert_eq!(snap.effects[0].kind, EffectKind::TargetBeam);
    assert!(snap
        .audio_events
        .iter()
        .any(|e| matches!(e, AudioEvent::WordCompleted { points: 10, .. })));
}

#[test]
fn test_mistype_then_reacquire() {
    let mut engine = started(SimConfig::default());
    let cat = engine.spawn_test_word("CAT", 3, 0.0, false);

    type_keys(&mut engine, "c");
    let snap = engine.tick(DT);
    assert_eq!(snap.current_target, Some(cat.to_bits().get()));
    assert_eq!(snap.words[0].typed_progress, 1);
    assert!(snap.words[0].targeted);

    type_keys(&mut engine, "x");
    let snap = engine.tick(DT);
    assert_eq!(snap.current_target, None);
    assert_eq!(snap.words[0].typed_progress, 0);
    assert!(!snap.words[0].targeted);

    type_keys(&mut engine, "c");
    let snap = engine.tick(DT);
    assert_eq!(snap.current_target, Some(cat.to_bits().get()));
    assert_eq!(snap.words[0].typed_progress, 1);
    assert_eq!(snap.score.mistypes, 1);
    assert_eq!(snap.score.keystrokes, 3);
    assert!((snap.score.accuracy - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_progress_never_exceeds_length() {
    let mut engine = started(SimConfig::default());
    engine.spawn_test_word("GAME", 10, 0.0, false);
    engine.spawn_test_word("GO", 30, 50.0, false);

    for keys in ["g", "a", "m", "z", "g", "o", "g", "a", "m", "e"] {
        type_keys(&mut engine, keys);
        let snap = engine.tick(DT);
        for word in &snap.words {
            assert!(word.typed_progress <= word.text.len());
            assert!(
                word.typed_progress == 0 || word.targeted,
                "Only the locked word carries progress"
            );
        }
    }
    assert_eq!(engine.session().words_completed, 2);
    assert_eq!(engine.session().score, 60);
}

#[test]
fn test_bonus_word_scores_double() {
    let mut engine = started(SimConfig::default());
    engine.spawn_test_word("RUST", 0, 0.0, true);
    type_keys(&mut engine, "rust");
    let snap = engine.tick(DT);
    assert_eq!(snap.score.score, 4 * 10 * 2);
}

#[test]
fn test_snapshot_words_in_spawn_order() {
    let mut engine = started(SimConfig::default());
    let ids: Vec<u64> = ["ONE", "TWO", "SIX"]
        .iter()
        .enumerate()
        .map(|(i, text)| {
            engine
                .spawn_test_word(text, i * 10, 100.0 - i as f64 * 30.0, false)
                .to_bits()
                .get()
        })
        .collect();
    let snap = engine.tick(DT);
    let seen: Vec<u64> = snap.words.iter().map(|w| w.id).collect();
    assert_eq!(seen, ids);
}

// ---- Impacts ----

#[test]
fn test_wide_word_levels_single_row_castle() {
    let config = SimConfig {
        rules: GameRules {
            grid_width: 20,
            ..Default::default()
        },
        castle: CastleTemplate {
            rows: vec!["|||||@@@@@||||||||||".into()],
        },
        ..Default::default()
    };
    let mut engine = started(config);
    assert_eq!(engine.castle().keep_row(), Some(0));

    let top = engine.castle().row_top_pixel(0, &engine.config().rules);
    engine.spawn_test_word("ABCDEFGHIJKLMNOPQRST", 0, top, false);
    let snap = engine.tick(DT);

    assert_eq!(snap.phase, GamePhase::GameOver);
    assert_eq!(snap.defeat, Some(DefeatCause::Leveled));
    assert!(snap.castle.rows.is_empty());
    assert_eq!(snap.castle.mass, 0);
    assert!(snap.words.is_empty());
    assert!(snap
        .audio_events
        .iter()
        .any(|e| matches!(e, AudioEvent::CastleFallen { cause: DefeatCause::Leveled })));
    assert!(snap.alerts.iter().any(|a| a.level == AlertLevel::Critical));
}

#[test]
fn test_keep_destroyed_ends_game() {
    let mut engine = started(SimConfig::default());
    let keep = engine.castle().keep().unwrap().columns.clone();
    let keep_row = engine.castle().keep_row().unwrap();
    for row in 0..keep_row {
        engine.castle_mut().apply_damage(row, keep.clone());
    }

    let boundary = engine.castle().row_top_pixel(keep_row, &engine.config().rules);
    engine.spawn_test_word("KEEPER", keep.start, boundary, false);
    let snap = engine.tick(DT);

    assert_eq!(snap.phase, GamePhase::GameOver);
    assert_eq!(snap.defeat, Some(DefeatCause::KeepDestroyed));
    assert!(!snap.castle.keep_intact);
}

#[test]
fn test_mass_never_increases_and_game_over_is_terminal() {
    let mut engine = started(SimConfig {
        seed: 7,
        ..Default::default()
    });
    let mut last_mass = engine.castle().mass();
    let mut last_rows = engine.castle().row_count();
    let mut ended = false;

    for _ in 0..6000 {
        let snap = engine.tick(MAX_FRAME_DT);
        assert!(snap.castle.mass <= last_mass, "Castle mass grew");
        last_mass = snap.castle.mass;
        let rows = engine.castle().row_count();
        assert!(rows <= last_rows, "Castle gained a row");
        last_rows = rows;

        if snap.phase == GamePhase::GameOver {
            ended = true;
            assert!(snap.defeat.is_some());
            assert!(snap.words.is_empty());
        } else {
            assert!(!ended, "Game over must latch");
        }
    }
}

#[test]
fn test_start_after_game_over_resets() {
    let config = SimConfig {
        rules: GameRules {
            grid_width: 20,
            ..Default::default()
        },
        castle: CastleTemplate {
            rows: vec!["|||||@@@@@||||||||||".into()],
        },
        ..Default::default()
    };
    let mut engine = started(config);
    let top = engine.castle().row_top_pixel(0, &engine.config().rules);
    engine.spawn_test_word("ABCDEFGHIJKLMNOPQRST", 0, top, false);
    engine.tick(DT);
    assert_eq!(engine.phase(), GamePhase::GameOver);

    type_keys(&mut engine, "a");
    engine.tick(DT);
    assert_eq!(engine.session().keystrokes, 0, "No typing after game over");

    engine.queue_command(PlayerCommand::StartGame);
    let snap = engine.tick(DT);
    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.defeat, None);
    assert_eq!(snap.level, 1);
    assert_eq!(snap.score.score, 0);
    assert_eq!(snap.castle.mass, 20);
    assert_eq!(snap.castle.initial_mass, 20);
    assert_eq!(engine.time().tick, 1);
}

#[test]
fn test_final_explosion_outlives_game_over() {
    let config = SimConfig {
        rules: GameRules {
            grid_width: 20,
            ..Default::default()
        },
        castle: CastleTemplate {
            rows: vec!["|||||@@@@@||||||||||".into()],
        },
        ..Default::default()
    };
    let mut engine = started(config);
    let top = engine.castle().row_top_pixel(0, &engine.config().rules);
    engine.spawn_test_word("ABCDEFGHIJKLMNOPQRST", 0, top, false);

    let snap = engine.tick(DT);
    assert_eq!(snap.phase, GamePhase::GameOver);
    assert!(snap.words.is_empty());
    assert_eq!(snap.effects.len(), 1, "Killing blow should leave its explosion");
    assert_eq!(snap.effects[0].kind, EffectKind::Explosion);

    let duration = engine.config().rules.explosion_duration_secs;
    let ticks = (duration / DT).ceil() as usize + 1;
    let mut snap = engine.tick(DT);
    for _ in 0..ticks {
        snap = engine.tick(DT);
    }
    assert_eq!(snap.phase, GamePhase::GameOver);
    assert!(snap.effects.is_empty(), "Explosion should expire during game over");

    engine.queue_command(PlayerCommand::StartGame);
    assert!(engine.tick(DT).effects.is_empty());
}

// ---- Spawning ----

#[test]
fn test_spawn_waits_for_interval() {
    let table =
        DifficultyTable::from_levels(vec![DifficultyLevel::new(&["F"], &[], 0.3, 2.0, 50)])
            .unwrap();
    let mut engine = started(SimConfig {
        difficulty: table,
        ..Default::default()
    });

    for _ in 0..19 {
        engine.tick(0.1);
    }
    assert_eq!(word_count(&engine), 0);
    for _ in 0..3 {
        engine.tick(0.1);
    }
    assert_eq!(word_count(&engine), 1, "Exactly one spawn per interval");

    let snap = engine.tick(0.1);
    assert_eq!(snap.words[0].text, "F");
    assert_eq!(snap.words[0].typed_progress, 0);
}

#[test]
fn test_empty_level_spawns_nothing() {
    let table =
        DifficultyTable::from_levels(vec![DifficultyLevel::new(&[], &[], 0.3, 0.5, 50)]).unwrap();
    let mut engine = started(SimConfig {
        difficulty: table,
        ..Default::default()
    });
    for _ in 0..100 {
        engine.tick(0.1);
    }
    assert_eq!(word_count(&engine), 0);
    assert_eq!(engine.phase(), GamePhase::Active);
}

#[test]
fn test_spawned_words_fit_the_grid() {
    let mut engine = started(SimConfig {
        seed: 99,
        ..Default::default()
    });
    engine.session_mut().score = 5000;
    let rules = engine.config().rules.clone();
    for _ in 0..600 {
        let snap = engine.tick(MAX_FRAME_DT);
        for word in &snap.words {
            let column = (word.position.x / rules.cell_width).round() as usize;
            assert!(column + word.text.len() <= rules.grid_width);
            assert_eq!(word.text, word.text.to_uppercase());
        }
    }
}

// ---- Progression ----

#[test]
fn test_level_climbs_one_per_tick_and_clamps() {
    let mut engine = started(SimConfig::default());
    let last = engine.config().difficulty.last_level();
    engine.session_mut().score = 10_000;

    let first = engine.tick(DT);
    assert_eq!(first.level, 2);
    assert!(first
        .audio_events
        .iter()
        .any(|e| matches!(e, AudioEvent::LevelUp { level: 2 })));
    assert_eq!(first.alerts.len(), 1);

    let mut level = first.level;
    for _ in 0..20 {
        let snap = engine.tick(DT);
        assert!(snap.level >= level && snap.level <= level + 1);
        level = snap.level;
    }
    assert_eq!(level, last);
}
