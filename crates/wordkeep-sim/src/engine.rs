//! Simulation engine — the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, the castle, and the effects
//! registry, processes player commands, runs all systems, and produces
//! `GameStateSnapshot`s. Completely headless (no terminal dependency),
//! enabling deterministic testing.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, trace};

use wordkeep_core::commands::PlayerCommand;
use wordkeep_core::config::{CastleTemplate, ConfigError, DifficultyTable, GameRules};
use wordkeep_core::constants::MAX_FRAME_DT;
use wordkeep_core::enums::{AlertLevel, GamePhase};
use wordkeep_core::events::{Alert, AudioEvent};
use wordkeep_core::state::GameStateSnapshot;
use wordkeep_core::types::{Position, SimTime};

use crate::castle::Castle;
use crate::effects::EffectsRegistry;
use crate::session::SessionState;
use crate::systems;
use crate::systems::input::{InputContext, KeyOutcome};

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub rules: GameRules,
    pub difficulty: DifficultyTable,
    pub castle: CastleTemplate,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            rules: GameRules::default(),
            difficulty: DifficultyTable::default(),
            castle: CastleTemplate::default(),
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rules.validate()?;
        self.castle.validate(&self.rules)
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    rng: ChaCha8Rng,
    config: SimConfig,
    session: SessionState,
    castle: Castle,
    effects: EffectsRegistry,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    audio_events: Vec<AudioEvent>,
    alerts: Vec<Alert>,
}

impl SimulationEngine {
    /// Create a new simulation engine on the title screen.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let castle = Castle::from_template(&config.castle, config.rules.grid_width);
        Ok(Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            session: SessionState::new(),
            castle,
            effects: EffectsRegistry::new(),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            audio_events: Vec::new(),
            alerts: Vec::new(),
        })
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by `dt` seconds and return the resulting snapshot.
    ///
    /// `dt` is clamped to `[0, MAX_FRAME_DT]`; NaN counts as zero.
    pub fn tick(&mut self, dt: f64) -> GameStateSnapshot {
        let dt = if dt.is_nan() {
            0.0
        } else {
            dt.clamp(0.0, MAX_FRAME_DT)
        };

        self.process_commands();

        match self.phase {
            GamePhase::Active => {
                self.time.advance(dt);
                self.run_systems(dt);
            }
            // The field is frozen but the final explosions play out.
            GamePhase::GameOver => {
                self.time.advance(dt);
                self.effects.update(self.time.elapsed_secs, dt);
            }
            GamePhase::Title | GamePhase::Paused => {}
        }

        let alerts = std::mem::take(&mut self.alerts);
        let audio_events = std::mem::take(&mut self.audio_events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            &self.session,
            &self.castle,
            &self.effects,
            &self.config.rules,
            alerts,
            audio_events,
        )
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn castle(&self) -> &Castle {
        &self.castle
    }

    pub fn effects(&self) -> &EffectsRegistry {
        &self.effects
    }

    /// Place a word directly on the field (for tests needing exact positions).
    #[cfg(test)]
    pub fn spawn_test_word(
        &mut self,
        text: &str,
        column: usize,
        y: f64,
        is_bonus: bool,
    ) -> hecs::Entity {
        let fall_speed = self.config.difficulty.level(self.session.level).fall_speed;
        crate::world_setup::spawn_word(
            &mut self.world,
            &mut self.session,
            &self.config.rules,
            crate::world_setup::WordSpawn {
                text: text.to_string(),
                column,
                y,
                fall_speed,
                is_bonus,
                from_review: false,
            },
        )
    }

    /// Mutable castle access (for tests that stage damage).
    #[cfg(test)]
    pub fn castle_mut(&mut self) -> &mut Castle {
        &mut self.castle
    }

    /// Mutable session access (for tests that stage score).
    #[cfg(test)]
    pub fn session_mut(&mut self) -> &mut SessionState {
        &mut self.session
    }

    /// Beam start: top centre of the castle, or the field floor once it is gone.
    fn beam_origin(&self) -> Position {
        let rules = &self.config.rules;
        let y = if self.castle.row_count() > 0 {
            self.castle.row_top_pixel(0, rules)
        } else {
            rules.field_height()
        };
        Position::new(rules.field_width() / 2.0, y)
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::TypeChar { ch } => {
                if self.phase == GamePhase::Active {
                    let outcome = self.type_char(ch);
                    trace!(?ch, ?outcome, "keystroke");
                }
            }
            PlayerCommand::StartGame => {
                if matches!(self.phase, GamePhase::Title | GamePhase::GameOver) {
                    self.reset();
                    self.phase = GamePhase::Active;
                    info!(seed = self.config.seed, "game started");
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
        }
    }

    fn type_char(&mut self, ch: char) -> KeyOutcome {
        let beam_origin = self.beam_origin();
        let mut ctx = InputContext {
            session: &mut self.session,
            effects: &mut self.effects,
            audio_events: &mut self.audio_events,
            rules: &self.config.rules,
            beam_origin,
            now: self.time.elapsed_secs,
        };
        systems::input::run(&mut self.world, &mut ctx, ch)
    }

    /// Fresh session, fresh castle, empty field.
    fn reset(&mut self) {
        systems::cleanup::clear_words(&mut self.world, &mut self.despawn_buffer);
        self.session = SessionState::new();
        self.castle = Castle::from_template(&self.config.castle, self.config.rules.grid_width);
        self.effects.clear();
        self.time = SimTime::default();
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt: f64) {
        let now = self.time.elapsed_secs;
        let rules = &self.config.rules;

        // 1. Level progression
        systems::progression::run(
            &mut self.session,
            &self.config.difficulty,
            self.time.tick,
            &mut self.alerts,
            &mut self.audio_events,
        );
        // 2. Word spawning
        systems::spawner::run(
            &mut self.world,
            &mut self.session,
            &self.config.difficulty,
            rules,
            &mut self.rng,
            now,
        );
        // 3. Fall + castle impacts
        let defeat = systems::collision::run(
            &mut self.world,
            &mut self.session,
            &mut self.castle,
            &mut self.effects,
            &mut self.rng,
            &mut self.audio_events,
            rules,
            now,
            dt,
        );
        // 4. Effects aging
        self.effects.update(now, dt);
        // 5. Cleanup (completed, struck)
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);

        if let Some(cause) = defeat {
            systems::cleanup::clear_words(&mut self.world, &mut self.despawn_buffer);
            self.phase = GamePhase::GameOver;
            self.alerts.push(Alert {
                level: AlertLevel::Critical,
                message: format!("The castle has fallen: {cause:?}"),
                tick: self.time.tick,
            });
        }
    }
}
