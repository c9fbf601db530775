//! Simulation constants and tuning parameters.
//!
//! Most of these are the defaults behind `config::GameRules`; the rules
//! struct is what the simulation actually reads.

/// Frame rate of the cooperative game loop (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick at the nominal frame rate.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Upper bound on a single tick's delta time (seconds).
/// Stalls longer than this are absorbed instead of teleporting words.
pub const MAX_FRAME_DT: f64 = 0.1;

// --- Play field ---

/// Play field width in grid columns.
pub const GRID_WIDTH: usize = 60;

/// Play field height in grid rows.
pub const GRID_HEIGHT: usize = 25;

/// Width of one grid cell in pixels.
pub const CELL_WIDTH: f64 = 10.0;

/// Height of one grid cell in pixels.
pub const CELL_HEIGHT: f64 = 20.0;

// --- Scoring ---

/// Points awarded per character of a completed word.
pub const POINTS_PER_CHAR: u32 = 10;

// --- Bonus words ---

/// Probability that a spawned word is a bonus word.
pub const BONUS_CHANCE: f64 = 0.1;

/// Fall speed multiplier for bonus words.
pub const BONUS_SPEED_MULTIPLIER: f64 = 2.0;

/// Bonus words always fall at least this many times the level's base speed.
pub const BONUS_MIN_SPEED_FACTOR: f64 = 1.5;

/// Score multiplier for completing a bonus word.
pub const BONUS_SCORE_MULTIPLIER: u32 = 2;

/// Damage width multiplier when a bonus word strikes the castle.
pub const BONUS_DAMAGE_MULTIPLIER: usize = 2;

// --- Review pool ---

/// Probability of drawing from the review pool when the level has one.
pub const REVIEW_CHANCE: f64 = 0.3;

/// Score multiplier for words drawn from the review pool.
pub const REVIEW_SCORE_MULTIPLIER: u32 = 1;

// --- Castle ---

/// The game ends once the castle's mass falls to this fraction of its
/// initial mass (0.20 = 80% destroyed).
pub const CASTLE_LOSS_THRESHOLD: f64 = 0.20;

/// Glyph marking the keep (core region) in a castle template.
pub const KEEP_GLYPH: char = '@';

// --- Input ---

/// Punctuation accepted as typed input, besides ASCII letters and digits.
pub const ALLOWED_PUNCTUATION: &[char] = &[';', ',', '.', '\'', '/', '-'];

// --- Effects ---

/// Lifetime of an explosion effect (seconds).
pub const EXPLOSION_DURATION_SECS: f64 = 0.6;

/// Lifetime of a targeting beam effect (seconds).
pub const BEAM_DURATION_SECS: f64 = 0.15;

/// Particles emitted per explosion.
pub const EXPLOSION_PARTICLE_COUNT: usize = 12;

/// Initial particle speed range (pixels/second).
pub const PARTICLE_MIN_SPEED: f64 = 40.0;
pub const PARTICLE_MAX_SPEED: f64 = 160.0;

/// Fraction of particle velocity retained per second.
pub const PARTICLE_DRAG_PER_SEC: f64 = 0.15;

/// Starting particle radius in pixels; shrinks linearly to zero.
pub const PARTICLE_START_RADIUS: f64 = 4.0;
