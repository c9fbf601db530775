//! Game configuration: tuning rules, the difficulty table, and the castle template.
//!
//! Everything here is plain serde data. Tables and templates can be loaded
//! from JSON; loaders normalize text to uppercase and reject structurally
//! invalid input with a `ConfigError`. Levels with empty pools are allowed;
//! the spawner simply skips them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("difficulty table has no levels")]
    EmptyTable,
    #[error("level {level}: fall speed must be positive and finite, got {value}")]
    InvalidSpeed { level: usize, value: f64 },
    #[error("level {level}: spawn interval must be positive and finite, got {value}")]
    InvalidInterval { level: usize, value: f64 },
    #[error("level {level}: {word:?} contains characters that cannot be typed")]
    UntypeableWord { level: usize, word: String },
    #[error("rule `{name}` out of range: {value}")]
    InvalidRule { name: &'static str, value: f64 },
    #[error("castle template is empty")]
    EmptyTemplate,
    #[error("castle template has {rows} rows but the grid is only {grid_height} tall")]
    TemplateTooTall { rows: usize, grid_height: usize },
    #[error("castle row {row} is {actual} cells wide, expected {expected}")]
    TemplateWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// Tunable game rules. Defaults come from `constants.rs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    pub grid_width: usize,
    pub grid_height: usize,
    pub cell_width: f64,
    pub cell_height: f64,
    pub points_per_char: u32,
    pub bonus_chance: f64,
    pub bonus_speed_multiplier: f64,
    pub bonus_min_speed_factor: f64,
    pub bonus_score_multiplier: u32,
    pub bonus_damage_multiplier: usize,
    pub review_chance: f64,
    /// Whether review words score differently from fresh ones.
    pub review_score_multiplier: u32,
    /// Fraction of initial mass at or below which the castle falls.
    pub loss_threshold: f64,
    pub explosion_duration_secs: f64,
    pub beam_duration_secs: f64,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            cell_width: CELL_WIDTH,
            cell_height: CELL_HEIGHT,
            points_per_char: POINTS_PER_CHAR,
            bonus_chance: BONUS_CHANCE,
            bonus_speed_multiplier: BONUS_SPEED_MULTIPLIER,
            bonus_min_speed_factor: BONUS_MIN_SPEED_FACTOR,
            bonus_score_multiplier: BONUS_SCORE_MULTIPLIER,
            bonus_damage_multiplier: BONUS_DAMAGE_MULTIPLIER,
            review_chance: REVIEW_CHANCE,
            review_score_multiplier: REVIEW_SCORE_MULTIPLIER,
            loss_threshold: CASTLE_LOSS_THRESHOLD,
            explosion_duration_secs: EXPLOSION_DURATION_SECS,
            beam_duration_secs: BEAM_DURATION_SECS,
        }
    }
}

impl GameRules {
    /// Play field height in pixels.
    pub fn field_height(&self) -> f64 {
        self.grid_height as f64 * self.cell_height
    }

    /// Play field width in pixels.
    pub fn field_width(&self) -> f64 {
        self.grid_width as f64 * self.cell_width
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let probabilities = [
            ("bonus_chance", self.bonus_chance),
            ("review_chance", self.review_chance),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidRule { name, value });
            }
        }
        if !(0.0..1.0).contains(&self.loss_threshold) {
            return Err(ConfigError::InvalidRule {
                name: "loss_threshold",
                value: self.loss_threshold,
            });
        }
        let positive = [
            ("grid_width", self.grid_width as f64),
            ("grid_height", self.grid_height as f64),
            ("cell_width", self.cell_width),
            ("cell_height", self.cell_height),
            ("bonus_speed_multiplier", self.bonus_speed_multiplier),
            ("explosion_duration_secs", self.explosion_duration_secs),
            ("beam_duration_secs", self.beam_duration_secs),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidRule { name, value });
            }
        }
        Ok(())
    }
}

/// One row of the difficulty table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyLevel {
    /// 1-based position in the table, assigned on load.
    #[serde(skip)]
    pub index: usize,
    /// Fresh strings introduced at this level.
    #[serde(alias = "items")]
    pub candidates: Vec<String>,
    /// Strings from earlier levels mixed in for reinforcement.
    #[serde(default, alias = "review")]
    pub review_pool: Vec<String>,
    /// Base fall speed in grid rows per second.
    #[serde(alias = "speed")]
    pub fall_speed: f64,
    /// Minimum seconds between spawns.
    #[serde(alias = "interval")]
    pub spawn_interval_secs: f64,
    /// Cumulative score needed to advance past this level.
    #[serde(alias = "threshold")]
    pub score_threshold: u32,
}

impl DifficultyLevel {
    pub fn new(
        candidates: &[&str],
        review_pool: &[&str],
        fall_speed: f64,
        spawn_interval_secs: f64,
        score_threshold: u32,
    ) -> Self {
        Self {
            index: 0,
            candidates: candidates.iter().map(|s| s.to_string()).collect(),
            review_pool: review_pool.iter().map(|s| s.to_string()).collect(),
            fall_speed,
            spawn_interval_secs,
            score_threshold,
        }
    }

    /// Whether the spawner has anything to draw from.
    pub fn has_candidates(&self) -> bool {
        !self.candidates.is_empty() || !self.review_pool.is_empty()
    }
}

/// Ordered difficulty progression.
///
/// Every constructor, deserialization included, goes through `normalize`,
/// so a table always has at least one level with a positive speed and
/// interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct DifficultyTable {
    levels: Vec<DifficultyLevel>,
}

/// Wire shape of a table before normalization.
#[derive(Deserialize)]
struct RawTable {
    levels: Vec<DifficultyLevel>,
}

impl TryFrom<RawTable> for DifficultyTable {
    type Error = ConfigError;

    fn try_from(raw: RawTable) -> Result<Self, Self::Error> {
        Self::from_levels(raw.levels)
    }
}

impl Default for DifficultyTable {
    /// Home-row letters, then the full alphabet, then words of growing length.
    fn default() -> Self {
        let alphabet: Vec<String> = ('A'..='Z').map(String::from).collect();
        let alphabet: Vec<&str> = alphabet.iter().map(String::as_str).collect();

        let levels = vec![
            DifficultyLevel::new(&["F", "J", "G", "H"], &[], 0.3, 2.0, 50),
            DifficultyLevel::new(&["D", "K", "S", "L"], &["F", "J", "G", "H"], 0.35, 1.8, 150),
            DifficultyLevel::new(&["A", ";"], &["F", "J", "D", "K", "S", "L"], 0.4, 1.6, 300),
            DifficultyLevel::new(&alphabet, &["A", ";", "S", "L"], 0.45, 1.4, 500),
            DifficultyLevel::new(
                &["THE", "AND", "FOR", "ARE", "BUT"],
                &["Q", "W", "E", "R", "T", "Y", "U", "I", "O", "P"],
                0.5,
                2.5,
                800,
            ),
            DifficultyLevel::new(
                &["THIS", "THAT", "WITH", "FROM", "HAVE"],
                &["THE", "AND", "FOR", "ARE", "BUT"],
                0.55,
                2.2,
                1200,
            ),
            DifficultyLevel::new(
                &["LEARN", "RUST", "GAME", "TYPING", "KEYBOARD"],
                &["THIS", "THAT", "WITH", "FROM", "HAVE"],
                0.6,
                2.0,
                1800,
            ),
            DifficultyLevel::new(
                &["PROGRAMMING", "DEVELOPMENT", "COMPUTER", "SCIENCE", "INTELLIGENCE"],
                &["LEARN", "GAME", "TYPING", "KEYBOARD", "THE", "AND"],
                0.65,
                1.8,
                2500,
            ),
        ];

        let mut table = Self { levels };
        table.normalize_pools();
        table
    }
}

impl DifficultyTable {
    /// Build a table from raw levels, normalizing and validating them.
    pub fn from_levels(levels: Vec<DifficultyLevel>) -> Result<Self, ConfigError> {
        let mut table = Self { levels };
        table.normalize()?;
        Ok(table)
    }

    /// Parse a `{"levels": [...]}` JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let raw: RawTable = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    /// Read and parse a JSON table from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Level definition for a 1-based index, clamped to the table bounds.
    pub fn level(&self, index: usize) -> &DifficultyLevel {
        let i = index.clamp(1, self.levels.len()) - 1;
        &self.levels[i]
    }

    /// Index of the last level (also the number of levels).
    pub fn last_level(&self) -> usize {
        self.levels.len()
    }

    pub fn levels(&self) -> &[DifficultyLevel] {
        &self.levels
    }

    fn normalize(&mut self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::EmptyTable);
        }
        self.normalize_pools();
        for level in &self.levels {
            let untypeable = level
                .candidates
                .iter()
                .chain(&level.review_pool)
                .find(|word| !word.chars().all(is_typeable));
            if let Some(word) = untypeable {
                return Err(ConfigError::UntypeableWord {
                    level: level.index,
                    word: word.clone(),
                });
            }
            if !(level.fall_speed.is_finite() && level.fall_speed > 0.0) {
                return Err(ConfigError::InvalidSpeed {
                    level: level.index,
                    value: level.fall_speed,
                });
            }
            if !(level.spawn_interval_secs.is_finite() && level.spawn_interval_secs > 0.0) {
                return Err(ConfigError::InvalidInterval {
                    level: level.index,
                    value: level.spawn_interval_secs,
                });
            }
        }
        Ok(())
    }

    fn normalize_pools(&mut self) {
        for (i, level) in self.levels.iter_mut().enumerate() {
            level.index = i + 1;
            normalize_pool(&mut level.candidates);
            normalize_pool(&mut level.review_pool);
        }
    }
}

/// Letters, digits, and the punctuation allow-list.
pub fn is_typeable(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ALLOWED_PUNCTUATION.contains(&ch)
}

/// Uppercase, trim, and drop blank entries.
fn normalize_pool(pool: &mut Vec<String>) {
    *pool = pool
        .iter()
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();
}

/// Castle layout, one string per row, top row first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastleTemplate {
    pub rows: Vec<String>,
}

impl Default for CastleTemplate {
    fn default() -> Self {
        let keep_width = 6;
        let side = (GRID_WIDTH - keep_width) / 2;
        let keep_row = format!(
            "{}{}{}",
            "|".repeat(side),
            KEEP_GLYPH.to_string().repeat(keep_width),
            "|".repeat(GRID_WIDTH - side - keep_width),
        );
        Self {
            rows: vec!["#".repeat(GRID_WIDTH), "=".repeat(GRID_WIDTH), keep_row],
        }
    }
}

impl CastleTemplate {
    /// Check the template fits the play field described by `rules`.
    pub fn validate(&self, rules: &GameRules) -> Result<(), ConfigError> {
        if self.rows.is_empty() {
            return Err(ConfigError::EmptyTemplate);
        }
        if self.rows.len() > rules.grid_height {
            return Err(ConfigError::TemplateTooTall {
                rows: self.rows.len(),
                grid_height: rules.grid_height,
            });
        }
        for (row, line) in self.rows.iter().enumerate() {
            let actual = line.chars().count();
            if actual != rules.grid_width {
                return Err(ConfigError::TemplateWidth {
                    row,
                    expected: rules.grid_width,
                    actual,
                });
            }
        }
        Ok(())
    }
}
