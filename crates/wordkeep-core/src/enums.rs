//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Castle building material. Purely cosmetic apart from `Keep`,
/// which marks the core region in a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    /// Crenellated top course (`#`).
    Battlement,
    /// Wall walk (`=`).
    Rampart,
    /// Supporting columns (`|`).
    Pillar,
    /// The keep; losing all of it ends the game (`@`).
    Keep,
    /// Any other non-blank glyph in a custom template.
    Rubble,
}

impl Material {
    /// Parse a template glyph. Blank glyphs are empty cells.
    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            ' ' | '.' => None,
            '#' => Some(Material::Battlement),
            '=' => Some(Material::Rampart),
            '|' => Some(Material::Pillar),
            crate::constants::KEEP_GLYPH => Some(Material::Keep),
            _ => Some(Material::Rubble),
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            Material::Battlement => '#',
            Material::Rampart => '=',
            Material::Pillar => '|',
            Material::Keep => crate::constants::KEEP_GLYPH,
            Material::Rubble => '%',
        }
    }
}

/// One cell of the castle grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Solid(Material),
}

impl Cell {
    pub fn is_solid(&self) -> bool {
        matches!(self, Cell::Solid(_))
    }
}

/// Visual effect category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Debris burst where a word struck the castle.
    Explosion,
    /// Shot from the castle to a completed word.
    TargetBeam,
}

/// Why the castle fell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefeatCause {
    /// No rows remain.
    Leveled,
    /// Every keep cell was destroyed.
    KeepDestroyed,
    /// Mass fell to or below the loss threshold.
    MassLost,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Title,
    Active,
    Paused,
    GameOver,
}

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}
