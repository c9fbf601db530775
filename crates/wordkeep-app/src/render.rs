//! Snapshot rendering.
//!
//! `compose` turns a `GameStateSnapshot` into a character `Frame` (one
//! terminal cell per grid cell, plus HUD rows underneath); `draw` writes a
//! frame to the terminal with crossterm.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Attribute, Color, Print},
    QueueableCommand,
};

use wordkeep_core::config::GameRules;
use wordkeep_core::constants::PARTICLE_START_RADIUS;
use wordkeep_core::enums::{Cell, DefeatCause, EffectKind, GamePhase, Material};
use wordkeep_core::state::{CastleView, EffectView, GameStateSnapshot, WordView};
use wordkeep_core::types::Position;

/// Rows below the play field: status line and message line.
pub const HUD_ROWS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub color: Color,
    pub bold: bool,
}

impl Glyph {
    const BLANK: Glyph = Glyph {
        ch: ' ',
        color: Color::Reset,
        bold: false,
    };

    fn new(ch: char, color: Color) -> Self {
        Self {
            ch,
            color,
            bold: false,
        }
    }
}

/// A fixed-size grid of glyphs.
#[derive(Debug, Clone)]
pub struct Frame {
    width: usize,
    height: usize,
    cells: Vec<Glyph>,
}

impl Frame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Glyph::BLANK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, col: usize, row: usize) -> Option<Glyph> {
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(self.cells[row * self.width + col])
    }

    /// Characters of one row, for assertions and debugging.
    pub fn row_text(&self, row: usize) -> String {
        (0..self.width)
            .filter_map(|col| self.get(col, row))
            .map(|g| g.ch)
            .collect()
    }

    /// Set a cell; anything off the frame is clipped.
    fn put(&mut self, col: i64, row: i64, glyph: Glyph) {
        if col < 0 || row < 0 || col as usize >= self.width || row as usize >= self.height {
            return;
        }
        self.cells[row as usize * self.width + col as usize] = glyph;
    }

    fn text(&mut self, col: i64, row: i64, text: &str, color: Color, bold: bool) {
        for (i, ch) in text.chars().enumerate() {
            self.put(col + i as i64, row, Glyph { ch, color, bold });
        }
    }

    fn centered(&mut self, row: i64, text: &str, color: Color, bold: bool) {
        let len = text.chars().count() as i64;
        let col = (self.width as i64 - len) / 2;
        self.text(col.max(0), row, text, color, bold);
    }
}

/// Compose the full frame for a snapshot. `banner` replaces the hint line.
pub fn compose(snapshot: &GameStateSnapshot, rules: &GameRules, banner: Option<&str>) -> Frame {
    let mut frame = Frame::new(rules.grid_width, rules.grid_height + HUD_ROWS);

    draw_castle(&mut frame, &snapshot.castle);
    for effect in &snapshot.effects {
        draw_effect(&mut frame, effect, rules);
    }
    for word in &snapshot.words {
        draw_word(&mut frame, word, rules);
    }
    draw_hud(&mut frame, snapshot, rules, banner);
    draw_overlay(&mut frame, snapshot, rules);

    frame
}

fn cell_of(position: Position, rules: &GameRules) -> (i64, i64) {
    (
        (position.x / rules.cell_width).floor() as i64,
        (position.y / rules.cell_height).floor() as i64,
    )
}

fn material_color(material: Material) -> Color {
    match material {
        Material::Keep => Color::Magenta,
        Material::Rubble => Color::DarkGrey,
        Material::Battlement => Color::White,
        Material::Rampart | Material::Pillar => Color::Grey,
    }
}

fn draw_castle(frame: &mut Frame, castle: &CastleView) {
    for (i, row) in castle.rows.iter().enumerate() {
        let grid_row = (castle.top_grid_row + i) as i64;
        for (col, cell) in row.iter().enumerate() {
            if let Cell::Solid(material) = cell {
                frame.put(
                    col as i64,
                    grid_row,
                    Glyph::new(material.glyph(), material_color(*material)),
                );
            }
        }
    }
}

fn draw_effect(frame: &mut Frame, effect: &EffectView, rules: &GameRules) {
    if effect.age_fraction >= 1.0 {
        return;
    }
    match effect.kind {
        EffectKind::TargetBeam => {
            let (c0, r0) = cell_of(effect.origin, rules);
            let (c1, r1) = cell_of(effect.target, rules);
            let steps = (c1 - c0).abs().max((r1 - r0).abs()).max(1);
            for i in 0..=steps {
                let t = i as f64 / steps as f64;
                let col = c0 as f64 + (c1 - c0) as f64 * t;
                let row = r0 as f64 + (r1 - r0) as f64 * t;
                frame.put(
                    col.round() as i64,
                    row.round() as i64,
                    Glyph::new('.', Color::Cyan),
                );
            }
        }
        EffectKind::Explosion => {
            for particle in &effect.particles {
                let (col, row) = cell_of(particle.position, rules);
                let glyph = if particle.radius > PARTICLE_START_RADIUS / 2.0 {
                    Glyph::new('*', Color::Yellow)
                } else {
                    Glyph::new('.', Color::Red)
                };
                frame.put(col, row, glyph);
            }
        }
    }
}

fn draw_word(frame: &mut Frame, word: &WordView, rules: &GameRules) {
    let (col, row) = cell_of(word.position, rules);
    let pending = if word.is_bonus {
        Color::Yellow
    } else {
        Color::White
    };
    for (i, ch) in word.text.chars().enumerate() {
        let color = if i < word.typed_progress {
            Color::Green
        } else {
            pending
        };
        frame.put(
            col + i as i64,
            row,
            Glyph {
                ch,
                color,
                bold: word.targeted,
            },
        );
    }
}

fn draw_hud(
    frame: &mut Frame,
    snapshot: &GameStateSnapshot,
    rules: &GameRules,
    banner: Option<&str>,
) {
    let row = rules.grid_height as i64;
    let score = &snapshot.score;
    let castle_pct = if snapshot.castle.initial_mass == 0 {
        0
    } else {
        snapshot.castle.mass * 100 / snapshot.castle.initial_mass
    };
    let status = format!(
        "SCORE {}  LEVEL {}  ACC {:.0}%  CASTLE {}%",
        score.score,
        snapshot.level,
        score.accuracy * 100.0,
        castle_pct
    );
    frame.text(0, row, &status, Color::White, true);

    let hint = match snapshot.phase {
        GamePhase::Title => "Enter: start  Esc: quit",
        GamePhase::GameOver => "Enter: play again  any other key: quit",
        GamePhase::Active => "Tab: pause  Esc: quit",
        GamePhase::Paused => "Tab: resume  Esc: quit",
    };
    match banner {
        Some(text) => frame.text(0, row + 1, text, Color::Cyan, false),
        None => frame.text(0, row + 1, hint, Color::DarkGrey, false),
    }
}

fn defeat_text(cause: DefeatCause) -> &'static str {
    match cause {
        DefeatCause::Leveled => "The castle was leveled",
        DefeatCause::KeepDestroyed => "The keep was destroyed",
        DefeatCause::MassLost => "Too much of the castle crumbled",
    }
}

fn draw_overlay(frame: &mut Frame, snapshot: &GameStateSnapshot, rules: &GameRules) {
    let mid = rules.grid_height as i64 / 3;
    match snapshot.phase {
        GamePhase::Title => {
            frame.centered(mid, "W O R D K E E P", Color::Cyan, true);
            frame.centered(
                mid + 2,
                "Type the falling words before they hit the castle",
                Color::White,
                false,
            );
            frame.centered(mid + 4, "Press Enter to start", Color::DarkGrey, false);
        }
        GamePhase::Paused => {
            frame.centered(mid, "PAUSED", Color::Yellow, true);
        }
        GamePhase::GameOver => {
            frame.centered(mid, "THE CASTLE HAS FALLEN", Color::Red, true);
            if let Some(cause) = snapshot.defeat {
                frame.centered(mid + 1, defeat_text(cause), Color::White, false);
            }
            let summary = format!(
                "Final score {}  |  {} words typed  |  level {}",
                snapshot.score.score, snapshot.score.words_completed, snapshot.level
            );
            frame.centered(mid + 3, &summary, Color::White, false);
            frame.centered(
                mid + 5,
                "Enter to play again, any other key to quit",
                Color::DarkGrey,
                false,
            );
        }
        GamePhase::Active => {}
    }
}

/// Write a frame to the terminal, top-left anchored.
pub fn draw<W: Write>(out: &mut W, frame: &Frame) -> std::io::Result<()> {
    let mut color = Color::Reset;
    let mut bold = false;
    out.queue(style::ResetColor)?;
    out.queue(style::SetAttribute(Attribute::Reset))?;

    for row in 0..frame.height() {
        out.queue(cursor::MoveTo(0, row as u16))?;
        for col in 0..frame.width() {
            let Some(glyph) = frame.get(col, row) else {
                continue;
            };
            if glyph.bold != bold {
                bold = glyph.bold;
                let attr = if bold {
                    Attribute::Bold
                } else {
                    Attribute::NormalIntensity
                };
                out.queue(style::SetAttribute(attr))?;
            }
            if glyph.color != color {
                color = glyph.color;
                out.queue(style::SetForegroundColor(color))?;
            }
            out.queue(Print(glyph.ch))?;
        }
    }

    out.queue(style::ResetColor)?;
    out.queue(style::SetAttribute(Attribute::Reset))?;
    out.flush()
}
