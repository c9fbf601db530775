//! Castle structure model — the destructible barrier at the bottom of the field.
//!
//! Stored in `SimulationEngine`, NOT as ECS entities. Rows are kept top to
//! bottom and stack against the bottom of the play field, so pruning a row
//! lowers everything above it by one grid row.
//!
//! The keep (core region) is identified once, from the template, as the
//! first row containing keep material. Its live row index is derived from
//! its original index minus the number of rows pruned above it.

use std::ops::Range;

use wordkeep_core::config::{CastleTemplate, GameRules};
use wordkeep_core::enums::{Cell, DefeatCause, Material};

/// Keep location, fixed at construction.
#[derive(Debug, Clone)]
pub struct Keep {
    pub columns: Range<usize>,
    /// Row index at construction time.
    pub original_row: usize,
    /// Rows removed from above the keep since construction.
    pub rows_pruned_above: usize,
    /// False once the keep row itself has been pruned.
    pub standing: bool,
}

/// Result of one damage application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DamageReport {
    pub cells_cleared: u32,
    /// Leftmost..rightmost+1 of the cells actually cleared.
    pub cleared_span: Option<Range<usize>>,
    pub rows_pruned: usize,
}

#[derive(Debug, Clone)]
pub struct Castle {
    rows: Vec<Vec<Cell>>,
    width: usize,
    mass: u32,
    initial_mass: u32,
    keep: Option<Keep>,
}

impl Castle {
    /// Build from a template. Rows are padded or truncated to `width`;
    /// blank rows are pruned before the keep is located.
    pub fn from_template(template: &CastleTemplate, width: usize) -> Self {
        let rows = template
            .rows
            .iter()
            .map(|line| {
                let mut cells: Vec<Cell> = line
                    .chars()
                    .take(width)
                    .map(|glyph| Material::from_glyph(glyph).map_or(Cell::Empty, Cell::Solid))
                    .collect();
                cells.resize(width, Cell::Empty);
                cells
            })
            .collect();
        Self::from_rows(rows, width, None)
    }

    /// Build from explicit cells. With `keep = None` the keep is located by
    /// material; otherwise `(columns, row)` pins it explicitly.
    pub fn from_rows(
        mut rows: Vec<Vec<Cell>>,
        width: usize,
        keep: Option<(Range<usize>, usize)>,
    ) -> Self {
        for row in &mut rows {
            row.resize(width, Cell::Empty);
        }
        rows.retain(|row| row.iter().any(Cell::is_solid));

        let keep = match keep {
            Some((columns, row)) => Some(Keep {
                columns: columns.start.min(width)..columns.end.min(width),
                original_row: row,
                rows_pruned_above: 0,
                standing: row < rows.len(),
            }),
            None => locate_keep(&rows),
        };

        let mass = count_mass(&rows);
        Self {
            rows,
            width,
            mass,
            initial_mass: mass,
            keep,
        }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of solid cells.
    pub fn mass(&self) -> u32 {
        self.mass
    }

    pub fn initial_mass(&self) -> u32 {
        self.initial_mass
    }

    pub fn keep(&self) -> Option<&Keep> {
        self.keep.as_ref()
    }

    /// Live index of the keep row, if it still stands.
    pub fn keep_row(&self) -> Option<usize> {
        let keep = self.keep.as_ref()?;
        if !keep.standing {
            return None;
        }
        keep.original_row.checked_sub(keep.rows_pruned_above)
    }

    /// Whether any keep cell is still solid. A castle without a keep
    /// never loses this way.
    pub fn keep_intact(&self) -> bool {
        let Some(keep) = &self.keep else {
            return true;
        };
        let Some(row) = self.keep_row().and_then(|r| self.rows.get(r)) else {
            return false;
        };
        row[keep.columns.clone()].iter().any(Cell::is_solid)
    }

    /// Grid row occupied by the first castle row.
    pub fn top_grid_row(&self, grid_height: usize) -> usize {
        grid_height.saturating_sub(self.rows.len())
    }

    /// Top pixel boundary of a live row.
    pub fn row_top_pixel(&self, row: usize, rules: &GameRules) -> f64 {
        (self.top_grid_row(rules.grid_height) + row) as f64 * rules.cell_height
    }

    /// Topmost live row with a solid cell in any of `columns`.
    pub fn topmost_solid_row(&self, columns: Range<usize>) -> Option<usize> {
        let columns = columns.start.min(self.width)..columns.end.min(self.width);
        if columns.is_empty() {
            return None;
        }
        self.rows
            .iter()
            .position(|row| row[columns.clone()].iter().any(Cell::is_solid))
    }

    /// Clear `columns` in `row`, then prune empty rows.
    /// An out-of-range row is a no-op.
    pub fn apply_damage(&mut self, row: usize, columns: Range<usize>) -> DamageReport {
        let Some(cells) = self.rows.get_mut(row) else {
            return DamageReport::default();
        };

        let mut report = DamageReport::default();
        let columns = columns.start.min(self.width)..columns.end.min(self.width);
        for col in columns {
            if cells[col].is_solid() {
                cells[col] = Cell::Empty;
                report.cells_cleared += 1;
                report.cleared_span = Some(match report.cleared_span.take() {
                    Some(span) => span.start..col + 1,
                    None => col..col + 1,
                });
            }
        }
        self.mass -= report.cells_cleared;

        if report.cells_cleared > 0 {
            report.rows_pruned = self.prune_empty_rows();
        }
        report
    }

    /// Remove every fully empty row, top downward. Returns how many went.
    pub fn prune_empty_rows(&mut self) -> usize {
        let keep_row = self.keep_row();
        let before = self.rows.len();

        let mut index = 0;
        let mut pruned_above_keep = 0;
        let mut keep_pruned = false;
        self.rows.retain(|row| {
            let live = index;
            index += 1;
            if row.iter().any(Cell::is_solid) {
                return true;
            }
            match keep_row {
                Some(k) if live < k => pruned_above_keep += 1,
                Some(k) if live == k => keep_pruned = true,
                _ => {}
            }
            false
        });

        if let Some(keep) = &mut self.keep {
            keep.rows_pruned_above += pruned_above_keep;
            if keep_pruned {
                keep.standing = false;
            }
        }
        before - self.rows.len()
    }

    /// First game-over condition that holds, if any.
    pub fn defeat(&self, loss_threshold: f64) -> Option<DefeatCause> {
        if self.rows.is_empty() {
            Some(DefeatCause::Leveled)
        } else if !self.keep_intact() {
            Some(DefeatCause::KeepDestroyed)
        } else if self.mass as f64 <= self.initial_mass as f64 * loss_threshold {
            Some(DefeatCause::MassLost)
        } else {
            None
        }
    }
}

fn count_mass(rows: &[Vec<Cell>]) -> u32 {
    rows.iter()
        .flat_map(|row| row.iter())
        .filter(|cell| cell.is_solid())
        .count() as u32
}

fn locate_keep(rows: &[Vec<Cell>]) -> Option<Keep> {
    rows.iter().enumerate().find_map(|(row_index, row)| {
        let is_keep = |c: &Cell| *c == Cell::Solid(Material::Keep);
        let start = row.iter().position(is_keep)?;
        let end = row.iter().rposition(is_keep)? + 1;
        Some(Keep {
            columns: start..end,
            original_row: row_index,
            rows_pruned_above: 0,
            standing: true,
        })
    })
}
