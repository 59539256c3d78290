//! Grid board model
//!
//! This module owns the state the program manipulates:
//! - [`Board`]: grid geometry, the piece's current position, the start
//!   position and the per-cell color overlay
//! - [`Direction`]: the four unit moves, with wrap-around at the edges
//! - [`color`]: color normalization shared with the exporter
//! - [`export`]: PBM/PGM/PPM serialization of the overlay
//!
//! # Clamping
//!
//! The board never rejects numeric input. Dimensions are floored to 1 and
//! positions are clamped into the grid, so every setter leaves the current
//! and start positions in bounds.

pub mod color;
pub mod export;

use rustc_hash::FxHashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub use export::{BitmapFormat, PortableBitmap};

/// Default grid dimension used when nothing else is configured
pub const DEFAULT_SIZE: usize = 15;

/// Cell coordinate as `(row, col)`
pub type CellKey = (usize, usize);

/// A unit move on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Row/column delta of one step in this direction
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Field value used by move blocks
    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Up => "↑",
            Direction::Down => "↓",
            Direction::Left => "←",
            Direction::Right => "→",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A direction field that is not one of `UP`, `DOWN`, `LEFT`, `RIGHT`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction '{0}'")]
pub struct UnknownDirection(pub String);

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Direction::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownDirection(s.to_string()))
    }
}

/// Moves `value` by `delta` on an axis of length `len`, wrapping at both ends
fn wrap(value: usize, delta: isize, len: usize) -> usize {
    (value as isize + delta).rem_euclid(len as isize) as usize
}

/// Floors a dimension to 1
fn dimension(value: i64) -> usize {
    value.max(1) as usize
}

/// Clamps a coordinate into `[0, len)`
fn clamp_index(value: i64, len: usize) -> usize {
    value.clamp(0, len as i64 - 1) as usize
}

type DrawHook = Box<dyn FnMut(&Board)>;

/// Grid state: dimensions, piece position, start position and color overlay
pub struct Board {
    rows: usize,
    cols: usize,

    /// Current piece position
    row: usize,
    col: usize,

    /// Position restored by [`Board::apply_start`]
    start_row: usize,
    start_col: usize,

    /// Explicitly colored cells; absent cells are white
    fill_colors: FxHashMap<CellKey, String>,

    /// Number of redraws so far, for observers that poll instead of hooking
    redraws: u64,

    draw_hook: Option<DrawHook>,
}

impl Board {
    /// Create a board with the given dimensions and the start at `(0, 0)`
    pub fn new(rows: i64, cols: i64) -> Self {
        Board {
            rows: dimension(rows),
            cols: dimension(cols),
            row: 0,
            col: 0,
            start_row: 0,
            start_col: 0,
            fill_colors: FxHashMap::default(),
            redraws: 0,
            draw_hook: None,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Current piece position as `(row, col)`
    pub fn position(&self) -> CellKey {
        (self.row, self.col)
    }

    pub fn start_position(&self) -> CellKey {
        (self.start_row, self.start_col)
    }

    pub fn fill_colors(&self) -> &FxHashMap<CellKey, String> {
        &self.fill_colors
    }

    /// Overlay color of a cell, `None` for an uncolored (white) cell
    pub fn color_at(&self, row: usize, col: usize) -> Option<&str> {
        self.fill_colors.get(&(row, col)).map(String::as_str)
    }

    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    /// Install an observer called with the board after every redraw
    pub fn set_draw_hook(&mut self, hook: impl FnMut(&Board) + 'static) {
        self.draw_hook = Some(Box::new(hook));
    }

    pub fn clear_draw_hook(&mut self) {
        self.draw_hook = None;
    }

    fn draw(&mut self) {
        self.redraws += 1;
        if let Some(mut hook) = self.draw_hook.take() {
            hook(self);
            self.draw_hook = Some(hook);
        }
    }

    /// Resize the grid. Non-positive dimensions become 1.
    ///
    /// The start position is clamped into the new bounds, the piece returns
    /// to it and all fills are cleared.
    pub fn set_grid(&mut self, rows: i64, cols: i64) {
        let (new_rows, new_cols) = (dimension(rows), dimension(cols));
        if new_rows as i64 != rows || new_cols as i64 != cols {
            log::warn!("grid {}x{} clamped to {}x{}", rows, cols, new_rows, new_cols);
        }
        self.rows = new_rows;
        self.cols = new_cols;
        self.start_row = self.start_row.min(self.rows - 1);
        self.start_col = self.start_col.min(self.cols - 1);
        log::debug!("grid set to {}x{}", self.rows, self.cols);
        self.apply_start(true);
    }

    /// Set the start position (clamped into bounds) and apply it
    pub fn set_start_pos(&mut self, row: i64, col: i64) {
        self.start_row = clamp_index(row, self.rows);
        self.start_col = clamp_index(col, self.cols);
        if self.start_row as i64 != row || self.start_col as i64 != col {
            log::warn!(
                "start ({}, {}) clamped to ({}, {})",
                row,
                col,
                self.start_row,
                self.start_col
            );
        }
        self.apply_start(true);
    }

    /// Move the piece back to the start position, optionally clearing fills
    pub fn apply_start(&mut self, clear_fills: bool) {
        if clear_fills {
            self.fill_colors.clear();
        }
        self.row = self.start_row;
        self.col = self.start_col;
        self.draw();
    }

    pub fn reset(&mut self) {
        self.apply_start(true);
    }

    /// Advance the piece `steps` times in `direction`, wrapping at the edges.
    ///
    /// The board is redrawn after every unit step. When `delay` is non-zero,
    /// `pause` is called with the board and the delay after each step; it is
    /// the only place the board yields. `None` is an unrecognised direction
    /// and does nothing.
    pub fn go<F>(
        &mut self,
        direction: Option<Direction>,
        steps: usize,
        delay: Duration,
        mut pause: F,
    ) where
        F: FnMut(&Board, Duration),
    {
        let Some(direction) = direction else {
            return;
        };
        let (dr, dc) = direction.delta();
        for _ in 0..steps {
            self.row = wrap(self.row, dr, self.rows);
            self.col = wrap(self.col, dc, self.cols);
            self.draw();
            if !delay.is_zero() {
                pause(self, delay);
            }
        }
    }

    /// Color a cell. Coordinates outside the grid are ignored.
    pub fn fill_cell(&mut self, row: i64, col: i64, color: &str) {
        if row < 0 || col < 0 || row >= self.rows as i64 || col >= self.cols as i64 {
            log::debug!("ignoring fill outside the grid at ({}, {})", row, col);
            return;
        }
        self.fill_colors
            .insert((row as usize, col as usize), color::normalize(color));
        self.draw();
    }

    /// Color the cell under the piece
    pub fn fill_current(&mut self, color: &str) {
        self.fill_cell(self.row as i64, self.col as i64, color);
    }

    /// Serialize the overlay in the smallest adequate portable bitmap format
    pub fn export_bitmap(&self) -> PortableBitmap {
        export::export(self)
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new(DEFAULT_SIZE as i64, DEFAULT_SIZE as i64)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("position", &self.position())
            .field("start", &self.start_position())
            .field("fill_colors", &self.fill_colors)
            .finish_non_exhaustive()
    }
}

/// Plain-text picture: `@` piece, `#` colored cell, `.` white cell
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            let line: String = (0..self.cols)
                .map(|c| {
                    if (r, c) == self.position() {
                        '@'
                    } else if self.fill_colors.contains_key(&(r, c)) {
                        '#'
                    } else {
                        '.'
                    }
                })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
