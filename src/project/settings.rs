//! Board settings stored alongside a program

use crate::board::{Board, DEFAULT_SIZE};
use serde::{Deserialize, Serialize};

/// Grid size and start position as written to project files.
///
/// The lowercase field names are part of the file format. Missing fields
/// take their defaults: a 15×15 grid starting at the top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub rows: i64,
    pub cols: i64,
    pub startrow: i64,
    pub startcol: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            rows: DEFAULT_SIZE as i64,
            cols: DEFAULT_SIZE as i64,
            startrow: 0,
            startcol: 0,
        }
    }
}

impl Settings {
    pub fn from_board(board: &Board) -> Self {
        let (startrow, startcol) = board.start_position();
        Settings {
            rows: board.rows() as i64,
            cols: board.cols() as i64,
            startrow: startrow as i64,
            startcol: startcol as i64,
        }
    }

    /// Resize the board, place the start and put the piece there
    pub fn apply(&self, board: &mut Board) {
        board.set_grid(self.rows, self.cols);
        board.set_start_pos(self.startrow, self.startcol);
        board.apply_start(true);
    }

    /// Preset matching the stored start position
    pub fn corner(&self) -> StartCorner {
        StartCorner::infer(self.rows, self.cols, self.startrow, self.startcol)
    }
}

/// Named start positions offered by the settings panel
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum StartCorner {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

impl StartCorner {
    pub const ALL: [StartCorner; 5] = [
        StartCorner::TopLeft,
        StartCorner::TopRight,
        StartCorner::BottomLeft,
        StartCorner::BottomRight,
        StartCorner::Center,
    ];

    /// Start position of this preset on a `rows` × `cols` grid
    pub fn resolve(self, rows: i64, cols: i64) -> (i64, i64) {
        let (last_row, last_col) = (rows.max(1) - 1, cols.max(1) - 1);
        match self {
            StartCorner::TopLeft => (0, 0),
            StartCorner::TopRight => (0, last_col),
            StartCorner::BottomLeft => (last_row, 0),
            StartCorner::BottomRight => (last_row, last_col),
            StartCorner::Center => (rows.max(1) / 2, cols.max(1) / 2),
        }
    }

    /// Preset for a start position; anything that is not a corner is `Center`
    pub fn infer(rows: i64, cols: i64, row: i64, col: i64) -> Self {
        [
            StartCorner::TopLeft,
            StartCorner::TopRight,
            StartCorner::BottomLeft,
            StartCorner::BottomRight,
        ]
        .into_iter()
        .find(|corner| corner.resolve(rows, cols) == (row, col))
        .unwrap_or(StartCorner::Center)
    }

    /// Next preset in panel order, wrapping around
    pub fn next(self) -> Self {
        let index = StartCorner::ALL
            .iter()
            .position(|c| *c == self)
            .unwrap_or(0);
        StartCorner::ALL[(index + 1) % StartCorner::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            StartCorner::TopLeft => "top left",
            StartCorner::TopRight => "top right",
            StartCorner::BottomLeft => "bottom left",
            StartCorner::BottomRight => "bottom right",
            StartCorner::Center => "center",
        }
    }

    /// Place the board's start at this preset
    pub fn apply(self, board: &mut Board) {
        let (row, col) = self.resolve(board.rows() as i64, board.cols() as i64);
        board.set_start_pos(row, col);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_and_infer() {
        assert_eq!(StartCorner::BottomRight.resolve(4, 7), (3, 6));
        assert_eq!(StartCorner::Center.resolve(5, 4), (2, 2));
        assert_eq!(StartCorner::infer(4, 7, 0, 6), StartCorner::TopRight);
        assert_eq!(StartCorner::infer(4, 7, 1, 1), StartCorner::Center);
        // On a single cell every corner coincides; the first one wins
        assert_eq!(StartCorner::infer(1, 1, 0, 0), StartCorner::TopLeft);
    }

    #[test]
    fn test_next_cycles_through_all() {
        let mut corner = StartCorner::TopLeft;
        for _ in 0..StartCorner::ALL.len() {
            corner = corner.next();
        }
        assert_eq!(corner, StartCorner::TopLeft);
    }

    #[test]
    fn test_missing_fields_default() {
        let settings: Settings = serde_json::from_str(r#"{"rows": 4}"#).unwrap();
        assert_eq!(
            settings,
            Settings {
                rows: 4,
                cols: 15,
                startrow: 0,
                startcol: 0
            }
        );
    }

    #[test]
    fn test_apply_clamps_through_board() {
        let mut board = Board::default();
        Settings {
            rows: 3,
            cols: 0,
            startrow: 9,
            startcol: 9,
        }
        .apply(&mut board);
        assert_eq!((board.rows(), board.cols()), (3, 1));
        assert_eq!(board.position(), (2, 0));
    }
}
