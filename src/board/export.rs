//! Portable bitmap export
//!
//! The overlay is written in the smallest of the three ASCII netpbm formats
//! that represents it exactly:
//!
//! | Palette                          | Format | Extension |
//! |----------------------------------|--------|-----------|
//! | white plus one ink color         | `P1`   | `pbm`     |
//! | only the seven table grays       | `P2`   | `pgm`     |
//! | anything else                    | `P3`   | `ppm`     |
//!
//! White is always part of the palette because uncolored cells are white.
//! Colors are never approximated: a color missing from the gray table sends
//! the whole board to `P3`.

use super::color::{self, BLACK, WHITE};
use super::Board;
use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

/// Gray levels of the `P2` format, darkest first. The max value is 6.
pub const GRAY_LEVELS: [(&str, u8); 7] = [
    ("#000000", 0),
    ("#333333", 1),
    ("#666666", 2),
    ("#999999", 3),
    ("#c0c0c0", 4),
    ("#cccccc", 5),
    ("#ffffff", 6),
];

const GRAY_MAX: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitmapFormat {
    Pbm,
    Pgm,
    Ppm,
}

impl BitmapFormat {
    pub fn magic(self) -> &'static str {
        match self {
            BitmapFormat::Pbm => "P1",
            BitmapFormat::Pgm => "P2",
            BitmapFormat::Ppm => "P3",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            BitmapFormat::Pbm => "pbm",
            BitmapFormat::Pgm => "pgm",
            BitmapFormat::Ppm => "ppm",
        }
    }
}

/// Exported bitmap text together with the format it was written in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortableBitmap {
    pub format: BitmapFormat,
    pub text: String,
}

impl PortableBitmap {
    /// `basename` with the format's extension appended
    pub fn file_name(&self, basename: &str) -> String {
        format!("{}.{}", basename, self.format.extension())
    }

    /// Write the bitmap into `dir` and return the path written
    pub fn write_to(&self, dir: &Path, basename: &str) -> io::Result<PathBuf> {
        let path = dir.join(self.file_name(basename));
        std::fs::write(&path, &self.text)?;
        log::info!("exported {} bitmap to {}", self.format.magic(), path.display());
        Ok(path)
    }
}

fn gray_level(color: &str) -> Option<u8> {
    GRAY_LEVELS
        .iter()
        .find(|(hex, _)| *hex == color)
        .map(|&(_, level)| level)
}

/// Pick the format for a palette of normalized colors.
///
/// Only the two-color case needs white present: with white and one other
/// color, the other one is the ink. A two-color palette without white never
/// reaches `P1`.
pub fn choose_format(palette: &BTreeSet<String>) -> BitmapFormat {
    if palette.len() == 2 && palette.contains(WHITE) {
        BitmapFormat::Pbm
    } else if palette.iter().all(|c| gray_level(c).is_some()) {
        BitmapFormat::Pgm
    } else {
        BitmapFormat::Ppm
    }
}

/// Colors in use on the board, white included
pub fn palette(board: &Board) -> BTreeSet<String> {
    let mut used: BTreeSet<String> = board
        .fill_colors()
        .values()
        .map(|c| color::normalize(c))
        .collect();
    used.insert(WHITE.to_string());
    used
}

/// Serialize the board's overlay as PBM, PGM or PPM text
pub fn export(board: &Board) -> PortableBitmap {
    let used = palette(board);
    let format = choose_format(&used);
    let (width, height) = (board.cols(), board.rows());

    let cell = |r: usize, c: usize| -> String {
        board
            .color_at(r, c)
            .map(color::normalize)
            .unwrap_or_else(|| WHITE.to_string())
    };

    let mut out = format!("{}\n{} {}\n", format.magic(), width, height);
    match format {
        BitmapFormat::Pbm => {
            let ink = used
                .iter()
                .find(|c| c.as_str() != WHITE)
                .map(String::as_str)
                .unwrap_or(BLACK);
            for r in 0..height {
                let row: Vec<&str> = (0..width)
                    .map(|c| if cell(r, c) == ink { "1" } else { "0" })
                    .collect();
                out.push_str(&row.join(" "));
                out.push('\n');
            }
        }
        BitmapFormat::Pgm => {
            out.push_str(&format!("{}\n", GRAY_MAX));
            for r in 0..height {
                let row: Vec<String> = (0..width)
                    .map(|c| gray_level(&cell(r, c)).unwrap_or(GRAY_MAX).to_string())
                    .collect();
                out.push_str(&row.join(" "));
                out.push('\n');
            }
        }
        BitmapFormat::Ppm => {
            out.push_str("255\n");
            for r in 0..height {
                let row: Vec<String> = (0..width)
                    .map(|c| {
                        let hex = cell(r, c);
                        let (red, green, blue) = color::to_rgb(&hex).unwrap_or_else(|| {
                            log::warn!("cannot decode color '{}', exporting as black", hex);
                            (0, 0, 0)
                        });
                        format!("{} {} {}", red, green, blue)
                    })
                    .collect();
                out.push_str(&row.join(" "));
                out.push('\n');
            }
        }
    }

    log::debug!(
        "exporting {}x{} board with {} colors as {}",
        width,
        height,
        used.len(),
        format.magic()
    );
    PortableBitmap { format, text: out }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette_of(colors: &[&str]) -> BTreeSet<String> {
        colors.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_choose_format() {
        assert_eq!(choose_format(&palette_of(&[WHITE])), BitmapFormat::Pgm);
        assert_eq!(
            choose_format(&palette_of(&[WHITE, "#ff0000"])),
            BitmapFormat::Pbm
        );
        assert_eq!(
            choose_format(&palette_of(&[WHITE, "#333333", "#c0c0c0"])),
            BitmapFormat::Pgm
        );
        assert_eq!(
            choose_format(&palette_of(&["#ff0000", "#0000ff"])),
            BitmapFormat::Ppm
        );
    }

    #[test]
    fn test_empty_board_is_all_white_gray() {
        let board = Board::new(1, 2);
        let bitmap = export(&board);
        assert_eq!(bitmap.format, BitmapFormat::Pgm);
        assert_eq!(bitmap.text, "P2\n2 1\n6\n6 6\n");
    }

    #[test]
    fn test_file_name() {
        let bitmap = export(&Board::new(1, 1));
        assert_eq!(bitmap.file_name("board"), "board.pgm");
    }
}
