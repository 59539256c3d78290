//! Board pane rendering

use crate::board::{color, Board};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Terminal columns per board cell
const CELL_WIDTH: usize = 2;

fn cell_color(board: &Board, row: usize, col: usize) -> Color {
    board
        .color_at(row, col)
        .and_then(color::to_rgb)
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(DEFAULT_THEME.empty_cell)
}

/// One line per board row, each cell `CELL_WIDTH` columns wide
pub fn board_lines(board: &Board) -> Vec<Line<'static>> {
    let piece = board.position();
    let start = board.start_position();

    (0..board.rows())
        .map(|r| {
            let spans: Vec<Span<'static>> = (0..board.cols())
                .map(|c| {
                    let style = Style::default().bg(cell_color(board, r, c));
                    if (r, c) == piece {
                        Span::styled(
                            "● ",
                            style.fg(DEFAULT_THEME.piece).add_modifier(Modifier::BOLD),
                        )
                    } else if (r, c) == start {
                        Span::styled("· ", style.fg(DEFAULT_THEME.start_marker))
                    } else {
                        Span::styled(" ".repeat(CELL_WIDTH), style)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Render the board. Rows and columns past the pane's edge are clipped.
pub fn render_board_pane(
    frame: &mut Frame,
    area: Rect,
    board: &Board,
    preset: &str,
    pending: usize,
) {
    let (row, col) = board.position();
    let (start_row, start_col) = board.start_position();

    let block = Block::default()
        .title(format!(" Board {}×{} ", board.rows(), board.cols()))
        .title_bottom(Line::from(vec![
            Span::styled(
                format!(" piece ({}, {}) ", row, col),
                Style::default().fg(DEFAULT_THEME.primary),
            ),
            Span::styled(
                format!("│ start ({}, {}) {} ", start_row, start_col, preset),
                Style::default().fg(DEFAULT_THEME.comment),
            ),
            Span::styled(
                format!("│ {} steps queued ", pending),
                Style::default().fg(DEFAULT_THEME.comment),
            ),
        ]))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal));

    let inner_width = area.width.saturating_sub(2) as usize;
    if board.cols() * CELL_WIDTH > inner_width {
        log::debug!(
            "board of {} columns clipped to a {} column pane",
            board.cols(),
            inner_width
        );
    }

    frame.render_widget(Paragraph::new(board_lines(board)).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_start_and_fill_cells() {
        let mut board = Board::new(2, 3);
        board.set_start_pos(0, 2);
        board.fill_cell(1, 0, "#ff0000");

        let lines = board_lines(&board);
        assert_eq!(lines.len(), 2);
        let top: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(top, "    ● ");

        assert_eq!(lines[1].spans[0].style.bg, Some(Color::Rgb(255, 0, 0)));
        assert_eq!(lines[1].spans[1].style.bg, Some(DEFAULT_THEME.empty_cell));
    }

    #[test]
    fn test_start_marker_when_piece_elsewhere() {
        let mut board = Board::new(1, 3);
        board.go(
            Some(crate::board::Direction::Right),
            1,
            std::time::Duration::ZERO,
            |_, _| {},
        );
        let lines = board_lines(&board);
        assert_eq!(lines[0].spans[0].content.as_ref(), "· ");
        assert_eq!(lines[0].spans[1].content.as_ref(), "● ");
    }
}
