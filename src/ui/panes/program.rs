//! Program pane: the block tree as an indented outline
//!
//! Each block takes one line. Bodies of start and repeat blocks are indented
//! under them; stacks that are not attached to the start block follow under
//! a separator, dimmed, since they never run. The block whose step is
//! executing gets the current-line background and an arrow in the gutter.

use crate::board::color;
use crate::board::Direction;
use crate::program::{Block, BlockId, BlockKind, Workspace, MAX_DEPTH};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{self, Borders, Paragraph},
    Frame,
};

const INDENT: &str = "  ";

struct Outline<'a> {
    workspace: &'a Workspace,
    highlighted: Option<&'a BlockId>,
    lines: Vec<Line<'static>>,
    current: Option<usize>,
}

impl Outline<'_> {
    fn list(&mut self, first: Option<&BlockId>, depth: usize, detached: bool) {
        if depth > MAX_DEPTH {
            return;
        }
        let workspace = self.workspace;
        for block in workspace.sequence(first) {
            self.block(block, depth, detached);
        }
    }

    fn block(&mut self, block: &Block, depth: usize, detached: bool) {
        let is_current = self.highlighted == Some(&block.id);
        if is_current {
            self.current = Some(self.lines.len());
        }

        let mut spans = vec![Span::styled(
            if is_current { "▸ " } else { "  " },
            Style::default().fg(DEFAULT_THEME.secondary),
        )];
        spans.push(Span::raw(INDENT.repeat(depth)));
        spans.extend(block_spans(&block.kind));

        let mut line = Line::from(spans);
        if detached {
            line = line.style(Style::default().add_modifier(Modifier::DIM));
        }
        if is_current {
            line = line.style(
                Style::default()
                    .bg(DEFAULT_THEME.current_line_bg)
                    .add_modifier(Modifier::BOLD),
            );
        }
        self.lines.push(line);

        if block.kind.has_body() {
            self.list(block.body.as_ref(), depth + 1, detached);
        }
    }
}

fn block_spans(kind: &BlockKind) -> Vec<Span<'static>> {
    let keyword = |text: &'static str, color: Color| {
        Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };
    match kind {
        BlockKind::Start => vec![keyword("when run", DEFAULT_THEME.block_start)],
        BlockKind::Move { direction } => {
            let arg = match direction.parse::<Direction>() {
                Ok(d) => Span::styled(
                    format!(" {} {}", d.arrow(), d.name()),
                    Style::default().fg(DEFAULT_THEME.fg),
                ),
                Err(_) => Span::styled(
                    format!(" ? {}", direction),
                    Style::default().fg(DEFAULT_THEME.error),
                ),
            };
            vec![keyword("move", DEFAULT_THEME.block_move), arg]
        }
        BlockKind::Fill { color: value } => {
            let hex = if value.trim().is_empty() {
                color::DEFAULT_FILL.to_string()
            } else {
                color::normalize(value)
            };
            let swatch = match color::to_rgb(&hex) {
                Some((r, g, b)) => Span::styled(" ■", Style::default().fg(Color::Rgb(r, g, b))),
                None => Span::raw(" □"),
            };
            vec![
                keyword("fill", DEFAULT_THEME.block_fill),
                swatch,
                Span::styled(format!(" {}", hex), Style::default().fg(DEFAULT_THEME.fg)),
            ]
        }
        BlockKind::Repeat { times } => vec![
            keyword("repeat", DEFAULT_THEME.block_repeat),
            Span::styled(format!(" {} times", times), Style::default().fg(DEFAULT_THEME.fg)),
        ],
    }
}

/// Outline of the workspace and the index of the highlighted block's line
pub fn program_lines(
    workspace: &Workspace,
    highlighted: Option<&BlockId>,
) -> (Vec<Line<'static>>, Option<usize>) {
    let mut outline = Outline {
        workspace,
        highlighted,
        lines: Vec::new(),
        current: None,
    };

    let start = workspace.find_start().map(|b| b.id.clone());
    if let Some(start) = &start {
        outline.list(Some(start), 0, false);
    }

    let mut separated = false;
    for top in workspace.top_blocks() {
        if Some(&top.id) == start.as_ref() {
            continue;
        }
        if !separated {
            outline.lines.push(Line::from(Span::styled(
                "── not connected ──",
                Style::default().fg(DEFAULT_THEME.comment),
            )));
            separated = true;
        }
        outline.list(Some(&top.id), 0, true);
    }

    (outline.lines, outline.current)
}

/// Render the program pane, scrolling so the highlighted block stays visible
pub fn render_program_pane(
    frame: &mut Frame,
    area: Rect,
    workspace: &Workspace,
    highlighted: Option<&BlockId>,
    is_running: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_running {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };
    let block = widgets::Block::default()
        .title(format!(" Program ({} blocks) ", workspace.len()))
        .borders(Borders::ALL)
        .border_style(border_style);

    let (lines, current) = program_lines(workspace, highlighted);
    if lines.is_empty() {
        let paragraph = Paragraph::new("(no blocks)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    if let Some(current) = current {
        if current < *scroll_offset {
            *scroll_offset = current;
        } else if current >= *scroll_offset + visible_height {
            *scroll_offset = current + 1 - visible_height;
        }
    }
    let max_scroll = lines.len().saturating_sub(visible_height);
    *scroll_offset = (*scroll_offset).min(max_scroll);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((*scroll_offset as u16, 0));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_outline_indents_bodies_and_marks_highlight() {
        let mut ws = Workspace::new();
        let start = ws.ensure_start_block();
        let repeat = ws.push(&start, BlockKind::Repeat { times: 2 }).unwrap();
        let step = ws
            .push(
                &repeat,
                BlockKind::Move {
                    direction: "down".into(),
                },
            )
            .unwrap();

        let (lines, current) = program_lines(&ws, Some(&step));
        let rendered: Vec<String> = lines.iter().map(text).collect();
        assert_eq!(
            rendered,
            vec![
                "  when run".to_string(),
                "    repeat 2 times".to_string(),
                "▸     move ↓ DOWN".to_string(),
            ]
        );
        assert_eq!(current, Some(2));
    }

    #[test]
    fn test_detached_stacks_follow_separator() {
        let mut ws = Workspace::new();
        ws.add(BlockKind::Fill {
            color: "red".into(),
        });

        let (lines, current) = program_lines(&ws, None);
        let rendered: Vec<String> = lines.iter().map(text).collect();
        assert_eq!(rendered[1], "── not connected ──");
        assert_eq!(rendered[2], "  fill ■ #ff0000");
        assert_eq!(current, None);
    }
}
