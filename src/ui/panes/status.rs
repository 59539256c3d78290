//! Status bar rendering with keybindings and state indicators

use crate::interpreter::RunState;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const IDLE_KEYS: &[(&str, &str)] = &[
    (" r ", " run "),
    (" s/→ ", " step "),
    (" n ", " reset "),
    (" +/- ", " speed "),
    (" c ", " start "),
    (" []{} ", " grid "),
    (" w ", " save "),
    (" l ", " load "),
    (" e ", " export "),
    (" q ", " quit "),
];

/// Only the keys honored mid-run
const RUNNING_KEYS: &[(&str, &str)] = &[(" x ", " stop "), (" +/- ", " speed "), (" q ", " quit ")];

/// Render the status bar at the bottom
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    message: &str,
    state: RunState,
    executed: usize,
    speed: u8,
) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let (badge, badge_bg) = match state {
        RunState::Idle => (" IDLE ", DEFAULT_THEME.primary),
        RunState::Running => (" ▶ RUNNING ", DEFAULT_THEME.secondary),
        RunState::Stopped => (" ■ STOPPED ", DEFAULT_THEME.error),
    };

    let bar_style = Style::default().bg(DEFAULT_THEME.current_line_bg);
    let sep_style = bar_style.fg(DEFAULT_THEME.comment);

    let left_spans = vec![
        Span::styled(
            badge,
            Style::default()
                .bg(badge_bg)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" step {} ", executed), sep_style),
        Span::styled("│", sep_style),
        Span::styled(format!(" {} ", message), bar_style.fg(DEFAULT_THEME.fg)),
    ];

    frame.render_widget(
        Paragraph::new(Line::from(left_spans))
            .style(bar_style)
            .alignment(Alignment::Left),
        layout[0],
    );

    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = bar_style.fg(DEFAULT_THEME.fg);

    let mut right_spans = Vec::new();
    let keys = if state == RunState::Running {
        RUNNING_KEYS
    } else {
        IDLE_KEYS
    };
    for (i, (key, desc)) in keys.iter().enumerate() {
        if i > 0 {
            right_spans.push(Span::styled("│", sep_style));
        }
        right_spans.push(Span::styled(*key, key_style));
        right_spans.push(Span::styled(*desc, desc_style));
    }
    right_spans.push(Span::styled("│", sep_style));
    right_spans.push(Span::styled(
        format!(" speed {} ", speed),
        Style::default()
            .bg(DEFAULT_THEME.success)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    ));

    frame.render_widget(
        Paragraph::new(Line::from(right_spans))
            .style(bar_style)
            .alignment(Alignment::Right),
        layout[1],
    );
}
