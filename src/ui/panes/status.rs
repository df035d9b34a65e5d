//! Status bar rendering with keybindings and playback indicators

use crate::player::{PlaybackState, Speed};
use crate::snapshot::Status;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::time::Duration;

/// Everything the status bar shows
pub struct StatusRenderData<'a> {
    pub message: &'a str,
    pub algorithm: &'a str,
    pub position: usize,
    pub total: usize,
    /// Fraction of the timeline already shown
    pub progress: f64,
    pub state: PlaybackState,
    pub status: Option<Status>,
    pub elapsed: Duration,
    pub speed: Speed,
}

/// Render the status bar at the bottom
pub fn render_status_bar(frame: &mut Frame, area: Rect, data: &StatusRenderData<'_>) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let is_error = data.status == Some(Status::Error);
    let bar = Style::default().bg(DEFAULT_THEME.current_line_bg);
    let sep_style = bar.fg(DEFAULT_THEME.comment);

    let left_spans = vec![
        Span::styled(
            format!(" Step {}/{} ", data.position + 1, data.total.max(1)),
            Style::default()
                .bg(if is_error {
                    DEFAULT_THEME.error
                } else {
                    DEFAULT_THEME.primary
                })
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", data.algorithm),
            bar.fg(DEFAULT_THEME.highlight).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {:>3.0}% ", data.progress * 100.0),
            bar.fg(DEFAULT_THEME.comment),
        ),
        Span::styled("│", sep_style),
        Span::styled(
            format!(
                " {:>5.1}s @ {} ",
                data.elapsed.as_secs_f64(),
                data.speed
            ),
            bar.fg(DEFAULT_THEME.teal),
        ),
        Span::styled("│", sep_style),
        Span::styled(
            format!(" {} ", data.message),
            bar.fg(if is_error {
                DEFAULT_THEME.error
            } else {
                DEFAULT_THEME.fg
            }),
        ),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(bar)
        .alignment(Alignment::Left);
    frame.render_widget(left_paragraph, layout[0]);

    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = bar.fg(DEFAULT_THEME.fg);

    let mut right_spans = vec![
        Span::styled(" ←/→ ", key_style),
        Span::styled(" step ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" ⎵ ", key_style),
        Span::styled(" play ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" +/- ", key_style),
        Span::styled(" speed ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" ⇥ ", key_style),
        Span::styled(" algorithm ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" ↵ / ⌫ ", key_style),
        Span::styled(" end/start ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled("q", key_style),
        Span::styled(" quit ", desc_style),
    ];

    let badge = |text: &'static str, bg: Color| {
        Span::styled(
            text,
            Style::default()
                .bg(bg)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
    };
    let indicator = match data.state {
        PlaybackState::Playing => Some(badge(" ▶ PLAYING ", DEFAULT_THEME.secondary)),
        PlaybackState::Ended => Some(badge(" END ", DEFAULT_THEME.error)),
        PlaybackState::Paused if data.position == 0 => {
            Some(badge(" START ", DEFAULT_THEME.success))
        }
        PlaybackState::Paused | PlaybackState::Idle => None,
    };
    if let Some(indicator) = indicator {
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(indicator);
    }

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(bar)
        .alignment(Alignment::Right);
    frame.render_widget(right_paragraph, layout[1]);
}
