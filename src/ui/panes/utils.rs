//! Shared helpers for pane rendering
//!
//! All functions in this module are `pub(super)`, visible only to the panes.

use crate::snapshot::{Highlights, Role, VarValue};
use crate::ui::theme::{DEFAULT_THEME, ROLE_PRIORITY};
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders},
};

/// Bordered block with the focus colouring every pane uses
pub(super) fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Highest-priority role marking `position`
pub(super) fn role_at(highlights: &Highlights, position: usize) -> Option<Role> {
    ROLE_PRIORITY.iter().copied().find(|role| {
        highlights
            .get(role)
            .is_some_and(|marked| marked.binary_search(&position).is_ok())
    })
}

/// Foreground style for a position, falling back to `plain`
pub(super) fn position_style(highlights: &Highlights, position: usize, plain: Color) -> Style {
    match role_at(highlights, position) {
        Some(role) => Style::default()
            .fg(DEFAULT_THEME.role(role))
            .add_modifier(Modifier::BOLD),
        None => Style::default().fg(plain),
    }
}

/// Format a variable value with styled spans
pub(super) fn format_value_styled(value: &VarValue) -> Vec<Span<'static>> {
    match value {
        VarValue::Int(n) => vec![Span::styled(
            n.to_string(),
            Style::default().fg(DEFAULT_THEME.number),
        )],
        VarValue::Bool(b) => vec![Span::styled(
            b.to_string(),
            Style::default().fg(DEFAULT_THEME.keyword),
        )],
        VarValue::Text(s) if s.starts_with('[') => highlight_value_string(s),
        VarValue::Text(s) => vec![Span::styled(
            format!("\"{}\"", s),
            Style::default().fg(DEFAULT_THEME.secondary),
        )],
        VarValue::Missing => vec![Span::styled(
            "-",
            Style::default()
                .fg(DEFAULT_THEME.comment)
                .add_modifier(Modifier::DIM),
        )],
    }
}

/// Highlight a list-like value string (simple lexer)
fn highlight_value_string(s: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut current_token = String::new();

    for c in s.chars() {
        if matches!(c, '[' | ']' | ',' | ' ') {
            if !current_token.is_empty() {
                spans.push(style_token(&current_token));
                current_token.clear();
            }
            spans.push(Span::styled(
                c.to_string(),
                Style::default().fg(DEFAULT_THEME.fg),
            ));
            continue;
        }
        current_token.push(c);
    }

    if !current_token.is_empty() {
        spans.push(style_token(&current_token));
    }

    spans
}

fn style_token(token: &str) -> Span<'static> {
    if token.chars().all(|c| c.is_ascii_digit() || c == '-') {
        Span::styled(token.to_string(), Style::default().fg(DEFAULT_THEME.number))
    } else {
        Span::styled(token.to_string(), Style::default().fg(DEFAULT_THEME.fg))
    }
}

/// Keep `offset` within the scrollable range of `total` rows
pub(super) fn clamp_scroll(offset: &mut usize, total: usize, visible: usize) {
    if total > visible {
        *offset = (*offset).min(total - visible);
    } else {
        *offset = 0;
    }
}
