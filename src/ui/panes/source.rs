//! Pseudocode pane
//!
//! Shows the listing of the active algorithm with the line the current
//! snapshot points at marked by an arrow. The marked line is kept at a fixed
//! visual row while stepping, like a debugger.

use super::utils::pane_block;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Light keyword highlighting for pseudocode
fn highlight_pseudocode(line: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    let flush = |word: &mut String, spans: &mut Vec<Span<'static>>| {
        if !word.is_empty() {
            spans.push(Span::styled(word.clone(), keyword_style(word)));
            word.clear();
        }
    };

    for c in line.chars() {
        if c.is_alphanumeric() || c == '_' {
            current_word.push(c);
            continue;
        }
        flush(&mut current_word, &mut spans);
        let style = match c {
            '(' | ')' | '[' | ']' | '{' | '}' => Style::default().fg(DEFAULT_THEME.primary),
            _ => Style::default().fg(DEFAULT_THEME.fg),
        };
        spans.push(Span::styled(c.to_string(), style));
    }
    flush(&mut current_word, &mut spans);

    spans
}

fn keyword_style(word: &str) -> Style {
    match word {
        "for" | "while" | "if" | "else" | "return" | "in" | "and" | "or" | "not" | "break"
        | "done" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        w if w.chars().all(|c| c.is_ascii_digit()) => Style::default().fg(DEFAULT_THEME.number),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Scroll state for the pseudocode pane
#[derive(Debug, Default)]
pub struct SourceScrollState {
    pub offset: usize,
    /// Visual row the current line is pinned to; set on first render
    pub target_line_row: Option<usize>,
}

/// Render the pseudocode pane; `current_line` is 0-based
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    listing: &[&str],
    current_line: Option<usize>,
    is_error: bool,
    scroll_state: &mut SourceScrollState,
) {
    let title = format!(" {} ", title);
    let block = pane_block(&title, false);

    let total_lines = listing.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 3)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    if let Some(line) = current_line.filter(|&l| l < total_lines) {
        scroll_state.offset = line.saturating_sub(target_row);
        if total_lines > visible_height {
            scroll_state.offset = scroll_state.offset.min(total_lines - visible_height);
        } else {
            scroll_state.offset = 0;
        }
    }

    let visible_lines: Vec<Line> = listing
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, text)| {
            let is_current = current_line == Some(idx);
            let marker = if is_current { " ▶ " } else { "   " };
            let line_num = format!("{:3} ", idx + 1);

            let (num_style, content_style) = if is_current && is_error {
                (
                    Style::default()
                        .fg(DEFAULT_THEME.error)
                        .add_modifier(Modifier::BOLD),
                    Some(Style::default().bg(DEFAULT_THEME.error)),
                )
            } else if is_current {
                (
                    Style::default()
                        .fg(DEFAULT_THEME.secondary)
                        .add_modifier(Modifier::BOLD),
                    Some(Style::default().bg(DEFAULT_THEME.current_line_bg)),
                )
            } else {
                (Style::default().fg(DEFAULT_THEME.comment), None)
            };

            let mut spans = vec![
                Span::styled(marker, num_style),
                Span::styled(line_num, num_style),
            ];
            let mut content = highlight_pseudocode(text);
            if let Some(bg) = content_style {
                for span in &mut content {
                    span.style = span.style.patch(bg);
                }
            }
            spans.extend(content);
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}
