//! Narration log pane
//!
//! Lists the narration of every snapshot up to the current one, newest at
//! the bottom. Stepping back shortens the log, so it always reads as the
//! story so far.

use super::utils::{clamp_scroll, pane_block};
use crate::snapshot::{Status, Timeline};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the narration log; `scroll_offset == usize::MAX` follows the tail
pub fn render_narration_pane(
    frame: &mut Frame,
    area: Rect,
    timeline: Option<&Timeline>,
    position: usize,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Narration ", is_focused);

    let Some(timeline) = timeline else {
        let paragraph = Paragraph::new("(nothing recorded)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let shown = timeline.iter().take(position + 1);
    let total_items = (position + 1).min(timeline.len());
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, total_items, visible_height);

    let items: Vec<ListItem> = shown
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, snapshot)| {
            let style = match snapshot.status {
                Status::Error | Status::Truncated => Style::default().fg(DEFAULT_THEME.error),
                Status::Found | Status::Done => Style::default().fg(DEFAULT_THEME.success),
                Status::NotFound => Style::default().fg(DEFAULT_THEME.secondary),
                Status::Running if idx == position => Style::default().fg(DEFAULT_THEME.fg),
                Status::Running => Style::default().fg(DEFAULT_THEME.comment),
            };
            let style = if idx == position {
                style.add_modifier(Modifier::BOLD)
            } else {
                style
            };
            ListItem::new(format!("{:>4}  {}", idx + 1, snapshot.narration)).style(style)
        })
        .collect();

    let list = List::new(items).block(block.padding(Padding::new(1, 0, 0, 0)));
    frame.render_widget(list, area);
}
