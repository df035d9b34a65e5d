//! Variables pane: the named scalars of the current snapshot

use super::utils::{clamp_scroll, format_value_styled, pane_block};
use crate::snapshot::VarValue;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Padding, Paragraph},
    Frame,
};

pub fn render_variables_pane(
    frame: &mut Frame,
    area: Rect,
    variables: &[(String, VarValue)],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Variables ", is_focused);

    if variables.is_empty() {
        let paragraph = Paragraph::new("(none)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let width = variables
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0);
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, variables.len(), visible_height);

    let lines: Vec<Line> = variables
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(name, value)| {
            let mut spans = vec![
                Span::styled(
                    format!("{:<width$}", name, width = width),
                    Style::default()
                        .fg(DEFAULT_THEME.teal)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" = ", Style::default().fg(DEFAULT_THEME.comment)),
            ];
            spans.extend(format_value_styled(value));
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(block.padding(Padding::new(1, 0, 0, 0)));
    frame.render_widget(paragraph, area);
}
