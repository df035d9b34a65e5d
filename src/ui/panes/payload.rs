//! Payload pane: draws the working structure of the current snapshot
//!
//! One renderer per payload shape. Highlighted positions take the colour of
//! their highest-priority role (see [`ROLE_PRIORITY`](crate::ui::theme::ROLE_PRIORITY)).

use super::utils::{pane_block, position_style, role_at};
use crate::algorithms::graph::label;
use crate::snapshot::{Edge, GridCell, Highlights, Payload, Point, Snapshot};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as Segment, Points},
        Paragraph, Wrap,
    },
    Frame,
};

pub fn render_payload_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    snapshot: Option<&Snapshot>,
) {
    let title = format!(" {} ", title);
    let block = pane_block(&title, true);
    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;

    let Some(snapshot) = snapshot else {
        let paragraph = Paragraph::new("(no timeline)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };
    let hl = &snapshot.highlights;

    let lines = match &snapshot.payload {
        Payload::Array { values } if values.len() <= inner_height => {
            array_bars(values, hl, inner_width)
        }
        Payload::Array { values } => array_wrapped(values, hl, inner_width),
        Payload::Graph {
            nodes,
            edges,
            distances,
            order,
        } => graph_lines(*nodes, edges, distances, order, hl),
        Payload::Table {
            row_labels,
            col_labels,
            cells,
        } => table_lines(row_labels, col_labels, cells, hl),
        Payload::Grid { rows, cols, cells } => grid_lines(*rows, *cols, cells, hl),
        Payload::Text {
            text,
            pattern,
            offset,
            matches,
        } => text_lines(text, pattern, *offset, matches, hl),
        Payload::Points { points, hull } => {
            render_points(frame, area, block, points, hull, hl, snapshot.status.is_terminal());
            return;
        }
        Payload::Empty => {
            let paragraph = Paragraph::new(snapshot.narration.as_str())
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(DEFAULT_THEME.error));
            frame.render_widget(paragraph, area);
            return;
        }
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// One horizontal bar per element, scaled to the widest value
fn array_bars(values: &[i64], hl: &Highlights, width: usize) -> Vec<Line<'static>> {
    let widest = values.iter().map(|v| v.unsigned_abs()).max().unwrap_or(0).max(1);
    let room = width.saturating_sub(14).max(1);
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let len = bar_len(v, room, widest);
            let style = position_style(hl, i, DEFAULT_THEME.primary);
            Line::from(vec![
                Span::styled(format!("{:>3} ", i), Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(format!("{:>7} ", v), style),
                Span::styled("█".repeat(len), style),
            ])
        })
        .collect()
}

/// Bar length for `value`, scaled so that `widest` fills `room` cells
fn bar_len(value: i64, room: usize, widest: u64) -> usize {
    let scaled = u128::from(value.unsigned_abs()) * room as u128 / u128::from(widest.max(1));
    usize::try_from(scaled).unwrap_or(room).clamp(1, room.max(1))
}

/// Values laid out left to right, wrapping at the pane edge
fn array_wrapped(values: &[i64], hl: &Highlights, width: usize) -> Vec<Line<'static>> {
    let cell = values
        .iter()
        .map(|v| v.to_string().len())
        .max()
        .unwrap_or(1)
        + 1;
    let per_line = (width / cell).max(1);
    values
        .chunks(per_line)
        .enumerate()
        .map(|(row, chunk)| {
            Line::from(
                chunk
                    .iter()
                    .enumerate()
                    .map(|(col, v)| {
                        let i = row * per_line + col;
                        Span::styled(
                            format!("{:>cell$}", v, cell = cell),
                            position_style(hl, i, DEFAULT_THEME.fg),
                        )
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

fn graph_lines(
    nodes: usize,
    edges: &[Edge],
    distances: &[Option<u64>],
    order: &[usize],
    hl: &Highlights,
) -> Vec<Line<'static>> {
    let dim = Style::default().fg(DEFAULT_THEME.comment);
    let mut lines = vec![Line::from(Span::styled(
        " node  dist  seen  edges",
        dim.add_modifier(Modifier::BOLD),
    ))];
    for node in 0..nodes {
        let style = position_style(hl, node, DEFAULT_THEME.fg);
        let dist = distances
            .get(node)
            .copied()
            .flatten()
            .map_or_else(|| "∞".to_string(), |d| d.to_string());
        let seen = order
            .iter()
            .position(|&n| n == node)
            .map_or_else(|| "-".to_string(), |k| format!("#{}", k + 1));
        let mut spans = vec![
            Span::styled(format!("   {}  ", label(node)), style),
            Span::styled(format!("{:>4}  ", dist), Style::default().fg(DEFAULT_THEME.number)),
            Span::styled(format!("{:>4}  ", seen), dim),
        ];
        for edge in edges.iter().filter(|e| e.from == node || e.to == node) {
            let other = if edge.from == node { edge.to } else { edge.from };
            spans.push(Span::styled(
                label(other).to_string(),
                position_style(hl, other, DEFAULT_THEME.fg),
            ));
            spans.push(Span::styled(format!("({}) ", edge.weight), dim));
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn table_lines(
    row_labels: &[String],
    col_labels: &[String],
    cells: &[Vec<Option<i64>>],
    hl: &Highlights,
) -> Vec<Line<'static>> {
    let label_width = row_labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 1;
    let cell_width = col_labels
        .iter()
        .map(|l| l.chars().count())
        .chain(cells.iter().flatten().flatten().map(|v| v.to_string().len()))
        .max()
        .unwrap_or(1)
        + 1;
    let cols = col_labels.len();
    let header_style = Style::default()
        .fg(DEFAULT_THEME.comment)
        .add_modifier(Modifier::BOLD);

    let mut header = vec![Span::raw(" ".repeat(label_width))];
    header.extend(col_labels.iter().map(|l| {
        Span::styled(format!("{:>w$}", l, w = cell_width), header_style)
    }));
    let mut lines = vec![Line::from(header)];

    for (r, row) in cells.iter().enumerate() {
        let label = row_labels.get(r).map(String::as_str).unwrap_or("");
        let mut spans = vec![Span::styled(
            format!("{:<w$}", label, w = label_width),
            header_style,
        )];
        for (c, cell) in row.iter().enumerate() {
            let text = cell.map_or_else(|| "·".to_string(), |v| v.to_string());
            let plain = if cell.is_some() {
                DEFAULT_THEME.fg
            } else {
                DEFAULT_THEME.comment
            };
            spans.push(Span::styled(
                format!("{:>w$}", text, w = cell_width),
                position_style(hl, r * cols + c, plain),
            ));
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn grid_lines(rows: usize, cols: usize, cells: &[GridCell], hl: &Highlights) -> Vec<Line<'static>> {
    (0..rows)
        .map(|r| {
            Line::from(
                (0..cols)
                    .map(|c| {
                        let pos = r * cols + c;
                        let cell = cells.get(pos).copied().unwrap_or(GridCell::Empty);
                        let marked = role_at(hl, pos).map(|role| DEFAULT_THEME.role(role));
                        grid_span(cell, marked, (r + c) % 2 == 0)
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

fn grid_span(cell: GridCell, marked: Option<Color>, light: bool) -> Span<'static> {
    let (text, style) = match cell {
        GridCell::Empty => (
            " ·".to_string(),
            Style::default().fg(DEFAULT_THEME.comment).bg(if light {
                DEFAULT_THEME.current_line_bg
            } else {
                Color::Reset
            }),
        ),
        GridCell::Queen => (" ♛".to_string(), Style::default().fg(DEFAULT_THEME.highlight)),
        GridCell::Digit { value: 0, .. } => (
            " ·".to_string(),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
        GridCell::Digit { value, given } => (
            format!(" {}", value),
            if given {
                Style::default()
                    .fg(DEFAULT_THEME.fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.teal)
            },
        ),
        GridCell::Wall => ("██".to_string(), Style::default().fg(DEFAULT_THEME.comment)),
        GridCell::Open => ("  ".to_string(), Style::default()),
    };
    match marked {
        Some(color) => Span::styled(text, style.bg(color).fg(Color::Black)),
        None => Span::styled(text, style),
    }
}

fn text_lines(
    text: &str,
    pattern: &str,
    offset: usize,
    matches: &[usize],
    hl: &Highlights,
) -> Vec<Line<'static>> {
    let n = text.chars().count();
    let dim = Style::default().fg(DEFAULT_THEME.comment);

    let ruler: String = (0..n).map(|i| char::from(b'0' + (i % 10) as u8)).collect();
    let text_spans: Vec<Span> = text
        .chars()
        .enumerate()
        .map(|(i, ch)| Span::styled(ch.to_string(), position_style(hl, i, DEFAULT_THEME.fg)))
        .collect();

    let mut pattern_spans = vec![Span::raw(" ".repeat(offset.min(n)))];
    pattern_spans.extend(
        pattern
            .chars()
            .enumerate()
            .take_while(|(j, _)| offset + j < n)
            .map(|(j, ch)| {
                Span::styled(ch.to_string(), position_style(hl, offset + j, DEFAULT_THEME.primary))
            }),
    );

    let listing = matches
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    vec![
        Line::from(Span::styled(ruler, dim)),
        Line::from(text_spans),
        Line::from(pattern_spans),
        Line::default(),
        Line::from(vec![
            Span::styled("matches: ", dim),
            Span::styled(
                format!("[{}]", listing),
                Style::default().fg(DEFAULT_THEME.success),
            ),
        ]),
    ]
}

fn render_points(
    frame: &mut Frame,
    area: Rect,
    block: ratatui::widgets::Block<'_>,
    points: &[Point],
    hull: &[usize],
    hl: &Highlights,
    closed: bool,
) {
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (0.0f64, 1.0f64, 0.0f64, 1.0f64);
    if let Some(first) = points.first() {
        (min_x, max_x, min_y, max_y) = (first.x, first.x, first.y, first.y);
        for p in points {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
    }
    let pad_x = ((max_x - min_x) * 0.05).max(1.0);
    let pad_y = ((max_y - min_y) * 0.05).max(1.0);

    let mut segments: Vec<(Point, Point)> = hull
        .windows(2)
        .filter_map(|w| Some((*points.get(w[0])?, *points.get(w[1])?)))
        .collect();
    if closed && hull.len() > 2 {
        if let (Some(&a), Some(&b)) = (
            hull.last().and_then(|&i| points.get(i)),
            hull.first().and_then(|&i| points.get(i)),
        ) {
            segments.push((a, b));
        }
    }

    let canvas = Canvas::default()
        .block(block)
        .x_bounds([min_x - pad_x, max_x + pad_x])
        .y_bounds([min_y - pad_y, max_y + pad_y])
        .paint(|ctx| {
            for (a, b) in &segments {
                ctx.draw(&Segment::new(a.x, a.y, b.x, b.y, DEFAULT_THEME.accent));
            }
            ctx.layer();
            for (i, p) in points.iter().enumerate() {
                let color =
                    role_at(hl, i).map_or(DEFAULT_THEME.fg, |role| DEFAULT_THEME.role(role));
                ctx.draw(&Points {
                    coords: &[(p.x, p.y)],
                    color,
                });
                ctx.print(p.x, p.y, Span::styled(i.to_string(), Style::default().fg(color)));
            }
        });
    frame.render_widget(canvas, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_scale_extreme_values_without_overflow() {
        let lines = array_bars(&[i64::MAX, 1, -3, i64::MIN], &Highlights::default(), 80);
        assert_eq!(lines.len(), 4);
        assert_eq!(bar_len(i64::MAX, 66, i64::MIN.unsigned_abs()), 65);
        assert_eq!(bar_len(i64::MIN, 66, i64::MIN.unsigned_abs()), 66);
        assert_eq!(bar_len(1, 66, i64::MIN.unsigned_abs()), 1);
    }

    #[test]
    fn bars_fill_the_room_for_the_widest_value() {
        assert_eq!(bar_len(10, 20, 10), 20);
        assert_eq!(bar_len(-5, 20, 10), 10);
        assert_eq!(bar_len(0, 20, 10), 1);
    }
}
