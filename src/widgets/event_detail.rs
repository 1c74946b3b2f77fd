use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::App;
use crate::theme;
use crate::trace::{detail_view, DetailView, GroupedEvent};
use crate::widgets::centered_rect;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let Some(group) = app.detail_group() else {
        return;
    };
    let Some(first) = group.first() else {
        return;
    };
    let label = app.designator_label();

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("{} {}", first.event_type.symbol(), first.event_type.label()),
                Style::default()
                    .fg(theme::event_color(first.event_type))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}  by {}", first.display_time(), first.actor_name()),
                Style::default().fg(theme::TEXT_DIM),
            ),
        ]),
        Line::from(""),
    ];
    lines.extend(body(group, label));

    let height = (area.height * 7 / 10).max(8).min(area.height);
    let modal_area = centered_rect(80, height, area);
    frame.render_widget(Clear, modal_area);

    // Keep the last line in view when scrolled past the end
    let visible = modal_area.height.saturating_sub(2);
    let max_scroll = (lines.len() as u16).saturating_sub(visible);
    let scroll = app.detail_scroll.min(max_scroll);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::TEAL))
        .style(Style::default().bg(theme::BG_SURFACE))
        .title(" Event detail (Esc to close) ");

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, modal_area);
}

fn body(group: &GroupedEvent, label: &str) -> Vec<Line<'static>> {
    match detail_view(group, label) {
        DetailView::Comparison {
            field_label,
            previous,
            current,
        } => vec![
            Line::from(vec![
                Span::styled("Field     ", Style::default().fg(theme::TEXT_MUTED)),
                Span::styled(field_label, Style::default().fg(theme::TEXT)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Previous  ", Style::default().fg(theme::TEXT_MUTED)),
                Span::styled(previous, Style::default().fg(theme::RED)),
            ]),
            Line::from(vec![
                Span::styled("Current   ", Style::default().fg(theme::TEXT_MUTED)),
                Span::styled(current, Style::default().fg(theme::GREEN)),
            ]),
        ],
        DetailView::ClearedRows(rows) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    format!("{} row(s) removed from BOM", rows.len()),
                    Style::default().fg(theme::TEXT),
                )),
                Line::from(""),
                Line::from(vec![
                    Span::styled(
                        format!("{:<16}", label),
                        Style::default()
                            .fg(theme::TEXT_DIM)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        "Part",
                        Style::default()
                            .fg(theme::TEXT_DIM)
                            .add_modifier(Modifier::BOLD),
                    ),
                ]),
            ];
            lines.extend(rows.into_iter().map(|row| {
                Line::from(vec![
                    Span::styled(
                        format!("{:<16}", row.designator),
                        Style::default().fg(theme::YELLOW),
                    ),
                    Span::styled(row.part, Style::default().fg(theme::TEXT)),
                ])
            }));
            lines
        }
        DetailView::Text(text) => text
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(theme::TEXT))))
            .collect(),
    }
}
