use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::action::ViewType;
use crate::app::{App, ConnectionStatus, View};
use crate::theme;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let mut left_spans: Vec<Span> = vec![
        Span::styled(
            " bomtrace ",
            Style::default()
                .fg(theme::TEAL)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("| ", Style::default().fg(theme::TEXT_MUTED)),
        Span::styled(
            app.item.app.label(),
            Style::default().fg(theme::TEXT_DIM),
        ),
        Span::raw(" "),
        Span::styled(
            app.item.to_string(),
            Style::default()
                .fg(theme::TEXT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  ", Style::default()),
    ];

    for view_type in ViewType::all() {
        let active = View::from(view_type) == app.view;
        let style = if active {
            Style::default()
                .fg(theme::BG_DARK)
                .bg(theme::TEAL)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme::TEXT_DIM)
        };
        left_spans.push(Span::styled(format!(" {} ", view_type.label()), style));
        left_spans.push(Span::raw(" "));
    }

    let mut right_spans: Vec<Span> = Vec::new();

    if app.view == View::Trace {
        right_spans.push(Span::styled(
            format!("page {}/{}", app.page, app.known_page_count()),
            Style::default().fg(theme::TEXT),
        ));
        if let Some(count) = app.total_count {
            right_spans.push(Span::styled(
                format!("  [{} events]", count),
                Style::default().fg(theme::TEXT_MUTED),
            ));
        }
        right_spans.push(Span::raw("  "));
    }

    let connection_indicator = match &app.connection_status {
        ConnectionStatus::Connected => {
            Span::styled("● Connected", Style::default().fg(theme::GREEN))
        }
        ConnectionStatus::Connecting => {
            Span::styled("◌ Connecting...", Style::default().fg(theme::YELLOW))
        }
        ConnectionStatus::Error(_) => {
            Span::styled("✗ Unreachable", Style::default().fg(theme::RED))
        }
    };
    right_spans.push(connection_indicator);

    right_spans.push(Span::styled(
        format!("  {}", app.backend),
        Style::default().fg(theme::TEAL_DIM),
    ));
    right_spans.push(Span::raw(" "));

    let left_width: usize = left_spans.iter().map(|s| s.width()).sum();
    let right_width: usize = right_spans.iter().map(|s| s.width()).sum();
    let gap = (area.width as usize).saturating_sub(left_width + right_width);

    let mut spans = left_spans;
    spans.push(Span::raw(" ".repeat(gap)));
    spans.extend(right_spans);

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::BG_BAR));
    frame.render_widget(widget, area);
}
