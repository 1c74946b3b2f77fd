use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, InputMode, Overlay, View};
use crate::theme;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let hints = match (&app.input_mode, &app.overlay) {
        (InputMode::Command, _) => vec![("Esc", "cancel"), ("Tab", "complete"), ("Enter", "execute")],
        (InputMode::PendingG, _) => vec![("g", "top")],
        (_, Overlay::EventDetail(_)) => vec![("j/k", "scroll"), ("Esc", "close")],
        (_, Overlay::Help) => vec![("?", "close")],
        (InputMode::Normal, Overlay::None) => match app.view {
            View::Trace => vec![
                ("j/k", "nav"),
                ("Enter", "detail"),
                ("n/p", "page"),
                ("s", "stock"),
                (":", "cmd"),
                ("?", "help"),
                ("q", "quit"),
            ],
            View::Stock => vec![
                ("t", "trace"),
                ("Ctrl+R", "refresh"),
                (":", "cmd"),
                ("?", "help"),
                ("q", "quit"),
            ],
        },
    };

    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", Style::default()));
        }
        spans.push(Span::styled(*key, Style::default().fg(theme::TEAL)));
        spans.push(Span::styled(
            format!(":{}", desc),
            Style::default().fg(theme::TEXT_MUTED),
        ));
    }

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::BG_SURFACE));
    frame.render_widget(widget, area);
}
