use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use crate::app::App;
use crate::theme;
use crate::trace::{table_cell, GroupedEvent};

const HEADER: [&str; 5] = [" Time", "Actor", "Event", "Details", "Rows"];

pub fn render(app: &mut App, frame: &mut Frame, area: Rect) {
    let label = app.designator_label();

    let groups = match app.trace.data() {
        Some(page) if !page.events.is_empty() => &page.events,
        Some(_) => {
            render_label(frame, area, " No traceability events for this item");
            return;
        }
        None => {
            let text = if app.trace.is_loading() {
                " Loading traceability log..."
            } else {
                " Traceability log not loaded"
            };
            render_label(frame, area, text);
            return;
        }
    };

    let rows: Vec<Row> = groups.iter().map(|group| row(group, label)).collect();

    // Full text of the selected row when its cell was truncated
    let title = app
        .selected_group()
        .and_then(|group| table_cell(group, label).title);

    let layout = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(if title.is_some() { 2 } else { 0 }),
    ])
    .split(area);

    let widths = [
        Constraint::Length(21),
        Constraint::Length(20),
        Constraint::Length(20),
        Constraint::Fill(1),
        Constraint::Length(5),
    ];

    let table = Table::new(rows, widths)
        .header(header_row())
        .block(Block::default().borders(Borders::NONE))
        .row_highlight_style(
            Style::default()
                .bg(theme::BG_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(table, layout[0], &mut app.trace_table_state);

    if let Some(title) = title {
        let widget = Paragraph::new(Line::from(vec![
            Span::styled(" ", Style::default()),
            Span::styled(title, Style::default().fg(theme::TEXT_DIM)),
        ]))
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(theme::TEXT_MUTED)),
        );
        frame.render_widget(widget, layout[1]);
    }
}

fn header_row() -> Row<'static> {
    Row::new(HEADER.iter().map(|h| Cell::from(*h)).collect::<Vec<_>>())
        .style(
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        )
        .height(1)
}

fn row(group: &GroupedEvent, label: &str) -> Row<'static> {
    let Some(first) = group.first() else {
        return Row::default();
    };
    let cell = table_cell(group, label);
    let rows = if group.len() > 1 {
        format!("×{}", group.len())
    } else {
        String::new()
    };

    Row::new(vec![
        Cell::from(format!(" {}", first.display_time())),
        Cell::from(first.actor_name()),
        Cell::from(format!(
            "{} {}",
            first.event_type.symbol(),
            first.event_type.label()
        ))
        .style(Style::default().fg(theme::event_color(first.event_type))),
        Cell::from(cell.text),
        Cell::from(rows).style(Style::default().fg(theme::TEXT_MUTED)),
    ])
}

fn render_label(frame: &mut Frame, area: Rect, text: &'static str) {
    let widget = Paragraph::new(text).style(Style::default().fg(theme::TEXT_MUTED));
    frame.render_widget(widget, area);
}
