use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use crate::app::{App, LoadState};
use crate::domain::{StockPoint, StockSource};
use crate::theme;

const SOURCES: [StockSource; 3] = [
    StockSource::History,
    StockSource::PurchaseOrder,
    StockSource::Forecast,
];

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let points = match &app.stock {
        LoadState::Loaded(points) if !points.is_empty() => points,
        LoadState::Loaded(_) => return render_label(frame, area, " No stock movements recorded"),
        LoadState::Loading => return render_label(frame, area, " Loading stock..."),
        LoadState::NotLoaded => return render_label(frame, area, " Stock not loaded"),
        LoadState::Error(msg) => {
            let widget = Paragraph::new(format!(" {}", msg)).style(Style::default().fg(theme::RED));
            frame.render_widget(widget, area);
            return;
        }
    };

    let first_date = points[0].date;
    let last_date = points[points.len() - 1].date;
    let x = |p: &StockPoint| (p.date - first_date).num_days() as f64;

    let total: Vec<(f64, f64)> = points.iter().map(|p| (x(p), p.quantity)).collect();
    let by_source: Vec<(StockSource, Vec<(f64, f64)>)> = SOURCES
        .iter()
        .map(|source| {
            let data = points
                .iter()
                .filter(|p| p.source == *source)
                .map(|p| (x(p), p.quantity))
                .collect();
            (*source, data)
        })
        .collect();

    let mut datasets = vec![Dataset::default()
        .name("Stock")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(theme::TEAL))
        .data(&total)];
    for (source, data) in by_source.iter().filter(|(_, d)| !d.is_empty()) {
        datasets.push(
            Dataset::default()
                .name(source.as_str())
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(theme::stock_color(*source)))
                .data(data),
        );
    }

    let x_max = x(&points[points.len() - 1]).max(1.0);
    let (y_min, y_max) = points.iter().fold((0.0_f64, 0.0_f64), |(lo, hi), p| {
        (lo.min(p.quantity), hi.max(p.quantity))
    });
    let y_max = if y_max > y_min { y_max } else { y_min + 1.0 };

    let axis_style = Style::default().fg(theme::TEXT_MUTED);
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::TEXT_MUTED))
                .title(" Stock over time ")
                .title_style(Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD)),
        )
        .x_axis(
            Axis::default()
                .style(axis_style)
                .bounds([0.0, x_max])
                .labels(vec![first_date.to_string(), last_date.to_string()]),
        )
        .y_axis(
            Axis::default()
                .style(axis_style)
                .bounds([y_min, y_max])
                .labels(vec![format!("{:.0}", y_min), format!("{:.0}", y_max)]),
        );

    frame.render_widget(chart, area);
}

fn render_label(frame: &mut Frame, area: Rect, text: &'static str) {
    let widget = Paragraph::new(text).style(Style::default().fg(theme::TEXT_MUTED));
    frame.render_widget(widget, area);
}
