use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::View;
use crate::theme;
use crate::widgets::centered_rect;

pub fn render(view: &View, frame: &mut Frame, area: Rect) {
    let mut lines = vec![];

    lines.push(Line::from(""));
    lines.push(section("Navigation"));
    lines.push(binding("j / k / Up / Down", "Navigate up/down"));
    lines.push(binding("gg / G", "Go to top / bottom"));
    lines.push(binding("Ctrl+D / Ctrl+U", "Page down / up"));
    if *view == View::Trace {
        lines.push(binding("Enter", "Open event detail"));
        lines.push(binding("n / ] / Right", "Next page"));
        lines.push(binding("p / [ / Left", "Previous page"));
    }
    lines.push(binding("Esc", "Close detail"));

    lines.push(Line::from(""));
    lines.push(section("Views"));
    lines.push(binding("t", "Traceability log"));
    lines.push(binding("s", "Stock chart"));
    lines.push(binding("Tab / Shift+Tab", "Cycle views"));

    lines.push(Line::from(""));
    lines.push(section("Commands"));
    lines.push(binding(":item <app>/<id>", "Open another item"));
    lines.push(binding(":page <n>", "Jump to page"));
    lines.push(binding(":trace / :stock", "Switch view"));
    lines.push(binding(":q", "Quit"));

    lines.push(Line::from(""));
    lines.push(section("General"));
    lines.push(binding("Ctrl+R", "Refresh"));
    lines.push(binding("?", "Toggle this help"));

    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(4));
    let modal_area = centered_rect(60, height, area);
    frame.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::TEAL))
        .style(Style::default().bg(theme::BG_SURFACE))
        .title(" Help (? to close) ");

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, modal_area);
}

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        format!("  {}", title),
        Style::default()
            .fg(theme::TEAL)
            .add_modifier(Modifier::BOLD),
    ))
}

fn binding<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {:<22}", key), Style::default().fg(theme::YELLOW)),
        Span::styled(desc, Style::default().fg(theme::TEXT)),
    ])
}
