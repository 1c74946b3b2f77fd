pub mod command_input;
pub mod error_toast;
pub mod event_detail;
pub mod footer;
pub mod header;
pub mod help_overlay;
pub mod stock_chart;
pub mod trace_table;

use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// A rect of `percent_x` width and fixed `height`, centered in `area`.
pub fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .split(vertical[0]);
    horizontal[0]
}
