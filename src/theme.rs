use ratatui::style::Color;

use crate::domain::{EventType, StockSource};

// Backgrounds
pub const BG_DARK: Color = Color::Rgb(13, 13, 23);
pub const BG_BAR: Color = Color::Rgb(17, 17, 30);
pub const BG_SURFACE: Color = Color::Rgb(22, 22, 38);
pub const BG_HIGHLIGHT: Color = Color::Rgb(30, 30, 58);

// Accent
pub const TEAL: Color = Color::Rgb(45, 212, 191);
pub const TEAL_DIM: Color = Color::Rgb(20, 130, 120);

// Text
pub const TEXT: Color = Color::Rgb(220, 220, 230);
pub const TEXT_DIM: Color = Color::Rgb(130, 130, 155);
pub const TEXT_MUTED: Color = Color::Rgb(75, 75, 100);

// Semantic
pub const GREEN: Color = Color::Rgb(52, 211, 153);
pub const BLUE: Color = Color::Rgb(96, 165, 250);
pub const RED: Color = Color::Rgb(248, 113, 113);
pub const YELLOW: Color = Color::Rgb(251, 191, 36);
pub const CYAN: Color = Color::Rgb(103, 232, 249);
pub const MAGENTA: Color = Color::Rgb(232, 121, 249);

pub fn event_color(event_type: EventType) -> Color {
    match event_type {
        EventType::Created | EventType::RevisionCreated => GREEN,
        EventType::BomEdited | EventType::BomImported => BLUE,
        EventType::BomCleared => RED,
        EventType::Approved | EventType::Released => MAGENTA,
        EventType::Updated => YELLOW,
        EventType::Unknown => TEXT_DIM,
    }
}

pub fn stock_color(source: StockSource) -> Color {
    match source {
        StockSource::History => CYAN,
        StockSource::PurchaseOrder => GREEN,
        StockSource::Forecast => YELLOW,
    }
}
