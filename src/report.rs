//! Plain-text rendering of a trace page for `--print`.

use std::fmt::Write;

use crate::trace::{detail_view, page_count, table_cell, DetailView, TracePage};

pub fn render_page(page: &TracePage) -> String {
    let label = page.item.app.designator_label();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} {}  page {}/{}  ({} events)",
        page.item.app.label(),
        page.item,
        page.page,
        page_count(page.total_count),
        page.total_count
    );

    if page.events.is_empty() {
        let _ = writeln!(out, "  no events");
        return out;
    }

    for group in &page.events {
        let Some(first) = group.first() else {
            continue;
        };
        let cell = table_cell(group, label);
        let _ = writeln!(
            out,
            "{}  {:<20} {:<16} {}",
            first.display_time(),
            first.actor_name(),
            first.event_type.label(),
            cell.title.as_deref().unwrap_or(&cell.text)
        );

        match detail_view(group, label) {
            DetailView::ClearedRows(rows) if rows.len() > 1 => {
                for row in rows {
                    let _ = writeln!(out, "    {:<12} {}", row.designator, row.part);
                }
            }
            DetailView::Comparison {
                field_label,
                previous,
                current,
            } => {
                let _ = writeln!(out, "    {}: {}  =>  {}", field_label, previous, current);
            }
            _ => {}
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Change, EventType, FieldDiff, ItemApp, ItemRef, TraceEvent};
    use crate::trace::group_events;

    fn cleared(id: i64, old: &str) -> TraceEvent {
        TraceEvent {
            id,
            event_type: EventType::BomCleared,
            timestamp: "not-a-timestamp".to_string(),
            actor: None,
            details: None,
            change: Change::BomRowCleared {
                old_value: Some(old.to_string()),
            },
        }
    }

    #[test]
    fn renders_batches_and_diffs() {
        let item = ItemRef::new(ItemApp::Pcbas, 4);
        let diff = TraceEvent {
            id: 3,
            event_type: EventType::BomEdited,
            timestamp: "not-a-timestamp".to_string(),
            actor: None,
            details: Some("refdes changed".to_string()),
            change: Change::Diff(FieldDiff {
                field_name: "refdes".to_string(),
                old_value: Some("11 → ASM".to_string()),
                new_value: Some("12 → ASM".to_string()),
            }),
        };
        let events = vec![diff, cleared(2, "R1 → X"), cleared(1, "R2 → Y")];
        let page = TracePage {
            item,
            page: 1,
            events: group_events(events, item.app.designator_label()),
            total_count: 3,
        };

        let text = render_page(&page);

        assert!(text.starts_with("PCBA pcbas/4  page 1/1  (3 events)"));
        assert!(text.contains("Ref.Des. changed"));
        assert!(text.contains("    Ref.Des.: 11 (Ref.Des.) → ASM  =>  12 (Ref.Des.) → ASM"));
        assert!(text.contains("Removed Ref.Des.: R1, R2"));
        assert!(text.contains("    R1           X"));
    }

    #[test]
    fn renders_empty_page() {
        let page = TracePage::empty(ItemRef::new(ItemApp::Parts, 1), 2);
        let text = render_page(&page);
        assert!(text.contains("page 2/1  (0 events)"));
        assert!(text.contains("no events"));
    }
}
