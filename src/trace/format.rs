use std::sync::LazyLock;

use regex::{NoExpand, Regex};

use crate::domain::{split_bom_value, Change, BOM_VALUE_SEPARATOR};

use super::grouping::GroupedEvent;

/// Longest text shown in a table cell before it is cut with an ellipsis.
pub const CELL_MAX_CHARS: usize = 100;

pub const MISSING_VALUE: &str = "—";
pub const NO_DETAILS: &str = "No details available.";

/// "refdes", "Ref.des" and "Ref des". A dot after the dotted spelling belongs
/// to the token, so an already applied "Ref.Des." label matches as a whole.
static DESIGNATOR_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bref(?:\.des\b\.?|\s?des\b)").expect("designator pattern is valid")
});

/// Rewrites designator wording in `text` to the app's label.
///
/// Spellings of "refdes" become `label`, and `" (label)"` is inserted before
/// every `" → "` separator that does not already carry it.
pub fn apply_designator_label(text: &str, label: &str) -> String {
    let replaced = DESIGNATOR_TOKEN.replace_all(text, NoExpand(label));
    insert_label_before_separators(&replaced, label)
}

fn insert_label_before_separators(text: &str, label: &str) -> String {
    let marker = format!("({})", label);
    let mut out = String::with_capacity(text.len() + marker.len());
    let mut pieces = text.split(BOM_VALUE_SEPARATOR).peekable();

    while let Some(piece) = pieces.next() {
        out.push_str(piece);
        if pieces.peek().is_some() {
            if !piece.trim_end().ends_with(&marker) {
                out.push(' ');
                out.push_str(&marker);
            }
            out.push_str(BOM_VALUE_SEPARATOR);
        }
    }
    out
}

/// Cuts `text` to [`CELL_MAX_CHARS`] characters. Returns the shown text and,
/// when something was cut, the full text for the cell title.
pub fn truncate(text: &str, max_chars: usize) -> (String, Option<String>) {
    if text.chars().count() <= max_chars {
        return (text.to_string(), None);
    }
    let mut shown: String = text.chars().take(max_chars).collect();
    shown.push('…');
    (shown, Some(text.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    pub text: String,
    pub title: Option<String>,
}

/// Detail text for the table row of `group`.
pub fn table_cell(group: &GroupedEvent, label: &str) -> TableCell {
    let Some(first) = group.first() else {
        return TableCell {
            text: String::new(),
            title: None,
        };
    };

    let raw = match (&group.details, &first.change) {
        (Some(details), _) => details.clone(),
        (None, Change::Diff(diff)) => format!("{} changed", diff.field_name),
        (None, _) => String::new(),
    };

    let text = if first.event_type.is_bom() {
        apply_designator_label(&raw, label)
    } else {
        raw
    };

    let (text, title) = truncate(&text, CELL_MAX_CHARS);
    TableCell { text, title }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearedRow {
    pub designator: String,
    pub part: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    Comparison {
        field_label: String,
        previous: String,
        current: String,
    },
    ClearedRows(Vec<ClearedRow>),
    Text(String),
}

/// Builds the on-demand detail view for one table row.
pub fn detail_view(group: &GroupedEvent, label: &str) -> DetailView {
    if group.is_clear_batch() {
        let rows = group
            .events
            .iter()
            .map(|event| {
                let (designator, part) = match &event.change {
                    Change::BomRowCleared {
                        old_value: Some(value),
                    } => split_bom_value(value),
                    _ => (None, None),
                };
                ClearedRow {
                    designator: designator.unwrap_or(MISSING_VALUE).to_string(),
                    part: part.unwrap_or(MISSING_VALUE).to_string(),
                }
            })
            .collect();
        return DetailView::ClearedRows(rows);
    }

    if let Some(Change::Diff(diff)) = group.first().map(|e| &e.change) {
        let value = |v: &Option<String>| {
            v.as_deref()
                .map(|s| apply_designator_label(s, label))
                .unwrap_or_else(|| MISSING_VALUE.to_string())
        };
        return DetailView::Comparison {
            field_label: apply_designator_label(&diff.field_name, label),
            previous: value(&diff.old_value),
            current: value(&diff.new_value),
        };
    }

    DetailView::Text(
        group
            .details
            .clone()
            .unwrap_or_else(|| NO_DETAILS.to_string()),
    )
}
