use chrono::{DateTime, Local};
use serde::Deserialize;

/// Separator between designator and part in BOM row values.
pub const BOM_VALUE_SEPARATOR: &str = " → ";

/// Field name the backend records on each row of a "clear BOM" action.
pub const CLEAR_BOM_FIELD: &str = "clear bom";

const UNKNOWN_ACTOR: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Created,
    RevisionCreated,
    BomEdited,
    BomImported,
    BomCleared,
    Approved,
    Released,
    Updated,
    #[serde(other)]
    Unknown,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::RevisionCreated => "revision_created",
            Self::BomEdited => "bom_edited",
            Self::BomImported => "bom_imported",
            Self::BomCleared => "bom_cleared",
            Self::Approved => "approved",
            Self::Released => "released",
            Self::Updated => "updated",
            Self::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::RevisionCreated => "Revision created",
            Self::BomEdited => "BOM edited",
            Self::BomImported => "BOM imported",
            Self::BomCleared => "BOM cleared",
            Self::Approved => "Approved",
            Self::Released => "Released",
            Self::Updated => "Updated",
            Self::Unknown => "Other",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Created => "+",
            Self::RevisionCreated => "↑",
            Self::BomEdited => "✎",
            Self::BomImported => "⇩",
            Self::BomCleared => "✗",
            Self::Approved => "✓",
            Self::Released => "★",
            Self::Updated => "●",
            Self::Unknown => "?",
        }
    }

    pub fn is_bom(&self) -> bool {
        matches!(self, Self::BomEdited | Self::BomImported | Self::BomCleared)
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Actor {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastName")]
    pub last_name: Option<String>,
}

impl Actor {
    pub fn display_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or("").trim();
        let last = self.last_name.as_deref().unwrap_or("").trim();
        let name = format!("{} {}", first, last);
        let name = name.trim();
        if name.is_empty() {
            UNKNOWN_ACTOR.to_string()
        } else {
            name.to_string()
        }
    }
}

/// One event as the backend serializes it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTraceEvent {
    pub id: i64,
    #[serde(alias = "eventType")]
    pub event_type: EventType,
    pub timestamp: String,
    #[serde(default, alias = "actor")]
    pub user: Option<Actor>,
    #[serde(default, alias = "fieldName")]
    pub field_name: Option<String>,
    #[serde(default, alias = "oldValue")]
    pub old_value: Option<String>,
    #[serde(default, alias = "newValue")]
    pub new_value: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

/// One page of the traceability endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPage {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub results: Vec<RawTraceEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDiff {
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// What an event changed, keyed on the shape the backend recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Diff(FieldDiff),
    BomRowCleared { old_value: Option<String> },
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    pub id: i64,
    pub event_type: EventType,
    pub timestamp: String,
    pub actor: Option<Actor>,
    pub details: Option<String>,
    pub change: Change,
}

impl TraceEvent {
    pub fn actor_name(&self) -> String {
        self.actor
            .as_ref()
            .map(Actor::display_name)
            .unwrap_or_else(|| UNKNOWN_ACTOR.to_string())
    }

    pub fn actor_id(&self) -> Option<i64> {
        self.actor.as_ref().and_then(|a| a.id)
    }

    /// Timestamp truncated to whole seconds (`YYYY-MM-DDTHH:MM:SS`).
    pub fn second_key(&self) -> &str {
        self.timestamp.get(..19).unwrap_or(&self.timestamp)
    }

    pub fn is_bom_row_cleared(&self) -> bool {
        matches!(self.change, Change::BomRowCleared { .. })
    }

    pub fn display_time(&self) -> String {
        match DateTime::parse_from_rfc3339(&self.timestamp) {
            Ok(dt) => dt
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            Err(_) => self.timestamp.clone(),
        }
    }
}

impl From<RawTraceEvent> for TraceEvent {
    fn from(raw: RawTraceEvent) -> Self {
        let change = match (raw.event_type, raw.field_name) {
            (EventType::BomCleared, Some(field)) if field == CLEAR_BOM_FIELD => {
                Change::BomRowCleared {
                    old_value: raw.old_value,
                }
            }
            (_, Some(field)) if raw.old_value.is_some() || raw.new_value.is_some() => {
                Change::Diff(FieldDiff {
                    field_name: field,
                    old_value: raw.old_value,
                    new_value: raw.new_value,
                })
            }
            _ => Change::None,
        };

        Self {
            id: raw.id,
            event_type: raw.event_type,
            timestamp: raw.timestamp,
            actor: raw.user,
            details: raw.details.filter(|d| !d.trim().is_empty()),
            change,
        }
    }
}

/// Splits a `"<designator> → <part>"` value into its halves.
pub fn split_bom_value(value: &str) -> (Option<&str>, Option<&str>) {
    let (designator, part) = match value.split_once(BOM_VALUE_SEPARATOR) {
        Some((d, p)) => (d, Some(p)),
        None => (value, None),
    };
    fn non_empty(s: &str) -> Option<&str> {
        let s = s.trim();
        (!s.is_empty()).then_some(s)
    }
    (non_empty(designator), part.and_then(non_empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> TraceEvent {
        let raw: RawTraceEvent = serde_json::from_str(json).expect("decode event");
        raw.into()
    }

    #[test]
    fn clear_bom_rows_are_classified() {
        let event = decode(
            r#"{"id": 1, "event_type": "bom_cleared", "timestamp": "2024-01-01T10:00:00Z",
                "user": {"first_name": "Ada", "last_name": "L"},
                "field_name": "clear bom", "old_value": "R1 → PartX"}"#,
        );
        assert_eq!(
            event.change,
            Change::BomRowCleared {
                old_value: Some("R1 → PartX".to_string())
            }
        );
        assert_eq!(event.actor_name(), "Ada L");
    }

    #[test]
    fn structured_diff_and_camel_case_aliases() {
        let event = decode(
            r#"{"id": 2, "eventType": "bom_edited", "timestamp": "2024-01-01T10:00:00.123Z",
                "actor": {"firstName": "Grace", "lastName": null},
                "fieldName": "refdes", "oldValue": "11 → ASM", "newValue": "12 → ASM"}"#,
        );
        assert_eq!(event.event_type, EventType::BomEdited);
        assert!(matches!(event.change, Change::Diff(ref d) if d.field_name == "refdes"));
        assert_eq!(event.actor_name(), "Grace");
        assert_eq!(event.second_key(), "2024-01-01T10:00:00");
    }

    #[test]
    fn unknown_type_and_missing_actor_are_tolerated() {
        let event = decode(
            r#"{"id": 3, "event_type": "archived", "timestamp": "2024-01-01", "details": "  "}"#,
        );
        assert_eq!(event.event_type, EventType::Unknown);
        assert_eq!(event.change, Change::None);
        assert_eq!(event.details, None);
        assert_eq!(event.actor_name(), "Unknown");
        assert_eq!(event.second_key(), "2024-01-01");
    }

    #[test]
    fn bom_cleared_without_clear_bom_field_is_not_a_row() {
        let event = decode(
            r#"{"id": 4, "event_type": "bom_cleared", "timestamp": "2024-01-01T10:00:00Z",
                "field_name": "quantity", "old_value": "3", "new_value": "0"}"#,
        );
        assert!(!event.is_bom_row_cleared());
        assert!(matches!(event.change, Change::Diff(_)));
    }

    #[test]
    fn split_bom_value_halves() {
        assert_eq!(split_bom_value("R1 → PartX"), (Some("R1"), Some("PartX")));
        assert_eq!(split_bom_value("R1"), (Some("R1"), None));
        assert_eq!(split_bom_value(" → PartX"), (None, Some("PartX")));
        assert_eq!(split_bom_value(""), (None, None));
    }
}
