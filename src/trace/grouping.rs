use crate::domain::{split_bom_value, Change, TraceEvent};

/// One logical row of the trace table: a single event, or a run of BOM rows
/// cleared together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedEvent {
    pub events: Vec<TraceEvent>,
    pub details: Option<String>,
}

impl GroupedEvent {
    fn single(event: TraceEvent) -> Self {
        let details = event.details.clone();
        Self {
            events: vec![event],
            details,
        }
    }

    /// The event shown in the table row.
    pub fn first(&self) -> Option<&TraceEvent> {
        self.events.first()
    }

    pub fn is_clear_batch(&self) -> bool {
        self.first().is_some_and(TraceEvent::is_bom_row_cleared)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Collapses consecutive "clear bom" rows recorded by the same actor in the
/// same second into one group. Input and output are newest-first.
pub fn group_events(events: Vec<TraceEvent>, designator_label: &str) -> Vec<GroupedEvent> {
    let mut groups: Vec<GroupedEvent> = Vec::new();
    let mut batch: Vec<TraceEvent> = Vec::new();

    for event in events {
        if let Some(head) = batch.first() {
            if event.is_bom_row_cleared() && same_action(head, &event) {
                batch.push(event);
                continue;
            }
            groups.push(close_batch(std::mem::take(&mut batch), designator_label));
        }

        if event.is_bom_row_cleared() {
            batch.push(event);
        } else {
            groups.push(GroupedEvent::single(event));
        }
    }

    if !batch.is_empty() {
        groups.push(close_batch(batch, designator_label));
    }

    groups
}

fn same_action(head: &TraceEvent, next: &TraceEvent) -> bool {
    if head.second_key() != next.second_key() {
        return false;
    }
    if head.actor_name() != next.actor_name() {
        return false;
    }
    // Same display name is not enough when the backend tells users apart.
    match (head.actor_id(), next.actor_id()) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

fn close_batch(events: Vec<TraceEvent>, designator_label: &str) -> GroupedEvent {
    let designators: Vec<&str> = events
        .iter()
        .filter_map(|e| match &e.change {
            Change::BomRowCleared {
                old_value: Some(value),
            } => split_bom_value(value).0,
            _ => None,
        })
        .collect();

    let details = if designators.is_empty() {
        format!("{} row(s) removed from BOM", events.len())
    } else {
        format!("Removed {}: {}", designator_label, designators.join(", "))
    };

    GroupedEvent {
        events,
        details: Some(details),
    }
}

/// Flattens groups back into the events they were built from.
pub fn flatten(groups: &[GroupedEvent]) -> Vec<&TraceEvent> {
    groups.iter().flat_map(|g| g.events.iter()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Actor, EventType, FieldDiff};

    fn actor(name: &str, id: Option<i64>) -> Option<Actor> {
        Some(Actor {
            id,
            first_name: Some(name.to_string()),
            last_name: None,
        })
    }

    fn cleared(id: i64, ts: &str, who: &str, old: Option<&str>) -> TraceEvent {
        TraceEvent {
            id,
            event_type: EventType::BomCleared,
            timestamp: ts.to_string(),
            actor: actor(who, None),
            details: None,
            change: Change::BomRowCleared {
                old_value: old.map(str::to_string),
            },
        }
    }

    fn updated(id: i64, ts: &str) -> TraceEvent {
        TraceEvent {
            id,
            event_type: EventType::Updated,
            timestamp: ts.to_string(),
            actor: actor("A", None),
            details: Some("Description changed".to_string()),
            change: Change::Diff(FieldDiff {
                field_name: "description".to_string(),
                old_value: Some("old".to_string()),
                new_value: Some("new".to_string()),
            }),
        }
    }

    #[test]
    fn clear_rows_in_same_second_collapse() {
        let events = vec![
            cleared(1, "2024-01-01T10:00:00Z", "A", Some("R1 → PartX")),
            cleared(2, "2024-01-01T10:00:00Z", "A", Some("R2 → PartY")),
            updated(3, "2024-01-01T09:00:00Z"),
        ];

        let groups = group_events(events, "F/N");

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[0].details.as_deref(), Some("Removed F/N: R1, R2"));
        assert!(groups[0].is_clear_batch());
        assert_eq!(groups[1].len(), 1);
        assert_eq!(groups[1].details.as_deref(), Some("Description changed"));
    }

    #[test]
    fn sub_second_differences_are_ignored() {
        let events = vec![
            cleared(1, "2024-01-01T10:00:00.900Z", "A", Some("R1 → X")),
            cleared(2, "2024-01-01T10:00:00.100Z", "A", Some("R2 → Y")),
        ];
        let groups = group_events(events, "Ref.Des.");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].details.as_deref(), Some("Removed Ref.Des.: R1, R2"));
    }

    #[test]
    fn interruption_splits_batches() {
        let events = vec![
            cleared(1, "2024-01-01T10:00:00Z", "A", Some("R1 → X")),
            updated(2, "2024-01-01T10:00:00Z"),
            cleared(3, "2024-01-01T10:00:00Z", "A", Some("R2 → Y")),
        ];
        let groups = group_events(events, "F/N");
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].details.as_deref(), Some("Removed F/N: R1"));
        assert_eq!(groups[2].details.as_deref(), Some("Removed F/N: R2"));
    }

    #[test]
    fn different_second_or_actor_splits_batches() {
        let events = vec![
            cleared(1, "2024-01-01T10:00:01Z", "A", Some("R1 → X")),
            cleared(2, "2024-01-01T10:00:00Z", "A", Some("R2 → Y")),
            cleared(3, "2024-01-01T10:00:00Z", "B", Some("R3 → Z")),
        ];
        let groups = group_events(events, "F/N");
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn same_name_different_user_ids_split() {
        let mut first = cleared(1, "2024-01-01T10:00:00Z", "A", Some("R1 → X"));
        let mut second = cleared(2, "2024-01-01T10:00:00Z", "A", Some("R2 → Y"));
        first.actor = actor("A", Some(1));
        second.actor = actor("A", Some(2));
        let groups = group_events(vec![first, second], "F/N");
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn missing_old_values_fall_back_to_row_count() {
        let events = vec![
            cleared(1, "2024-01-01T10:00:00Z", "A", None),
            cleared(2, "2024-01-01T10:00:00Z", "A", None),
        ];
        let groups = group_events(events, "F/N");
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups[0].details.as_deref(),
            Some("2 row(s) removed from BOM")
        );
    }

    #[test]
    fn partial_old_values_still_count_rows() {
        let events = vec![
            cleared(1, "2024-01-01T10:00:00Z", "A", None),
            cleared(2, "2024-01-01T10:00:00Z", "A", Some("C4 → Cap")),
        ];
        let groups = group_events(events, "F/N");
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[0].details.as_deref(), Some("Removed F/N: C4"));
    }

    #[test]
    fn flatten_preserves_count_and_order() {
        let events = vec![
            updated(1, "2024-01-01T11:00:00Z"),
            cleared(2, "2024-01-01T10:00:00Z", "A", Some("R1 → X")),
            cleared(3, "2024-01-01T10:00:00Z", "A", Some("R2 → Y")),
            cleared(4, "2024-01-01T09:00:00Z", "A", None),
            updated(5, "2024-01-01T08:00:00Z"),
        ];
        let ids: Vec<i64> = events.iter().map(|e| e.id).collect();

        let groups = group_events(events, "F/N");
        let flattened: Vec<i64> = flatten(&groups).iter().map(|e| e.id).collect();

        assert_eq!(flattened, ids);
        assert_eq!(groups.len(), 4);
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(group_events(Vec::new(), "F/N").is_empty());
    }
}
