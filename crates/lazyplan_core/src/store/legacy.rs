//! Tolerant decoding of the on-disk document, including older layouts.
//!
//! # Responsibility
//! - Decode each collection record by record, in file order.
//! - Drop fields from superseded layouts (direct attachment foreign keys).
//! - Fill defaults for fields older files never wrote.
//!
//! # Invariants
//! - Decoding stops at the first malformed record; records decoded before it
//!   are kept and the error is reported alongside them.
//! - Tags are normalized as they are read.

use super::{Sequences, Store, StoreError, StoreResult};
use crate::model::entity::{DependentNote, Event, Goal, Link, Note, Todo, DEFAULT_PRIORITY};
use crate::model::kind::{EntityId, EntityKind};
use crate::model::tags::normalize_tags;
use crate::model::timestamp;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Decoding result: whatever was read, plus the error that stopped it.
pub(crate) struct Decoded {
    pub store: Store,
    pub error: Option<StoreError>,
}

pub(crate) fn decode_store(text: &str) -> Decoded {
    let mut store = Store::default();
    let document: Map<String, Value> = match serde_json::from_str(text) {
        Ok(document) => document,
        Err(err) => {
            return Decoded {
                store,
                error: Some(err.into()),
            }
        }
    };

    let error = decode_into(&document, &mut store).err();
    Decoded { store, error }
}

fn decode_into(document: &Map<String, Value>, store: &mut Store) -> StoreResult<()> {
    let loaded_at = timestamp::now();

    for value in collection(document, "notes")? {
        store.notes.push(StoredNote::deserialize(value)?.into_note(loaded_at));
    }
    for value in collection(document, "dependent_notes")? {
        store
            .dependent_notes
            .push(StoredDependentNote::deserialize(value)?.into_note(loaded_at));
    }
    for value in collection(document, "todos")? {
        store
            .todos
            .push(StoredTodo::deserialize(value)?.into_todo(loaded_at));
    }
    for value in collection(document, "goals")? {
        store
            .goals
            .push(StoredGoal::deserialize(value)?.into_goal(loaded_at));
    }
    for value in collection(document, "events")? {
        store.events.push(StoredEvent::deserialize(value)?.into_event());
    }
    for value in collection(document, "links")? {
        store
            .links
            .push(StoredLink::deserialize(value)?.into_link(loaded_at));
    }

    if let Some(value) = document.get("sequences").filter(|value| !value.is_null()) {
        store.sequences = Sequences::deserialize(value)?;
    }

    Ok(())
}

fn collection<'doc>(document: &'doc Map<String, Value>, key: &str) -> StoreResult<&'doc [Value]> {
    match document.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(StoreError::InvalidData(format!("`{key}` must be a list"))),
    }
}

// Unknown keys (`attached_to_goal_id`, `attached_todo_ids`, ...) are ignored by
// serde, which is how superseded attachment fields are dropped.

#[derive(Deserialize)]
struct StoredNote {
    id: EntityId,
    title: String,
    #[serde(rename = "type", default)]
    note_type: String,
    #[serde(default, with = "timestamp::option")]
    created_at: Option<NaiveDateTime>,
    #[serde(default)]
    content: String,
}

impl StoredNote {
    fn into_note(self, loaded_at: NaiveDateTime) -> Note {
        Note {
            id: self.id,
            title: self.title,
            note_type: self.note_type,
            created_at: self.created_at.unwrap_or(loaded_at),
            content: self.content,
        }
    }
}

#[derive(Deserialize)]
struct StoredDependentNote {
    id: EntityId,
    title: String,
    #[serde(default)]
    content: String,
    parent_type: EntityKind,
    parent_id: EntityId,
    #[serde(default, with = "timestamp::option")]
    created_at: Option<NaiveDateTime>,
}

impl StoredDependentNote {
    fn into_note(self, loaded_at: NaiveDateTime) -> DependentNote {
        DependentNote {
            id: self.id,
            title: self.title,
            content: self.content,
            parent_type: self.parent_type,
            parent_id: self.parent_id,
            created_at: self.created_at.unwrap_or(loaded_at),
        }
    }
}

fn default_priority() -> u8 {
    DEFAULT_PRIORITY
}

#[derive(Deserialize)]
struct StoredTodo {
    id: EntityId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_priority")]
    priority: u8,
    #[serde(default, with = "timestamp::option")]
    due_date: Option<NaiveDateTime>,
    #[serde(default)]
    completed: bool,
    #[serde(default, with = "timestamp::option")]
    start_date: Option<NaiveDateTime>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default, with = "timestamp::option")]
    created_at: Option<NaiveDateTime>,
}

impl StoredTodo {
    fn into_todo(self, loaded_at: NaiveDateTime) -> Todo {
        Todo {
            id: self.id,
            title: self.title,
            description: self.description,
            priority: self.priority,
            due_date: self.due_date,
            completed: self.completed,
            start_date: self.start_date,
            tags: normalize_tags(&self.tags),
            created_at: self.created_at.unwrap_or(loaded_at),
        }
    }
}

#[derive(Deserialize)]
struct StoredGoal {
    id: EntityId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_priority")]
    priority: u8,
    #[serde(default, with = "timestamp::option")]
    due_date: Option<NaiveDateTime>,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default, with = "timestamp::option")]
    created_at: Option<NaiveDateTime>,
}

impl StoredGoal {
    fn into_goal(self, loaded_at: NaiveDateTime) -> Goal {
        Goal {
            id: self.id,
            title: self.title,
            description: self.description,
            priority: self.priority,
            due_date: self.due_date,
            completed: self.completed,
            tags: normalize_tags(&self.tags),
            created_at: self.created_at.unwrap_or(loaded_at),
        }
    }
}

/// Older files stored a single `date` per event instead of a window.
#[derive(Deserialize)]
struct StoredEvent {
    id: EntityId,
    title: String,
    #[serde(alias = "date", with = "timestamp")]
    start: NaiveDateTime,
    #[serde(default, with = "timestamp::option")]
    end: Option<NaiveDateTime>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<String>,
}

impl StoredEvent {
    fn into_event(self) -> Event {
        Event {
            id: self.id,
            title: self.title,
            start: self.start,
            end: self.end.unwrap_or(self.start),
            description: self.description,
            tags: normalize_tags(&self.tags),
        }
    }
}

#[derive(Deserialize)]
struct StoredLink {
    id: EntityId,
    from_type: EntityKind,
    from_id: EntityId,
    to_type: EntityKind,
    to_id: EntityId,
    #[serde(default, with = "timestamp::option")]
    created_at: Option<NaiveDateTime>,
}

impl StoredLink {
    fn into_link(self, loaded_at: NaiveDateTime) -> Link {
        Link {
            id: self.id,
            from_type: self.from_type,
            from_id: self.from_id,
            to_type: self.to_type,
            to_id: self.to_id,
            created_at: self.created_at.unwrap_or(loaded_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::decode_store;
    use crate::model::kind::EntityKind;

    #[test]
    fn legacy_attachment_fields_are_dropped() {
        let decoded = decode_store(
            r#"{
                "todos": [{
                    "id": 1, "title": "Pack", "description": "", "priority": 2,
                    "due_date": null, "completed": false, "tags": ["Move", "move"],
                    "created_at": "2026-01-05T10:00:00",
                    "attached_to_goal_id": 3, "attached_to_todo_id": null
                }],
                "goals": [{
                    "id": 3, "title": "Move", "description": "", "priority": 4,
                    "due_date": null, "completed": false, "tags": [],
                    "created_at": "2026-01-05T10:00:00",
                    "attached_todo_ids": [1], "attached_goal_ids": [], "attached_event_ids": []
                }]
            }"#,
        );
        assert!(decoded.error.is_none());
        assert_eq!(decoded.store.todos[0].tags, vec!["move".to_string()]);
        assert_eq!(decoded.store.goals[0].priority, 4);
        assert!(decoded.store.links.is_empty());
    }

    #[test]
    fn legacy_event_date_becomes_window() {
        let decoded = decode_store(
            r#"{"events": [{"id": 2, "title": "Dentist", "date": "2026-02-01T09:00:00",
                "description": "", "tags": [], "attached_to_goal_id": null}]}"#,
        );
        assert!(decoded.error.is_none());
        let event = &decoded.store.events[0];
        assert_eq!(event.start, event.end);
    }

    #[test]
    fn stops_at_first_bad_record_and_keeps_earlier_ones() {
        let decoded = decode_store(
            r#"{
                "notes": [
                    {"id": 1, "title": "ok", "type": "idea", "created_at": "2026-01-01T00:00:00", "content": ""},
                    {"id": 2, "title": "bad", "type": "idea", "created_at": "not a date", "content": ""}
                ],
                "todos": [{"id": 1, "title": "never read"}]
            }"#,
        );
        assert!(decoded.error.is_some());
        assert_eq!(decoded.store.notes.len(), 1);
        assert!(decoded.store.todos.is_empty());
    }

    #[test]
    fn dependent_note_parent_kind_is_typed() {
        let decoded = decode_store(
            r#"{"dependent_notes": [{"id": 1, "title": "t", "content": "c",
                "parent_type": "goal", "parent_id": 9, "created_at": "2026-01-01T00:00:00"}]}"#,
        );
        assert!(decoded.error.is_none());
        assert_eq!(decoded.store.dependent_notes[0].parent_type, EntityKind::Goal);
    }

    #[test]
    fn non_object_document_is_an_error() {
        let decoded = decode_store("[1, 2, 3]");
        assert!(decoded.error.is_some());
        assert_eq!(decoded.store.counts().todos, 0);
    }
}
