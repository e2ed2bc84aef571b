//! Entity records: events, todos, goals, notes, dependent notes and links.
//!
//! # Responsibility
//! - Define the field contracts of every persisted record.
//! - Provide constructors that fill construction-time defaults.
//!
//! # Invariants
//! - `id` is unique within one kind and never reused.
//! - `tags` are stored normalized (see `model::tags`).
//! - Records carry no relationship fields; relationships live in `Link`.

use crate::model::kind::{EntityId, EntityKind, EntityRef};
use crate::model::tags::normalize_tags;
use crate::model::timestamp;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Default priority for new todos and goals (1 = low, 5 = high).
pub const DEFAULT_PRIORITY: u8 = 3;

/// Records addressable by an integer id inside their own arena.
pub trait Identified {
    fn id(&self) -> EntityId;
}

/// Calendar event with a time window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EntityId,
    pub title: String,
    #[serde(with = "timestamp")]
    pub start: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub end: NaiveDateTime,
    pub description: String,
    pub tags: Vec<String>,
}

impl Event {
    pub fn new(
        id: EntityId,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            start,
            end,
            description: String::new(),
            tags: Vec::new(),
        }
    }
}

/// Actionable item. `priority` follows the 1..=5 convention but is not clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub priority: u8,
    #[serde(with = "timestamp::option")]
    pub due_date: Option<NaiveDateTime>,
    pub completed: bool,
    #[serde(with = "timestamp::option")]
    pub start_date: Option<NaiveDateTime>,
    pub tags: Vec<String>,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
}

impl Todo {
    pub fn new(id: EntityId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            priority: DEFAULT_PRIORITY,
            due_date: None,
            completed: false,
            start_date: None,
            tags: Vec::new(),
            created_at: timestamp::now(),
        }
    }
}

/// Goal: aggregation root for linked todos, events and subgoals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub priority: u8,
    #[serde(with = "timestamp::option")]
    pub due_date: Option<NaiveDateTime>,
    pub completed: bool,
    pub tags: Vec<String>,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
}

impl Goal {
    pub fn new(id: EntityId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            priority: DEFAULT_PRIORITY,
            due_date: None,
            completed: false,
            tags: Vec::new(),
            created_at: timestamp::now(),
        }
    }
}

/// Standalone note. `note_type` is free-form (e.g. "journal", "idea").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: EntityId,
    pub title: String,
    #[serde(rename = "type")]
    pub note_type: String,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    pub content: String,
}

impl Note {
    pub fn new(
        id: EntityId,
        title: impl Into<String>,
        note_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            note_type: note_type.into(),
            created_at: timestamp::now(),
            content: content.into(),
        }
    }
}

/// Note bound to a parent entity.
///
/// Creation requires a resolvable parent; deleting an event/todo/goal parent
/// deletes the note with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentNote {
    pub id: EntityId,
    pub title: String,
    pub content: String,
    pub parent_type: EntityKind,
    pub parent_id: EntityId,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
}

impl DependentNote {
    pub fn new(
        id: EntityId,
        title: impl Into<String>,
        content: impl Into<String>,
        parent: EntityRef,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            parent_type: parent.kind,
            parent_id: parent.id,
            created_at: timestamp::now(),
        }
    }

    pub fn parent(&self) -> EntityRef {
        EntityRef::new(self.parent_type, self.parent_id)
    }
}

/// Directed, typed edge between two entities of any kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: EntityId,
    pub from_type: EntityKind,
    pub from_id: EntityId,
    pub to_type: EntityKind,
    pub to_id: EntityId,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
}

impl Link {
    pub fn new(id: EntityId, from: EntityRef, to: EntityRef) -> Self {
        Self {
            id,
            from_type: from.kind,
            from_id: from.id,
            to_type: to.kind,
            to_id: to.id,
            created_at: timestamp::now(),
        }
    }

    pub fn source(&self) -> EntityRef {
        EntityRef::new(self.from_type, self.from_id)
    }

    pub fn target(&self) -> EntityRef {
        EntityRef::new(self.to_type, self.to_id)
    }

    /// Whether `entity` is either endpoint (kind and id must both match).
    pub fn touches(&self, entity: EntityRef) -> bool {
        self.source() == entity || self.target() == entity
    }
}

macro_rules! impl_identified {
    ($($record:ty),+ $(,)?) => {
        $(
            impl Identified for $record {
                fn id(&self) -> EntityId {
                    self.id
                }
            }
        )+
    };
}

impl_identified!(Event, Todo, Goal, Note, DependentNote, Link);

/// Records that carry a normalized tag list.
pub trait Tagged {
    fn tags(&self) -> &[String];
    fn set_tags(&mut self, tags: &[String]);
}

macro_rules! impl_tagged {
    ($($record:ty),+ $(,)?) => {
        $(
            impl Tagged for $record {
                fn tags(&self) -> &[String] {
                    &self.tags
                }

                fn set_tags(&mut self, tags: &[String]) {
                    self.tags = normalize_tags(tags);
                }
            }
        )+
    };
}

impl_tagged!(Event, Todo, Goal);

#[cfg(test)]
mod tests {
    use super::{Link, Tagged, Todo, DEFAULT_PRIORITY};
    use crate::model::kind::EntityRef;

    #[test]
    fn new_todo_uses_defaults() {
        let todo = Todo::new(1, "Pack boxes");
        assert_eq!(todo.priority, DEFAULT_PRIORITY);
        assert!(!todo.completed);
        assert!(todo.due_date.is_none());
    }

    #[test]
    fn set_tags_normalizes() {
        let mut todo = Todo::new(1, "Pay rent");
        todo.set_tags(&["Rent".to_string(), " rent".to_string()]);
        assert_eq!(todo.tags(), ["rent".to_string()]);
    }

    #[test]
    fn link_touch_requires_kind_and_id_match() {
        let link = Link::new(1, EntityRef::goal(3), EntityRef::todo(7));
        assert!(link.touches(EntityRef::goal(3)));
        assert!(link.touches(EntityRef::todo(7)));
        assert!(!link.touches(EntityRef::todo(3)));
        assert!(!link.touches(EntityRef::event(7)));
    }

    #[test]
    fn optional_dates_serialize_as_null() {
        let value = serde_json::to_value(Todo::new(2, "x")).unwrap();
        assert!(value["due_date"].is_null());
        assert!(value["start_date"].is_null());
    }
}
