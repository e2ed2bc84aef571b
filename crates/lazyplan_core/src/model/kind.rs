//! Entity kind tags and polymorphic entity references.
//!
//! # Responsibility
//! - Name the four linkable entity kinds with one closed enum.
//! - Provide the `(kind, id)` key shared by links and dependent-note parents.
//!
//! # Invariants
//! - Kinds serialize as lowercase strings (`event|todo|goal|note`).
//! - Parsing is case-insensitive and ignores surrounding whitespace.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Integer identifier, unique within one entity kind.
pub type EntityId = u64;

/// Kind tag for every entity that can be a link endpoint or a parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Calendar entry with a time window.
    Event,
    /// Actionable item with priority and completion state.
    Todo,
    /// Aggregation root for related todos, events and subgoals.
    Goal,
    /// Standalone free-form note.
    Note,
}

impl EntityKind {
    /// All kinds in canonical order.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Event,
        EntityKind::Todo,
        EntityKind::Goal,
        EntityKind::Note,
    ];

    /// Wire name used in the data file and tool arguments.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Todo => "todo",
            Self::Goal => "goal",
            Self::Note => "note",
        }
    }

    /// Capitalized name for user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Event => "Event",
            Self::Todo => "Todo",
            Self::Goal => "Goal",
            Self::Note => "Note",
        }
    }

    /// Whether deleting an entity of this kind also deletes its dependent notes.
    ///
    /// Standalone notes keep their dependent notes on deletion.
    pub fn cascades_dependent_notes(self) -> bool {
        !matches!(self, Self::Note)
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when text does not name a known entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKindError(pub String);

impl Display for ParseKindError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown entity type `{}`; expected event|todo|goal|note",
            self.0
        )
    }
}

impl Error for ParseKindError {}

impl FromStr for EntityKind {
    type Err = ParseKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "event" => Ok(Self::Event),
            "todo" => Ok(Self::Todo),
            "goal" => Ok(Self::Goal),
            "note" => Ok(Self::Note),
            _ => Err(ParseKindError(value.to_string())),
        }
    }
}

/// Typed reference to one entity: the sum-type key of the link graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub id: EntityId,
}

impl EntityRef {
    pub fn new(kind: EntityKind, id: EntityId) -> Self {
        Self { kind, id }
    }

    pub fn event(id: EntityId) -> Self {
        Self::new(EntityKind::Event, id)
    }

    pub fn todo(id: EntityId) -> Self {
        Self::new(EntityKind::Todo, id)
    }

    pub fn goal(id: EntityId) -> Self {
        Self::new(EntityKind::Goal, id)
    }

    pub fn note(id: EntityId) -> Self {
        Self::new(EntityKind::Note, id)
    }
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::{EntityKind, EntityRef};

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(" Todo ".parse::<EntityKind>().unwrap(), EntityKind::Todo);
        assert_eq!("GOAL".parse::<EntityKind>().unwrap(), EntityKind::Goal);
        assert!("subtask".parse::<EntityKind>().is_err());
    }

    #[test]
    fn only_notes_keep_dependents_on_delete() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.cascades_dependent_notes(), kind != EntityKind::Note);
        }
    }

    #[test]
    fn entity_ref_serializes_with_type_key() {
        let value = serde_json::to_value(EntityRef::goal(4)).unwrap();
        assert_eq!(value, serde_json::json!({"type": "goal", "id": 4}));
    }
}
