//! In-memory entity store and its persistence boundary.
//!
//! # Responsibility
//! - Own the six entity arenas (notes, dependent notes, todos, goals, events,
//!   links) and per-kind id sequences.
//! - Resolve `(kind, id)` references against the right arena.
//! - Define the backend contract used to load/save the whole store.
//!
//! # Invariants
//! - Arenas keep insertion order; queries return storage order.
//! - A new id is `max(existing ids, high-water mark) + 1`; ids never repeat.
//! - Nothing outside this crate can mutate arenas except through `Store` APIs.
//!
//! # See also
//! - `graph` for link traversal and cascade deletion.

use crate::model::entity::{DependentNote, Event, Goal, Identified, Link, Note, Todo};
use crate::model::kind::{EntityId, EntityKind, EntityRef};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod backend;
mod legacy;

pub use backend::{JsonFileBackend, LoadOutcome, LoadStatus, MemoryBackend, StoreBackend};

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence-layer error.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// Document parsed but does not have the expected shape.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid store data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Every id of one arena has already been handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdsExhausted(pub &'static str);

impl Display for IdsExhausted {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "no {} ids left to allocate", self.0)
    }
}

impl Error for IdsExhausted {}

/// Highest id ever allocated per arena.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sequences {
    pub notes: EntityId,
    pub dependent_notes: EntityId,
    pub todos: EntityId,
    pub goals: EntityId,
    pub events: EntityId,
    pub links: EntityId,
}

/// Entity counts, reported after a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub notes: usize,
    pub dependent_notes: usize,
    pub todos: usize,
    pub goals: usize,
    pub events: usize,
    pub links: usize,
}

/// Whole in-memory state. Field order is the on-disk key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Store {
    pub(crate) notes: Vec<Note>,
    pub(crate) dependent_notes: Vec<DependentNote>,
    pub(crate) todos: Vec<Todo>,
    pub(crate) goals: Vec<Goal>,
    pub(crate) events: Vec<Event>,
    pub(crate) links: Vec<Link>,
    pub(crate) sequences: Sequences,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn dependent_notes(&self) -> &[DependentNote] {
        &self.dependent_notes
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn counts(&self) -> StoreCounts {
        StoreCounts {
            notes: self.notes.len(),
            dependent_notes: self.dependent_notes.len(),
            todos: self.todos.len(),
            goals: self.goals.len(),
            events: self.events.len(),
            links: self.links.len(),
        }
    }

    pub fn note(&self, id: EntityId) -> Option<&Note> {
        find(&self.notes, id)
    }

    pub fn dependent_note(&self, id: EntityId) -> Option<&DependentNote> {
        find(&self.dependent_notes, id)
    }

    pub fn todo(&self, id: EntityId) -> Option<&Todo> {
        find(&self.todos, id)
    }

    pub fn goal(&self, id: EntityId) -> Option<&Goal> {
        find(&self.goals, id)
    }

    pub fn event(&self, id: EntityId) -> Option<&Event> {
        find(&self.events, id)
    }

    pub fn link(&self, id: EntityId) -> Option<&Link> {
        find(&self.links, id)
    }

    pub(crate) fn note_mut(&mut self, id: EntityId) -> Option<&mut Note> {
        find_mut(&mut self.notes, id)
    }

    pub(crate) fn dependent_note_mut(&mut self, id: EntityId) -> Option<&mut DependentNote> {
        find_mut(&mut self.dependent_notes, id)
    }

    pub(crate) fn todo_mut(&mut self, id: EntityId) -> Option<&mut Todo> {
        find_mut(&mut self.todos, id)
    }

    pub(crate) fn goal_mut(&mut self, id: EntityId) -> Option<&mut Goal> {
        find_mut(&mut self.goals, id)
    }

    pub(crate) fn event_mut(&mut self, id: EntityId) -> Option<&mut Event> {
        find_mut(&mut self.events, id)
    }

    /// Resolves a reference to the display title of the entity it names.
    ///
    /// `note` references resolve against standalone notes.
    pub fn title_of(&self, entity: EntityRef) -> Option<&str> {
        match entity.kind {
            EntityKind::Event => self.event(entity.id).map(|item| item.title.as_str()),
            EntityKind::Todo => self.todo(entity.id).map(|item| item.title.as_str()),
            EntityKind::Goal => self.goal(entity.id).map(|item| item.title.as_str()),
            EntityKind::Note => self.note(entity.id).map(|item| item.title.as_str()),
        }
    }

    /// Whether a reference resolves to a live entity.
    pub fn contains(&self, entity: EntityRef) -> bool {
        self.title_of(entity).is_some()
    }

    pub(crate) fn next_note_id(&mut self) -> Result<EntityId, IdsExhausted> {
        allocate(&self.notes, &mut self.sequences.notes, "note")
    }

    pub(crate) fn next_dependent_note_id(&mut self) -> Result<EntityId, IdsExhausted> {
        allocate(&self.dependent_notes, &mut self.sequences.dependent_notes, "dependent note")
    }

    pub(crate) fn next_todo_id(&mut self) -> Result<EntityId, IdsExhausted> {
        allocate(&self.todos, &mut self.sequences.todos, "todo")
    }

    pub(crate) fn next_goal_id(&mut self) -> Result<EntityId, IdsExhausted> {
        allocate(&self.goals, &mut self.sequences.goals, "goal")
    }

    pub(crate) fn next_event_id(&mut self) -> Result<EntityId, IdsExhausted> {
        allocate(&self.events, &mut self.sequences.events, "event")
    }

    pub(crate) fn next_link_id(&mut self) -> Result<EntityId, IdsExhausted> {
        allocate(&self.links, &mut self.sequences.links, "link")
    }

    /// Serializes the full store as the on-disk JSON document.
    pub fn to_json(&self) -> StoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn find<T: Identified>(items: &[T], id: EntityId) -> Option<&T> {
    items.iter().find(|item| item.id() == id)
}

fn find_mut<T: Identified>(items: &mut [T], id: EntityId) -> Option<&mut T> {
    items.iter_mut().find(|item| item.id() == id)
}

fn allocate<T: Identified>(
    items: &[T],
    high_water: &mut EntityId,
    arena: &'static str,
) -> Result<EntityId, IdsExhausted> {
    let max_existing = items.iter().map(Identified::id).max().unwrap_or(0);
    let next = max_existing
        .max(*high_water)
        .checked_add(1)
        .ok_or(IdsExhausted(arena))?;
    *high_water = next;
    Ok(next)
}

pub(crate) fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: EntityId) -> bool {
    match items.iter().position(|item| item.id() == id) {
        Some(index) => {
            items.remove(index);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{IdsExhausted, Store};
    use crate::model::entity::Todo;
    use crate::model::kind::EntityId;

    #[test]
    fn first_id_is_one() {
        let mut store = Store::new();
        assert_eq!(store.next_todo_id(), Ok(1));
    }

    #[test]
    fn ids_follow_max_existing_even_with_gaps() {
        let mut store = Store::new();
        store.todos.push(Todo::new(4, "imported"));
        assert_eq!(store.next_todo_id(), Ok(5));
    }

    #[test]
    fn deleted_max_id_is_not_reused() {
        let mut store = Store::new();
        let id = store.next_todo_id().unwrap();
        store.todos.push(Todo::new(id, "short lived"));
        assert!(super::remove_by_id(&mut store.todos, id));
        assert_eq!(store.next_todo_id(), Ok(id + 1));
    }

    #[test]
    fn exhausted_id_space_is_an_error_not_a_wrap() {
        let mut store = Store::new();
        store.todos.push(Todo::new(EntityId::MAX, "last"));

        assert_eq!(store.next_todo_id(), Err(IdsExhausted("todo")));
        assert_eq!(store.sequences.todos, 0);
        assert_eq!(store.next_goal_id(), Ok(1));
    }
}
