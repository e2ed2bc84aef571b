//! Read projections returned by the facade.
//!
//! Entity views flatten the stored record and append its dependent notes under
//! `notes`; the key is omitted when there are none.

use crate::model::entity::{DependentNote, Event, Goal, Link, Todo};
use crate::model::kind::{EntityId, EntityKind, EntityRef};
use crate::store::Store;
use serde::Serialize;

/// Dependent note as embedded in its parent's view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachedNote {
    pub id: EntityId,
    pub title: String,
    pub content: String,
}

impl From<&DependentNote> for AttachedNote {
    fn from(note: &DependentNote) -> Self {
        Self {
            id: note.id,
            title: note.title.clone(),
            content: note.content.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventView {
    #[serde(flatten)]
    pub event: Event,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<AttachedNote>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoView {
    #[serde(flatten)]
    pub todo: Todo,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<AttachedNote>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalView {
    #[serde(flatten)]
    pub goal: Goal,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<AttachedNote>,
}

/// Goal with everything its outgoing links point at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalDetails {
    #[serde(flatten)]
    pub goal: GoalView,
    pub todos: Vec<TodoView>,
    pub events: Vec<EventView>,
    pub sub_goals: Vec<GoalView>,
}

/// Cross-kind tag search result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagSearchResults {
    pub todos: Vec<TodoView>,
    pub goals: Vec<GoalView>,
    pub events: Vec<EventView>,
}

impl TagSearchResults {
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty() && self.goals.is_empty() && self.events.is_empty()
    }
}

/// Result of a named link operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
    /// Endpoints that did not resolve.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<EntityRef>,
}

impl LinkOutcome {
    pub(crate) fn linked(link: Link, message: String) -> Self {
        Self {
            success: true,
            message,
            link: Some(link),
            missing: Vec::new(),
        }
    }

    /// Failure naming every endpoint that is absent, e.g. "Todo 3 and Goal 9 not found".
    pub(crate) fn not_found(missing: Vec<EntityRef>) -> Self {
        let names = missing
            .iter()
            .map(|entity| format!("{} {}", entity.kind.label(), entity.id))
            .collect::<Vec<_>>()
            .join(" and ");
        Self {
            success: false,
            message: format!("{names} not found"),
            link: None,
            missing,
        }
    }
}

fn attached(store: &Store, parent: EntityRef) -> Vec<AttachedNote> {
    store
        .dependent_notes_of(parent)
        .into_iter()
        .map(AttachedNote::from)
        .collect()
}

pub(crate) fn event_view(store: &Store, event: &Event) -> EventView {
    EventView {
        event: event.clone(),
        notes: attached(store, EntityRef::new(EntityKind::Event, event.id)),
    }
}

pub(crate) fn todo_view(store: &Store, todo: &Todo) -> TodoView {
    TodoView {
        todo: todo.clone(),
        notes: attached(store, EntityRef::new(EntityKind::Todo, todo.id)),
    }
}

pub(crate) fn goal_view(store: &Store, goal: &Goal) -> GoalView {
    GoalView {
        goal: goal.clone(),
        notes: attached(store, EntityRef::new(EntityKind::Goal, goal.id)),
    }
}

#[cfg(test)]
mod tests {
    use super::{todo_view, LinkOutcome};
    use crate::model::entity::Todo;
    use crate::model::kind::EntityRef;
    use crate::store::Store;

    #[test]
    fn view_omits_notes_key_when_empty() {
        let store = Store::new();
        let value = serde_json::to_value(todo_view(&store, &Todo::new(1, "Pack"))).unwrap();
        assert_eq!(value["title"], "Pack");
        assert!(value.get("notes").is_none());
    }

    #[test]
    fn not_found_message_names_each_missing_endpoint() {
        let outcome = LinkOutcome::not_found(vec![EntityRef::todo(3), EntityRef::goal(9)]);
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Todo 3 and Goal 9 not found");
    }
}
