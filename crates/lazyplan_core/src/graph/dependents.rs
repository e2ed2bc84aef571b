//! Dependent notes: notes that only exist while their parent does.

use super::GraphError;
use crate::model::entity::DependentNote;
use crate::model::kind::{EntityId, EntityRef};
use crate::store::{remove_by_id, Store};

impl Store {
    /// Attaches a new note to `parent`.
    ///
    /// # Errors
    /// - `GraphError::ParentNotFound` when `parent` does not resolve.
    pub fn add_dependent_note(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        parent: EntityRef,
    ) -> Result<DependentNote, GraphError> {
        if !self.contains(parent) {
            return Err(GraphError::ParentNotFound(parent));
        }

        let note = DependentNote::new(self.next_dependent_note_id()?, title, content, parent);
        self.dependent_notes.push(note.clone());
        Ok(note)
    }

    /// Dependent notes of one parent, in storage order.
    pub fn dependent_notes_of(&self, parent: EntityRef) -> Vec<&DependentNote> {
        self.dependent_notes
            .iter()
            .filter(|note| note.parent() == parent)
            .collect()
    }

    /// All dependent notes, or only those of `parent` when given.
    pub fn find_dependent_notes(&self, parent: Option<EntityRef>) -> Vec<&DependentNote> {
        match parent {
            Some(parent) => self.dependent_notes_of(parent),
            None => self.dependent_notes.iter().collect(),
        }
    }

    /// Replaces the supplied fields of one dependent note.
    pub fn update_dependent_note(
        &mut self,
        note_id: EntityId,
        title: Option<String>,
        content: Option<String>,
    ) -> Option<&DependentNote> {
        let note = self.dependent_note_mut(note_id)?;
        if let Some(title) = title {
            note.title = title;
        }
        if let Some(content) = content {
            note.content = content;
        }
        Some(&*note)
    }

    /// Removes one dependent note. Returns whether it existed.
    pub fn delete_dependent_note(&mut self, note_id: EntityId) -> bool {
        remove_by_id(&mut self.dependent_notes, note_id)
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::GraphError;
    use crate::model::entity::{Note, Todo};
    use crate::model::kind::EntityRef;
    use crate::store::Store;

    #[test]
    fn missing_parent_is_rejected_with_reference() {
        let mut store = Store::new();
        let err = store
            .add_dependent_note("t", "c", EntityRef::todo(7))
            .unwrap_err();
        assert_eq!(err, GraphError::ParentNotFound(EntityRef::todo(7)));
        assert_eq!(err.to_string(), "todo with id 7 not found");
        assert!(store.dependent_notes().is_empty());
    }

    #[test]
    fn note_parent_resolves_against_standalone_notes() {
        let mut store = Store::new();
        store.notes.push(Note::new(3, "Ideas", "idea", ""));
        let note = store
            .add_dependent_note("follow-up", "", EntityRef::note(3))
            .unwrap();
        assert_eq!(note.parent(), EntityRef::note(3));
    }

    #[test]
    fn filter_matches_kind_and_id() {
        let mut store = Store::new();
        store.todos.push(Todo::new(1, "a"));
        store.notes.push(Note::new(1, "b", "idea", ""));
        store
            .add_dependent_note("on todo", "", EntityRef::todo(1))
            .unwrap();
        store
            .add_dependent_note("on note", "", EntityRef::note(1))
            .unwrap();

        let on_todo = store.find_dependent_notes(Some(EntityRef::todo(1)));
        assert_eq!(on_todo.len(), 1);
        assert_eq!(on_todo[0].title, "on todo");
        assert_eq!(store.find_dependent_notes(None).len(), 2);
    }

    #[test]
    fn update_changes_only_supplied_fields() {
        let mut store = Store::new();
        store.todos.push(Todo::new(1, "a"));
        let created = store
            .add_dependent_note("title", "content", EntityRef::todo(1))
            .unwrap();

        let updated = store
            .update_dependent_note(created.id, None, Some("new content".to_string()))
            .unwrap();
        assert_eq!(updated.title, "title");
        assert_eq!(updated.content, "new content");
        assert!(store.update_dependent_note(99, None, None).is_none());
    }
}
