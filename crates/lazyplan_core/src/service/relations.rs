//! Link and dependent-note operations on the facade.

use super::error::ServiceResult;
use super::planner::Planner;
use super::requests::DependentNotePatch;
use super::views::LinkOutcome;
use crate::graph::LinkedItems;
use crate::model::entity::{DependentNote, Link};
use crate::model::kind::{EntityId, EntityRef};
use crate::store::StoreBackend;
use log::{info, warn};

impl<B: StoreBackend> Planner<B> {
    pub fn links_from(&self, entity: EntityRef) -> Vec<Link> {
        self.store.links_from(entity)
    }

    pub fn links_to(&self, entity: EntityRef) -> Vec<Link> {
        self.store.links_to(entity)
    }

    pub fn linked_items(&self, entity: EntityRef) -> LinkedItems {
        self.store.linked_items(entity)
    }

    /// Creates a link without checking endpoints.
    pub fn create_link(&mut self, from: EntityRef, to: EntityRef) -> ServiceResult<Link> {
        let link = self.store.create_link(from, to)?;
        self.save()?;

        info!(
            "event=link_create module=service status=ok link_id={} from={} to={}",
            link.id,
            link.source(),
            link.target()
        );
        Ok(link)
    }

    pub fn delete_link(&mut self, link_id: EntityId) -> ServiceResult<bool> {
        if !self.store.delete_link(link_id) {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Removes the first link matching `(from, to)`. Returns whether one existed.
    pub fn unlink_items(&mut self, from: EntityRef, to: EntityRef) -> ServiceResult<bool> {
        let Some(link_id) = self.store.find_link(from, to).map(|link| link.id) else {
            return Ok(false);
        };
        self.delete_link(link_id)
    }

    /// Stores `goal -> todo`.
    pub fn link_todo_to_goal(
        &mut self,
        todo_id: EntityId,
        goal_id: EntityId,
    ) -> ServiceResult<LinkOutcome> {
        let (todo, goal) = (EntityRef::todo(todo_id), EntityRef::goal(goal_id));
        self.link_checked(goal, todo, [todo, goal], |titles| {
            format!("Linked todo '{}' to goal '{}'", titles[0], titles[1])
        })
    }

    /// Stores `parent -> subtask`.
    pub fn link_todo_to_todo(
        &mut self,
        parent_todo_id: EntityId,
        subtask_id: EntityId,
    ) -> ServiceResult<LinkOutcome> {
        let (parent, subtask) = (EntityRef::todo(parent_todo_id), EntityRef::todo(subtask_id));
        self.link_checked(parent, subtask, [parent, subtask], |titles| {
            format!("Linked '{}' as subtask of '{}'", titles[1], titles[0])
        })
    }

    /// Stores `goal -> event`.
    pub fn link_event_to_goal(
        &mut self,
        event_id: EntityId,
        goal_id: EntityId,
    ) -> ServiceResult<LinkOutcome> {
        let (event, goal) = (EntityRef::event(event_id), EntityRef::goal(goal_id));
        self.link_checked(goal, event, [event, goal], |titles| {
            format!("Linked event '{}' to goal '{}'", titles[0], titles[1])
        })
    }

    /// Stores `todo -> event`.
    pub fn link_todo_to_event(
        &mut self,
        todo_id: EntityId,
        event_id: EntityId,
    ) -> ServiceResult<LinkOutcome> {
        let (todo, event) = (EntityRef::todo(todo_id), EntityRef::event(event_id));
        self.link_checked(todo, event, [todo, event], |titles| {
            format!("Linked todo '{}' to event '{}'", titles[0], titles[1])
        })
    }

    /// Stores `parent -> subgoal`.
    pub fn link_goal_to_goal(
        &mut self,
        parent_goal_id: EntityId,
        subgoal_id: EntityId,
    ) -> ServiceResult<LinkOutcome> {
        let (parent, subgoal) = (EntityRef::goal(parent_goal_id), EntityRef::goal(subgoal_id));
        self.link_checked(parent, subgoal, [parent, subgoal], |titles| {
            format!("Linked '{}' as sub-goal of '{}'", titles[1], titles[0])
        })
    }

    /// Stores `todo -> note`.
    pub fn link_todo_to_note(
        &mut self,
        todo_id: EntityId,
        note_id: EntityId,
    ) -> ServiceResult<LinkOutcome> {
        let (todo, note) = (EntityRef::todo(todo_id), EntityRef::note(note_id));
        self.link_checked(todo, note, [todo, note], |titles| {
            format!("Linked todo '{}' to note '{}'", titles[0], titles[1])
        })
    }

    // `named` lists the endpoints in the order the message mentions them.
    fn link_checked(
        &mut self,
        from: EntityRef,
        to: EntityRef,
        named: [EntityRef; 2],
        message: impl FnOnce([&str; 2]) -> String,
    ) -> ServiceResult<LinkOutcome> {
        let titles = named.map(|entity| self.store.title_of(entity).map(str::to_owned));
        let [Some(first), Some(second)] = titles else {
            let missing = named
                .into_iter()
                .filter(|entity| !self.store.contains(*entity))
                .collect::<Vec<_>>();
            warn!(
                "event=link_create module=service status=not_found from={from} to={to}"
            );
            return Ok(LinkOutcome::not_found(missing));
        };

        let message = message([first.as_str(), second.as_str()]);
        let link = self.create_link(from, to)?;
        Ok(LinkOutcome::linked(link, message))
    }

    /// Dependent notes, optionally restricted to one parent.
    pub fn dependent_notes(&self, parent: Option<EntityRef>) -> Vec<DependentNote> {
        self.store
            .find_dependent_notes(parent)
            .into_iter()
            .cloned()
            .collect()
    }

    /// # Errors
    /// - `ServiceError::ParentNotFound` when `parent` does not resolve.
    pub fn add_dependent_note(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        parent: EntityRef,
    ) -> ServiceResult<DependentNote> {
        let note = self.store.add_dependent_note(title, content, parent)?;
        self.save()?;

        info!(
            "event=dependent_note_add module=service status=ok note_id={} parent={parent}",
            note.id
        );
        Ok(note)
    }

    pub fn update_dependent_note(
        &mut self,
        note_id: EntityId,
        patch: DependentNotePatch,
    ) -> ServiceResult<Option<DependentNote>> {
        let Some(note) = self
            .store
            .update_dependent_note(note_id, patch.title, patch.content)
            .cloned()
        else {
            return Ok(None);
        };
        self.save()?;
        Ok(Some(note))
    }

    pub fn delete_dependent_note(&mut self, note_id: EntityId) -> ServiceResult<bool> {
        if !self.store.delete_dependent_note(note_id) {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }
}
