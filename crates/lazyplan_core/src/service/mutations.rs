//! Persisting create/update/complete/delete operations.
//!
//! # Invariants
//! - Dates are parsed before anything is allocated or changed, so a
//!   malformed date leaves the store and its id sequences untouched.
//! - Each successful mutation ends with one full save.
//! - Updates only touch the fields present in the patch; links and dependent
//!   notes are untouched.

use super::error::ServiceResult;
use super::planner::{Planner, WEEK_DAYS};
use super::requests::{
    parse_optional_date, parse_required_date, EventPatch, GoalPatch, NewEvent, NewGoal, NewNote,
    NewTodo, NotePatch, TodoPatch,
};
use super::views::{event_view, goal_view, todo_view, EventView, GoalView, TodoView};
use crate::model::entity::{Event, Goal, Note, Tagged, Todo};
use crate::model::kind::{EntityId, EntityRef};
use crate::store::StoreBackend;
use chrono::{Duration, NaiveDateTime};
use log::info;

impl<B: StoreBackend> Planner<B> {
    /// Creates an event. A missing or blank `end` collapses to `start`.
    pub fn add_event(&mut self, request: NewEvent) -> ServiceResult<EventView> {
        let start = parse_required_date("start", &request.start)?;
        let end = parse_optional_date("end", request.end.as_deref())?.unwrap_or(start);

        let mut event = Event::new(self.store.next_event_id()?, request.title, start, end);
        event.description = request.description;
        event.set_tags(&request.tags);
        self.store.events.push(event.clone());
        self.save()?;

        info!(
            "event=event_add module=service status=ok event_id={}",
            event.id
        );
        Ok(event_view(&self.store, &event))
    }

    pub fn add_todo(&mut self, request: NewTodo) -> ServiceResult<TodoView> {
        let due_date = parse_optional_date("due_date", request.due_date.as_deref())?;
        let start_date = parse_optional_date("start_date", request.start_date.as_deref())?;

        let mut todo = Todo::new(self.store.next_todo_id()?, request.title);
        todo.description = request.description;
        todo.priority = request.priority;
        todo.due_date = due_date;
        todo.start_date = start_date;
        todo.set_tags(&request.tags);
        self.store.todos.push(todo.clone());
        self.save()?;

        info!("event=todo_add module=service status=ok todo_id={}", todo.id);
        Ok(todo_view(&self.store, &todo))
    }

    pub fn add_goal(&mut self, request: NewGoal) -> ServiceResult<GoalView> {
        let due_date = parse_optional_date("due_date", request.due_date.as_deref())?;

        let mut goal = Goal::new(self.store.next_goal_id()?, request.title);
        goal.description = request.description;
        goal.priority = request.priority;
        goal.due_date = due_date;
        goal.set_tags(&request.tags);
        self.store.goals.push(goal.clone());
        self.save()?;

        info!("event=goal_add module=service status=ok goal_id={}", goal.id);
        Ok(goal_view(&self.store, &goal))
    }

    pub fn add_note(&mut self, request: NewNote) -> ServiceResult<Note> {
        let note = Note::new(
            self.store.next_note_id()?,
            request.title,
            request.note_type,
            request.content,
        );
        self.store.notes.push(note.clone());
        self.save()?;

        info!("event=note_add module=service status=ok note_id={}", note.id);
        Ok(note)
    }

    /// Applies `patch` to one event. `Ok(None)` when the id is unknown.
    pub fn update_event(
        &mut self,
        event_id: EntityId,
        patch: EventPatch,
    ) -> ServiceResult<Option<EventView>> {
        let start = parse_optional_date("start", patch.start.as_deref())?;
        let end = parse_optional_date("end", patch.end.as_deref())?;
        let Some(event) = self.store.event_mut(event_id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            event.title = title;
        }
        if let Some(description) = patch.description {
            event.description = description;
        }
        if let Some(start) = start {
            event.start = start;
        }
        if let Some(end) = end {
            event.end = end;
        }
        if let Some(tags) = patch.tags {
            event.set_tags(&tags);
        }
        self.save()?;

        info!("event=event_update module=service status=ok event_id={event_id}");
        Ok(self.event(event_id))
    }

    pub fn update_todo(
        &mut self,
        todo_id: EntityId,
        patch: TodoPatch,
    ) -> ServiceResult<Option<TodoView>> {
        let due_date = parse_optional_date("due_date", patch.due_date.as_deref())?;
        let start_date = parse_optional_date("start_date", patch.start_date.as_deref())?;
        let Some(todo) = self.store.todo_mut(todo_id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            todo.title = title;
        }
        if let Some(description) = patch.description {
            todo.description = description;
        }
        if let Some(priority) = patch.priority {
            todo.priority = priority;
        }
        if due_date.is_some() {
            todo.due_date = due_date;
        }
        if start_date.is_some() {
            todo.start_date = start_date;
        }
        if let Some(tags) = patch.tags {
            todo.set_tags(&tags);
        }
        if let Some(completed) = patch.completed {
            todo.completed = completed;
        }
        self.save()?;

        info!("event=todo_update module=service status=ok todo_id={todo_id}");
        Ok(self.todo(todo_id))
    }

    pub fn update_goal(
        &mut self,
        goal_id: EntityId,
        patch: GoalPatch,
    ) -> ServiceResult<Option<GoalView>> {
        let due_date = parse_optional_date("due_date", patch.due_date.as_deref())?;
        let Some(goal) = self.store.goal_mut(goal_id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            goal.title = title;
        }
        if let Some(description) = patch.description {
            goal.description = description;
        }
        if let Some(priority) = patch.priority {
            goal.priority = priority;
        }
        if due_date.is_some() {
            goal.due_date = due_date;
        }
        if let Some(tags) = patch.tags {
            goal.set_tags(&tags);
        }
        if let Some(completed) = patch.completed {
            goal.completed = completed;
        }
        self.save()?;

        info!("event=goal_update module=service status=ok goal_id={goal_id}");
        Ok(self.goal(goal_id))
    }

    pub fn update_note(
        &mut self,
        note_id: EntityId,
        patch: NotePatch,
    ) -> ServiceResult<Option<Note>> {
        let Some(note) = self.store.note_mut(note_id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            note.title = title;
        }
        if let Some(content) = patch.content {
            note.content = content;
        }
        if let Some(note_type) = patch.note_type {
            note.note_type = note_type;
        }
        let updated = note.clone();
        self.save()?;

        info!("event=note_update module=service status=ok note_id={note_id}");
        Ok(Some(updated))
    }

    /// Marks a todo completed. Returns whether it existed.
    pub fn complete_todo(&mut self, todo_id: EntityId) -> ServiceResult<bool> {
        let Some(todo) = self.store.todo_mut(todo_id) else {
            return Ok(false);
        };
        todo.completed = true;
        self.save()?;
        Ok(true)
    }

    /// Marks a goal completed. Returns whether it existed.
    pub fn complete_goal(&mut self, goal_id: EntityId) -> ServiceResult<bool> {
        let Some(goal) = self.store.goal_mut(goal_id) else {
            return Ok(false);
        };
        goal.completed = true;
        self.save()?;
        Ok(true)
    }

    pub fn delete_event(&mut self, event_id: EntityId) -> ServiceResult<bool> {
        self.delete_entity(EntityRef::event(event_id))
    }

    pub fn delete_todo(&mut self, todo_id: EntityId) -> ServiceResult<bool> {
        self.delete_entity(EntityRef::todo(todo_id))
    }

    pub fn delete_goal(&mut self, goal_id: EntityId) -> ServiceResult<bool> {
        self.delete_entity(EntityRef::goal(goal_id))
    }

    /// Deletes a standalone note and its links. Its dependent notes stay.
    pub fn delete_note(&mut self, note_id: EntityId) -> ServiceResult<bool> {
        self.delete_entity(EntityRef::note(note_id))
    }

    /// Deletes every event starting within `[now, now + 7 days]` with the
    /// usual cascade. Saves only when something was removed.
    pub fn delete_events_this_week(&mut self, now: NaiveDateTime) -> ServiceResult<usize> {
        let until = now + Duration::days(WEEK_DAYS);
        let doomed = self
            .store
            .events()
            .iter()
            .filter(|event| now <= event.start && event.start <= until)
            .map(|event| EntityRef::event(event.id))
            .collect::<Vec<_>>();

        for event in &doomed {
            self.store.remove_entity(*event);
        }
        if !doomed.is_empty() {
            self.save()?;
        }

        info!(
            "event=events_delete_week module=service status=ok deleted={}",
            doomed.len()
        );
        Ok(doomed.len())
    }

    fn delete_entity(&mut self, entity: EntityRef) -> ServiceResult<bool> {
        if !self.store.remove_entity(entity) {
            return Ok(false);
        }
        self.save()?;

        info!(
            "event=entity_delete module=service status=ok kind={} id={}",
            entity.kind, entity.id
        );
        Ok(true)
    }
}
