//! Facade construction, persistence and read queries.
//!
//! # Invariants
//! - Every query returns owned views; callers never borrow arena records.
//! - Queries never touch the backend.

use super::error::ServiceResult;
use super::views::{
    event_view, goal_view, todo_view, EventView, GoalDetails, GoalView, TagSearchResults, TodoView,
};
use crate::model::entity::{Event, Goal, Note, Todo};
use crate::model::kind::{EntityId, EntityKind, EntityRef};
use crate::model::tags::has_tag;
use crate::store::{LoadStatus, Store, StoreBackend};
use chrono::{Duration, NaiveDateTime};
use log::error;

/// Window covered by the "this week" queries.
pub const WEEK_DAYS: i64 = 7;

/// Planner facade: the loaded store plus the backend it saves to.
///
/// Constructed once by the caller and passed around by reference; there is
/// no process-wide instance.
pub struct Planner<B: StoreBackend> {
    pub(crate) store: Store,
    backend: B,
}

impl<B: StoreBackend> Planner<B> {
    /// Loads the store through `backend`.
    ///
    /// Load problems never fail construction; they are reported through the
    /// returned status and the caller decides how loudly to surface them.
    pub fn open(backend: B) -> (Self, LoadStatus) {
        let outcome = backend.load();
        let planner = Self {
            store: outcome.store,
            backend,
        };
        (planner, outcome.status)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Writes the whole store through the backend.
    pub fn save(&self) -> ServiceResult<()> {
        self.backend.save(&self.store).map_err(|err| {
            error!("event=planner_save module=service status=error error={err}");
            err.into()
        })
    }

    // Events

    pub fn event(&self, event_id: EntityId) -> Option<EventView> {
        self.store.event(event_id).map(|event| event_view(&self.store, event))
    }

    pub fn all_events(&self) -> Vec<EventView> {
        self.event_views(|_| true)
    }

    /// Events starting within `[now, now + 7 days]`.
    pub fn events_this_week(&self, now: NaiveDateTime) -> Vec<EventView> {
        self.events_between(now, now + Duration::days(WEEK_DAYS))
    }

    /// Events whose start lies in the inclusive range `[from, to]`.
    pub fn events_between(&self, from: NaiveDateTime, to: NaiveDateTime) -> Vec<EventView> {
        self.event_views(|event| from <= event.start && event.start <= to)
    }

    pub fn search_events_by_title(&self, query: &str) -> Vec<EventView> {
        let query = query.to_lowercase();
        self.event_views(|event| title_matches(&event.title, &query))
    }

    pub fn search_events_by_tag(&self, tag: &str) -> Vec<EventView> {
        self.event_views(|event| has_tag(&event.tags, tag))
    }

    // Todos

    pub fn todo(&self, todo_id: EntityId) -> Option<TodoView> {
        self.store.todo(todo_id).map(|todo| todo_view(&self.store, todo))
    }

    /// Todos with the given completion state, optionally of one priority.
    pub fn todos_by_priority(&self, priority: Option<u8>, completed: bool) -> Vec<TodoView> {
        self.todo_views(|todo| {
            todo.completed == completed && priority.map_or(true, |wanted| todo.priority == wanted)
        })
    }

    /// Every incomplete todo, dated or not.
    pub fn all_todos(&self) -> Vec<TodoView> {
        self.todo_views(|todo| !todo.completed)
    }

    /// Incomplete todos whose due date is strictly before `now`.
    pub fn overdue_todos(&self, now: NaiveDateTime) -> Vec<TodoView> {
        self.todo_views(|todo| !todo.completed && todo.due_date.map_or(false, |due| due < now))
    }

    /// Incomplete todos due within `[now, now + days]`.
    ///
    /// A window past the representable calendar is clamped to its end.
    pub fn upcoming_todos(&self, now: NaiveDateTime, days: i64) -> Vec<TodoView> {
        let until = Duration::try_days(days)
            .and_then(|span| now.checked_add_signed(span))
            .unwrap_or(if days < 0 {
                NaiveDateTime::MIN
            } else {
                NaiveDateTime::MAX
            });
        self.todo_views(|todo| {
            !todo.completed && todo.due_date.map_or(false, |due| now <= due && due <= until)
        })
    }

    pub fn search_todos_by_title(&self, query: &str) -> Vec<TodoView> {
        let query = query.to_lowercase();
        self.todo_views(|todo| title_matches(&todo.title, &query))
    }

    pub fn search_todos_by_tag(&self, tag: &str) -> Vec<TodoView> {
        self.todo_views(|todo| has_tag(&todo.tags, tag))
    }

    // Goals

    pub fn goal(&self, goal_id: EntityId) -> Option<GoalView> {
        self.store.goal(goal_id).map(|goal| goal_view(&self.store, goal))
    }

    pub fn goals(&self, completed: bool) -> Vec<GoalView> {
        self.goal_views(|goal| goal.completed == completed)
    }

    /// Goal plus the todos, events and sub-goals its outgoing links reach.
    pub fn goal_details(&self, goal_id: EntityId) -> Option<GoalDetails> {
        let goal = self.goal(goal_id)?;
        let entity = EntityRef::goal(goal_id);
        Some(GoalDetails {
            goal,
            todos: self.related_todos(entity),
            events: self.related_events(entity),
            sub_goals: self.related_goals(entity),
        })
    }

    /// Goal that owns `todo_id`.
    ///
    /// Prefers the first `goal -> todo` link (what `link_todo_to_goal` stores)
    /// and falls back to a raw `todo -> goal` link.
    pub fn parent_goal(&self, todo_id: EntityId) -> Option<GoalView> {
        let todo = EntityRef::todo(todo_id);
        let links = self.store.links();
        links
            .iter()
            .filter(|link| link.target() == todo && link.from_type == EntityKind::Goal)
            .find_map(|link| self.goal(link.from_id))
            .or_else(|| {
                links
                    .iter()
                    .filter(|link| link.source() == todo && link.to_type == EntityKind::Goal)
                    .find_map(|link| self.goal(link.to_id))
            })
    }

    pub fn search_goals_by_title(&self, query: &str) -> Vec<GoalView> {
        let query = query.to_lowercase();
        self.goal_views(|goal| title_matches(&goal.title, &query))
    }

    pub fn search_goals_by_tag(&self, tag: &str) -> Vec<GoalView> {
        self.goal_views(|goal| has_tag(&goal.tags, tag))
    }

    // Notes

    pub fn note(&self, note_id: EntityId) -> Option<Note> {
        self.store.note(note_id).cloned()
    }

    pub fn notes(&self) -> Vec<Note> {
        self.store.notes().to_vec()
    }

    /// Tag search across todos, goals and events.
    pub fn search_all_by_tag(&self, tag: &str) -> TagSearchResults {
        TagSearchResults {
            todos: self.search_todos_by_tag(tag),
            goals: self.search_goals_by_tag(tag),
            events: self.search_events_by_tag(tag),
        }
    }

    // Related-entity views, shared with the link queries.

    pub fn related_todos(&self, entity: EntityRef) -> Vec<TodoView> {
        self.store
            .related_todos(entity)
            .into_iter()
            .map(|todo| todo_view(&self.store, todo))
            .collect()
    }

    pub fn related_goals(&self, entity: EntityRef) -> Vec<GoalView> {
        self.store
            .related_goals(entity)
            .into_iter()
            .map(|goal| goal_view(&self.store, goal))
            .collect()
    }

    pub fn related_events(&self, entity: EntityRef) -> Vec<EventView> {
        self.store
            .related_events(entity)
            .into_iter()
            .map(|event| event_view(&self.store, event))
            .collect()
    }

    fn event_views(&self, keep: impl Fn(&Event) -> bool) -> Vec<EventView> {
        self.store
            .events()
            .iter()
            .filter(|event| keep(event))
            .map(|event| event_view(&self.store, event))
            .collect()
    }

    fn todo_views(&self, keep: impl Fn(&Todo) -> bool) -> Vec<TodoView> {
        self.store
            .todos()
            .iter()
            .filter(|todo| keep(todo))
            .map(|todo| todo_view(&self.store, todo))
            .collect()
    }

    fn goal_views(&self, keep: impl Fn(&Goal) -> bool) -> Vec<GoalView> {
        self.store
            .goals()
            .iter()
            .filter(|goal| keep(goal))
            .map(|goal| goal_view(&self.store, goal))
            .collect()
    }
}

// `query` is already lowercased.
fn title_matches(title: &str, query: &str) -> bool {
    title.to_lowercase().contains(query)
}
