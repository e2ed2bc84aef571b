//! JSON tool-call dispatcher.
//!
//! # Responsibility
//! - Map a tool name plus a JSON argument object onto one `Planner` call.
//! - Shape every result as JSON the calling model can read back.
//!
//! # Invariants
//! - Never panics and never returns an error: failures become
//!   `{"success": false, "message": ...}` and unknown names become
//!   `{"error": "Unknown function: <name>"}`.
//! - Mutations answer with `{success, message, <entity>}` envelopes.

use crate::candidates::{parent_candidates, HINT};
use chrono::NaiveDateTime;
use lazyplan_core::model::timestamp;
use lazyplan_core::{
    DependentNotePatch, EntityId, EntityKind, EntityRef, EventPatch, GoalPatch, NewEvent,
    NewGoal, NewNote, NewTodo, NotePatch, Planner, ServiceError, StoreBackend, TodoPatch,
};
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::fmt::{Display, Formatter};

/// Tool names understood by [`execute_tool`].
pub const TOOL_NAMES: &[&str] = &[
    "get_events_this_week",
    "get_all_events",
    "get_todos_by_priority",
    "get_overdue_todos",
    "get_upcoming_todos",
    "get_all_todos",
    "get_goals",
    "get_goal_details",
    "get_parent_goal",
    "get_notes",
    "add_event",
    "add_todo",
    "add_goal",
    "add_note",
    "update_event",
    "update_todo",
    "update_goal",
    "update_note",
    "complete_todo",
    "complete_goal",
    "delete_event",
    "delete_events_this_week",
    "delete_todo",
    "delete_goal",
    "delete_note",
    "link_todo_to_goal",
    "link_todo_to_todo",
    "link_event_to_goal",
    "link_todo_to_event",
    "link_goal_to_goal",
    "link_todo_to_note",
    "unlink_items",
    "get_linked_items",
    "add_dependent_note",
    "get_dependent_notes",
    "update_dependent_note",
    "delete_dependent_note",
    "search_todos_by_title",
    "search_goals_by_title",
    "search_events_by_title",
    "search_todos_by_tag",
    "search_goals_by_tag",
    "search_events_by_tag",
    "search_all_by_tag",
];

const DEFAULT_UPCOMING_DAYS: i64 = 7;

#[derive(Debug)]
enum ToolError {
    UnknownFunction,
    BadArguments(String),
    Service(ServiceError),
}

impl Display for ToolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownFunction => f.write_str("unknown function"),
            Self::BadArguments(details) => write!(f, "invalid arguments: {details}"),
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl From<ServiceError> for ToolError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

type ToolResult = Result<Value, ToolError>;

/// Runs one tool call against the current local time.
pub fn execute_tool<B: StoreBackend>(
    planner: &mut Planner<B>,
    name: &str,
    args: &Value,
) -> Value {
    execute_tool_at(planner, name, args, timestamp::now())
}

/// Runs one tool call; `now` anchors the relative-time queries.
pub fn execute_tool_at<B: StoreBackend>(
    planner: &mut Planner<B>,
    name: &str,
    args: &Value,
    now: NaiveDateTime,
) -> Value {
    debug!("event=tool_call module=dispatch status=start name={name}");
    match call(planner, name, args, now) {
        Ok(value) => value,
        Err(ToolError::UnknownFunction) => {
            warn!("event=tool_call module=dispatch status=unknown name={name}");
            json!({ "error": format!("Unknown function: {name}") })
        }
        Err(ToolError::Service(err @ ServiceError::Store(_))) => {
            error!("event=tool_call module=dispatch status=error name={name} error={err}");
            failure(err.to_string())
        }
        Err(err) => {
            debug!("event=tool_call module=dispatch status=rejected name={name} error={err}");
            failure(err.to_string())
        }
    }
}

fn call<B: StoreBackend>(
    planner: &mut Planner<B>,
    name: &str,
    args: &Value,
    now: NaiveDateTime,
) -> ToolResult {
    let value = match name {
        "get_events_this_week" => json!(planner.events_this_week(now)),
        "get_all_events" => json!(planner.all_events()),
        "get_todos_by_priority" => {
            let priority = optional_u8(args, "priority")?;
            json!(planner.todos_by_priority(priority, flag(args, "completed")))
        }
        "get_overdue_todos" => json!(planner.overdue_todos(now)),
        "get_upcoming_todos" => {
            let days = match optional_id(args, "days")? {
                Some(days) => i64::try_from(days)
                    .map_err(|_| ToolError::BadArguments("`days` is out of range".to_string()))?,
                None => DEFAULT_UPCOMING_DAYS,
            };
            json!(planner.upcoming_todos(now, days))
        }
        "get_all_todos" => json!(planner.all_todos()),
        "get_goals" => json!(planner.goals(flag(args, "completed"))),
        "get_goal_details" => {
            let goal_id = id(args, "goal_id")?;
            match planner.goal_details(goal_id) {
                Some(details) => json!(details),
                None => failure(format!("Goal {goal_id} not found")),
            }
        }
        "get_parent_goal" => {
            let todo_id = id(args, "todo_id")?;
            json!(planner.parent_goal(todo_id))
        }
        "get_notes" => json!(planner.notes()),

        "add_event" => {
            let request: NewEvent = request(args)?;
            let title = request.title.clone();
            let view = planner.add_event(request)?;
            success("event", json!(view), format!("Event '{title}' added successfully"))
        }
        "add_todo" => {
            let request: NewTodo = request(args)?;
            let title = request.title.clone();
            let view = planner.add_todo(request)?;
            success("todo", json!(view), format!("Todo '{title}' added successfully"))
        }
        "add_goal" => {
            let request: NewGoal = request(args)?;
            let title = request.title.clone();
            let view = planner.add_goal(request)?;
            success("goal", json!(view), format!("Goal '{title}' added successfully"))
        }
        "add_note" => {
            let request: NewNote = request(args)?;
            let note = planner.add_note(request)?;
            let message = format!("Note '{}' added successfully", note.title);
            success("note", json!(note), message)
        }

        "update_event" => {
            let event_id = id(args, "event_id")?;
            let updated = planner.update_event(event_id, request::<EventPatch>(args)?)?;
            updated_envelope("event", "Event", event_id, updated.map(|view| json!(view)))
        }
        "update_todo" => {
            let todo_id = id(args, "todo_id")?;
            let updated = planner.update_todo(todo_id, request::<TodoPatch>(args)?)?;
            updated_envelope("todo", "Todo", todo_id, updated.map(|view| json!(view)))
        }
        "update_goal" => {
            let goal_id = id(args, "goal_id")?;
            let updated = planner.update_goal(goal_id, request::<GoalPatch>(args)?)?;
            updated_envelope("goal", "Goal", goal_id, updated.map(|view| json!(view)))
        }
        "update_note" => {
            let note_id = id(args, "note_id")?;
            let updated = planner.update_note(note_id, request::<NotePatch>(args)?)?;
            updated_envelope("note", "Note", note_id, updated.map(|note| json!(note)))
        }
        "complete_todo" => {
            let todo_id = id(args, "todo_id")?;
            done(planner.complete_todo(todo_id)?, format!("Todo {todo_id}"), "completed")
        }
        "complete_goal" => {
            let goal_id = id(args, "goal_id")?;
            done(planner.complete_goal(goal_id)?, format!("Goal {goal_id}"), "completed")
        }

        "delete_event" => {
            let event_id = id(args, "event_id")?;
            done(planner.delete_event(event_id)?, format!("Event {event_id}"), "deleted")
        }
        "delete_events_this_week" => {
            let count = planner.delete_events_this_week(now)?;
            json!({
                "success": true,
                "message": format!("Deleted {count} event(s) from this week's schedule"),
            })
        }
        "delete_todo" => {
            let todo_id = id(args, "todo_id")?;
            done(planner.delete_todo(todo_id)?, format!("Todo {todo_id}"), "deleted")
        }
        "delete_goal" => {
            let goal_id = id(args, "goal_id")?;
            done(planner.delete_goal(goal_id)?, format!("Goal {goal_id}"), "deleted")
        }
        "delete_note" => {
            let note_id = id(args, "note_id")?;
            done(planner.delete_note(note_id)?, format!("Note {note_id}"), "deleted")
        }

        "link_todo_to_goal" => {
            let outcome = planner.link_todo_to_goal(id(args, "todo_id")?, id(args, "goal_id")?)?;
            json!(outcome)
        }
        "link_todo_to_todo" => {
            let outcome = planner
                .link_todo_to_todo(id(args, "parent_todo_id")?, id(args, "subtask_id")?)?;
            json!(outcome)
        }
        "link_event_to_goal" => {
            let outcome =
                planner.link_event_to_goal(id(args, "event_id")?, id(args, "goal_id")?)?;
            json!(outcome)
        }
        "link_todo_to_event" => {
            let outcome =
                planner.link_todo_to_event(id(args, "todo_id")?, id(args, "event_id")?)?;
            json!(outcome)
        }
        "link_goal_to_goal" => {
            let outcome = planner
                .link_goal_to_goal(id(args, "parent_goal_id")?, id(args, "subgoal_id")?)?;
            json!(outcome)
        }
        "link_todo_to_note" => {
            let outcome = planner.link_todo_to_note(id(args, "todo_id")?, id(args, "note_id")?)?;
            json!(outcome)
        }
        "unlink_items" => {
            let from = entity(args, "from_type", "from_id")?;
            let to = entity(args, "to_type", "to_id")?;
            if planner.unlink_items(from, to)? {
                json!({ "success": true, "message": format!("Unlinked {from} from {to}") })
            } else {
                failure(format!("No link found between {from} and {to}"))
            }
        }
        "get_linked_items" => json!(planner.linked_items(entity(args, "item_type", "item_id")?)),

        "add_dependent_note" => add_dependent_note(planner, args)?,
        "get_dependent_notes" => {
            let parent = match (args.get("parent_type"), args.get("parent_id")) {
                (Some(kind), Some(parent_id)) if !kind.is_null() && !parent_id.is_null() => {
                    Some(entity(args, "parent_type", "parent_id")?)
                }
                _ => None,
            };
            json!({ "notes": planner.dependent_notes(parent) })
        }
        "update_dependent_note" => {
            let note_id = id(args, "note_id")?;
            let updated =
                planner.update_dependent_note(note_id, request::<DependentNotePatch>(args)?)?;
            updated_envelope("note", "Dependent note", note_id, updated.map(|note| json!(note)))
        }
        "delete_dependent_note" => {
            let note_id = id(args, "note_id")?;
            done(
                planner.delete_dependent_note(note_id)?,
                format!("Dependent note {note_id}"),
                "deleted",
            )
        }

        "search_todos_by_title" => json!(planner.search_todos_by_title(text(args, "title")?)),
        "search_goals_by_title" => json!(planner.search_goals_by_title(text(args, "title")?)),
        "search_events_by_title" => json!(planner.search_events_by_title(text(args, "title")?)),
        "search_todos_by_tag" => json!(planner.search_todos_by_tag(text(args, "tag")?)),
        "search_goals_by_tag" => json!(planner.search_goals_by_tag(text(args, "tag")?)),
        "search_events_by_tag" => json!(planner.search_events_by_tag(text(args, "tag")?)),
        "search_all_by_tag" => json!(planner.search_all_by_tag(text(args, "tag")?)),

        _ => return Err(ToolError::UnknownFunction),
    };
    Ok(value)
}

// A missing parent is answered with likely candidates rather than a bare error.
fn add_dependent_note<B: StoreBackend>(planner: &mut Planner<B>, args: &Value) -> ToolResult {
    let title = optional_text(args, "title").unwrap_or_default();
    let content = optional_text(args, "content").unwrap_or_default();
    let parent = entity(args, "parent_type", "parent_id")?;

    match planner.add_dependent_note(title, content, parent) {
        Ok(note) => Ok(json!({
            "success": true,
            "note": note,
            "message": format!("Note '{title}' attached to {parent}"),
        })),
        Err(err @ ServiceError::ParentNotFound(_)) => Ok(json!({
            "success": false,
            "message": err.to_string(),
            "hint": HINT,
            "candidates": parent_candidates(planner, title, content, parent.kind),
        })),
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn success(key: &str, entity: Value, message: String) -> Value {
    let mut envelope = json!({ "success": true, "message": message });
    envelope[key] = entity;
    envelope
}

pub(crate) fn failure(message: String) -> Value {
    json!({ "success": false, "message": message })
}

pub(crate) fn updated_envelope(
    key: &str,
    label: &str,
    id: EntityId,
    updated: Option<Value>,
) -> Value {
    match updated {
        Some(entity) => success(key, entity, format!("{label} {id} updated successfully")),
        None => failure(format!("{label} {id} not found")),
    }
}

pub(crate) fn done(found: bool, subject: String, verb: &str) -> Value {
    if found {
        json!({ "success": true, "message": format!("{subject} {verb} successfully") })
    } else {
        failure(format!("{subject} not found"))
    }
}

fn request<T: DeserializeOwned>(args: &Value) -> Result<T, ToolError> {
    serde_json::from_value(args.clone()).map_err(|err| ToolError::BadArguments(err.to_string()))
}

fn id(args: &Value, key: &str) -> Result<EntityId, ToolError> {
    optional_id(args, key)?.ok_or_else(|| ToolError::BadArguments(format!("`{key}` is required")))
}

fn optional_id(args: &Value, key: &str) -> Result<Option<EntityId>, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or_else(|| {
            ToolError::BadArguments(format!("`{key}` must be a non-negative integer"))
        }),
    }
}

fn optional_u8(args: &Value, key: &str) -> Result<Option<u8>, ToolError> {
    optional_id(args, key)?
        .map(|value| {
            u8::try_from(value)
                .map_err(|_| ToolError::BadArguments(format!("`{key}` is out of range")))
        })
        .transpose()
}

fn flag(args: &Value, key: &str) -> bool {
    args.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn optional_text<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str)
}

fn text<'a>(args: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    optional_text(args, key)
        .ok_or_else(|| ToolError::BadArguments(format!("`{key}` must be a string")))
}

fn entity(args: &Value, kind_key: &str, id_key: &str) -> Result<EntityRef, ToolError> {
    let kind = text(args, kind_key)?
        .parse::<EntityKind>()
        .map_err(|err| ToolError::BadArguments(err.to_string()))?;
    Ok(EntityRef::new(kind, id(args, id_key)?))
}
