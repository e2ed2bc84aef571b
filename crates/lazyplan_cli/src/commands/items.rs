use crate::dispatch::{done, failure, success, updated_envelope};
use crate::{EventAction, GoalAction, NoteAction, TodoAction};
use anyhow::Result;
use lazyplan_core::model::timestamp;
use lazyplan_core::{
    EventPatch, GoalPatch, NewEvent, NewGoal, NewNote, NewTodo, NotePatch, Planner, StoreBackend,
    TodoPatch,
};
use serde_json::{json, Value};

fn found_or(value: Option<Value>, missing: String) -> Value {
    value.unwrap_or_else(|| failure(missing))
}

pub(crate) fn event<B: StoreBackend>(
    planner: &mut Planner<B>,
    action: EventAction,
) -> Result<Value> {
    let value = match action {
        EventAction::List { week: false } => json!(planner.all_events()),
        EventAction::List { week: true } => json!(planner.events_this_week(timestamp::now())),
        EventAction::Show { id } => found_or(
            planner.event(id).map(|view| json!(view)),
            format!("Event {id} not found"),
        ),
        EventAction::Add {
            title,
            start,
            end,
            description,
            tags,
        } => {
            let view = planner.add_event(NewEvent {
                title,
                start,
                end,
                description,
                tags,
            })?;
            let message = format!("Event '{}' added successfully", view.event.title);
            success("event", json!(view), message)
        }
        EventAction::Update {
            id,
            title,
            description,
            start,
            end,
            tags,
        } => {
            let patch = EventPatch {
                title,
                description,
                start,
                end,
                tags,
            };
            let updated = planner.update_event(id, patch)?;
            updated_envelope("event", "Event", id, updated.map(|view| json!(view)))
        }
        EventAction::Delete { id } => {
            done(planner.delete_event(id)?, format!("Event {id}"), "deleted")
        }
        EventAction::DeleteWeek => {
            let count = planner.delete_events_this_week(timestamp::now())?;
            json!({
                "success": true,
                "message": format!("Deleted {count} event(s) from this week's schedule"),
            })
        }
    };
    Ok(value)
}

pub(crate) fn todo<B: StoreBackend>(planner: &mut Planner<B>, action: TodoAction) -> Result<Value> {
    let value = match action {
        TodoAction::List { overdue: true, .. } => json!(planner.overdue_todos(timestamp::now())),
        TodoAction::List {
            upcoming: Some(days),
            ..
        } => json!(planner.upcoming_todos(timestamp::now(), days)),
        TodoAction::List {
            priority: None,
            completed: false,
            ..
        } => json!(planner.all_todos()),
        TodoAction::List {
            priority,
            completed,
            ..
        } => json!(planner.todos_by_priority(priority, completed)),
        TodoAction::Show { id } => found_or(
            planner.todo(id).map(|view| json!(view)),
            format!("Todo {id} not found"),
        ),
        TodoAction::Add {
            title,
            description,
            priority,
            due,
            start,
            tags,
        } => {
            let view = planner.add_todo(NewTodo {
                title,
                description,
                priority,
                due_date: due,
                start_date: start,
                tags,
            })?;
            let message = format!("Todo '{}' added successfully", view.todo.title);
            success("todo", json!(view), message)
        }
        TodoAction::Update {
            id,
            title,
            description,
            priority,
            due,
            start,
            tags,
            completed,
        } => {
            let patch = TodoPatch {
                title,
                description,
                priority,
                due_date: due,
                start_date: start,
                tags,
                completed,
            };
            let updated = planner.update_todo(id, patch)?;
            updated_envelope("todo", "Todo", id, updated.map(|view| json!(view)))
        }
        TodoAction::Complete { id } => {
            done(planner.complete_todo(id)?, format!("Todo {id}"), "completed")
        }
        TodoAction::Delete { id } => {
            done(planner.delete_todo(id)?, format!("Todo {id}"), "deleted")
        }
    };
    Ok(value)
}

pub(crate) fn goal<B: StoreBackend>(planner: &mut Planner<B>, action: GoalAction) -> Result<Value> {
    let value = match action {
        GoalAction::List { completed } => json!(planner.goals(completed)),
        GoalAction::Show { id } => found_or(
            planner.goal_details(id).map(|details| json!(details)),
            format!("Goal {id} not found"),
        ),
        GoalAction::Add {
            title,
            description,
            priority,
            due,
            tags,
        } => {
            let view = planner.add_goal(NewGoal {
                title,
                description,
                priority,
                due_date: due,
                tags,
            })?;
            let message = format!("Goal '{}' added successfully", view.goal.title);
            success("goal", json!(view), message)
        }
        GoalAction::Update {
            id,
            title,
            description,
            priority,
            due,
            tags,
            completed,
        } => {
            let patch = GoalPatch {
                title,
                description,
                priority,
                due_date: due,
                tags,
                completed,
            };
            let updated = planner.update_goal(id, patch)?;
            updated_envelope("goal", "Goal", id, updated.map(|view| json!(view)))
        }
        GoalAction::Complete { id } => {
            done(planner.complete_goal(id)?, format!("Goal {id}"), "completed")
        }
        GoalAction::Delete { id } => {
            done(planner.delete_goal(id)?, format!("Goal {id}"), "deleted")
        }
    };
    Ok(value)
}

pub(crate) fn note<B: StoreBackend>(planner: &mut Planner<B>, action: NoteAction) -> Result<Value> {
    let value = match action {
        NoteAction::List => json!(planner.notes()),
        NoteAction::Add {
            title,
            note_type,
            content,
        } => {
            let note = planner.add_note(NewNote {
                title,
                note_type,
                content,
            })?;
            let message = format!("Note '{}' added successfully", note.title);
            success("note", json!(note), message)
        }
        NoteAction::Update {
            id,
            title,
            note_type,
            content,
        } => {
            let patch = NotePatch {
                title,
                content,
                note_type,
            };
            let updated = planner.update_note(id, patch)?;
            updated_envelope("note", "Note", id, updated.map(|note| json!(note)))
        }
        NoteAction::Delete { id } => {
            done(planner.delete_note(id)?, format!("Note {id}"), "deleted")
        }
    };
    Ok(value)
}
