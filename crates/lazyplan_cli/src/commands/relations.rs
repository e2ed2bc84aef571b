use crate::candidates::{parent_candidates, HINT};
use crate::dispatch::{done, failure, success, updated_envelope};
use crate::{DepNoteAction, LinkAction};
use anyhow::Result;
use lazyplan_core::{DependentNotePatch, EntityRef, Planner, ServiceError, StoreBackend};
use serde_json::{json, Value};

pub(crate) fn dependent_note<B: StoreBackend>(
    planner: &mut Planner<B>,
    action: DepNoteAction,
) -> Result<Value> {
    let value = match action {
        DepNoteAction::List {
            parent_type: Some(kind),
            parent_id: Some(id),
        } => json!(planner.dependent_notes(Some(EntityRef::new(kind, id)))),
        DepNoteAction::List { .. } => json!(planner.dependent_notes(None)),
        DepNoteAction::Add {
            title,
            parent_type,
            parent_id,
            content,
        } => {
            let parent = EntityRef::new(parent_type, parent_id);
            match planner.add_dependent_note(title.as_str(), content.as_str(), parent) {
                Ok(note) => success(
                    "note",
                    json!(note),
                    format!("Note '{title}' attached to {parent}"),
                ),
                Err(err @ ServiceError::ParentNotFound(_)) => json!({
                    "success": false,
                    "message": err.to_string(),
                    "hint": HINT,
                    "candidates": parent_candidates(planner, &title, &content, parent_type),
                }),
                Err(err) => return Err(err.into()),
            }
        }
        DepNoteAction::Update { id, title, content } => {
            let patch = DependentNotePatch { title, content };
            let updated = planner.update_dependent_note(id, patch)?;
            updated_envelope("note", "Dependent note", id, updated.map(|note| json!(note)))
        }
        DepNoteAction::Delete { id } => done(
            planner.delete_dependent_note(id)?,
            format!("Dependent note {id}"),
            "deleted",
        ),
    };
    Ok(value)
}

pub(crate) fn link<B: StoreBackend>(
    planner: &mut Planner<B>,
    action: LinkAction,
) -> Result<Value> {
    let value = match action {
        LinkAction::TodoToGoal { todo_id, goal_id } => {
            json!(planner.link_todo_to_goal(todo_id, goal_id)?)
        }
        LinkAction::TodoToTodo {
            parent_todo_id,
            subtask_id,
        } => json!(planner.link_todo_to_todo(parent_todo_id, subtask_id)?),
        LinkAction::EventToGoal { event_id, goal_id } => {
            json!(planner.link_event_to_goal(event_id, goal_id)?)
        }
        LinkAction::TodoToEvent { todo_id, event_id } => {
            json!(planner.link_todo_to_event(todo_id, event_id)?)
        }
        LinkAction::GoalToGoal {
            parent_goal_id,
            subgoal_id,
        } => json!(planner.link_goal_to_goal(parent_goal_id, subgoal_id)?),
        LinkAction::TodoToNote { todo_id, note_id } => {
            json!(planner.link_todo_to_note(todo_id, note_id)?)
        }
        LinkAction::Create {
            from_type,
            from_id,
            to_type,
            to_id,
        } => {
            let from = EntityRef::new(from_type, from_id);
            let to = EntityRef::new(to_type, to_id);
            let link = planner.create_link(from, to)?;
            success("link", json!(link), format!("Linked {from} to {to}"))
        }
        LinkAction::Unlink {
            from_type,
            from_id,
            to_type,
            to_id,
        } => {
            let from = EntityRef::new(from_type, from_id);
            let to = EntityRef::new(to_type, to_id);
            if planner.unlink_items(from, to)? {
                json!({ "success": true, "message": format!("Unlinked {from} from {to}") })
            } else {
                failure(format!("No link found between {from} and {to}"))
            }
        }
        LinkAction::Delete { link_id } => {
            done(planner.delete_link(link_id)?, format!("Link {link_id}"), "deleted")
        }
        LinkAction::Show { item_type, item_id } => {
            json!(planner.linked_items(EntityRef::new(item_type, item_id)))
        }
    };
    Ok(value)
}
