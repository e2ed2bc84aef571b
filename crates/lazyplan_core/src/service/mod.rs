//! Query/mutation facade over the store and its backend.
//!
//! # Responsibility
//! - Expose every planner capability as one `Planner` value.
//! - Parse date input, shape read views and save after each mutation.
//!
//! # Invariants
//! - Not-found is reported as `None`, `false` or a failed `LinkOutcome`,
//!   never as an error.
//! - A failed mutation (malformed date, missing parent) changes nothing.
//!
//! # See also
//! - `graph` for the in-memory link and dependent-note rules.

mod error;
mod mutations;
mod planner;
mod relations;
mod requests;
mod views;

pub use error::{ServiceError, ServiceResult};
pub use planner::{Planner, WEEK_DAYS};
pub use requests::{
    DependentNotePatch, EventPatch, GoalPatch, NewEvent, NewGoal, NewNote, NewTodo, NotePatch,
    TodoPatch,
};
pub use views::{
    AttachedNote, EventView, GoalDetails, GoalView, LinkOutcome, TagSearchResults, TodoView,
};
