//! Core of the LazyPlan personal planner.
//!
//! Holds events, todos, goals and notes, the typed links between them and the
//! notes attached to them, and persists everything as one JSON document.
//! Front-ends (the CLI, a chat tool loop) drive it through [`Planner`].

pub mod graph;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use graph::{GraphError, LinkedItem, LinkedItems};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::entity::{DependentNote, Event, Goal, Link, Note, Todo, DEFAULT_PRIORITY};
pub use model::kind::{EntityId, EntityKind, EntityRef, ParseKindError};
pub use model::timestamp::{format_timestamp, parse_timestamp, TIMESTAMP_FORMAT, TIMESTAMP_HINT};
pub use service::{
    AttachedNote, DependentNotePatch, EventPatch, EventView, GoalDetails, GoalPatch, GoalView,
    LinkOutcome, NewEvent, NewGoal, NewNote, NewTodo, NotePatch, Planner, ServiceError,
    ServiceResult, TagSearchResults, TodoPatch, TodoView,
};
pub use store::{
    IdsExhausted, JsonFileBackend, LoadOutcome, LoadStatus, MemoryBackend, Store, StoreBackend,
    StoreCounts, StoreError, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
