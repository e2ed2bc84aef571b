//! `lazyplan` command-line front-end.
//!
//! # Responsibility
//! - Resolve configuration from flags and `LAZYPLAN_*` environment variables.
//! - Open the planner on the JSON data file and run one command.
//! - Print every result as pretty JSON on stdout.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lazyplan_core::{
    default_log_level, init_logging, EntityId, EntityKind, JsonFileBackend, LoadStatus, Planner,
};
use log::{info, warn};
use std::path::PathBuf;

mod candidates;
mod commands;
mod dispatch;

#[derive(Parser)]
#[command(
    name = "lazyplan",
    about = "LazyPlan: events, todos, goals and notes in one JSON file",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Data file path
    #[arg(long, global = true, env = "LAZYPLAN_DATA", default_value = "lazyplan.json")]
    data_file: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "LAZYPLAN_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log directory; file logging stays off when unset
    #[arg(long, global = true, env = "LAZYPLAN_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calendar events
    Event {
        #[command(subcommand)]
        action: EventAction,
    },
    /// Todos
    Todo {
        #[command(subcommand)]
        action: TodoAction,
    },
    /// Goals
    Goal {
        #[command(subcommand)]
        action: GoalAction,
    },
    /// Standalone notes
    Note {
        #[command(subcommand)]
        action: NoteAction,
    },
    /// Notes attached to an event, todo, goal or note
    DepNote {
        #[command(subcommand)]
        action: DepNoteAction,
    },
    /// Links between items
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },
    /// Title and tag search
    Search {
        #[command(subcommand)]
        action: SearchAction,
    },
    /// Run one JSON tool call
    Tool {
        /// Tool name (e.g. add_todo, get_linked_items)
        name: String,

        /// Arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },
    /// List tool names
    Tools,
}

#[derive(Subcommand)]
enum EventAction {
    /// List events
    List {
        /// Only events starting within the next 7 days
        #[arg(long)]
        week: bool,
    },
    /// Show one event
    Show { id: EntityId },
    /// Add an event
    Add {
        title: String,
        /// Start (YYYY-MM-DDTHH:MM:SS)
        #[arg(long)]
        start: String,
        /// End; defaults to start
        #[arg(long)]
        end: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
        /// Tags (comma-separated)
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// Update supplied fields of an event
    Update {
        id: EntityId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        /// Replacement tags (comma-separated)
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
    },
    /// Delete an event with its links and attached notes
    Delete { id: EntityId },
    /// Delete every event starting within the next 7 days
    DeleteWeek,
}

#[derive(Subcommand)]
enum TodoAction {
    /// List incomplete todos (or filter)
    List {
        /// Only this priority
        #[arg(long)]
        priority: Option<u8>,
        /// Completed instead of open todos
        #[arg(long)]
        completed: bool,
        /// Only overdue todos
        #[arg(long, conflicts_with_all = ["upcoming", "priority", "completed"])]
        overdue: bool,
        /// Only todos due within this many days
        #[arg(long, conflicts_with_all = ["priority", "completed"])]
        upcoming: Option<i64>,
    },
    /// Show one todo
    Show { id: EntityId },
    /// Add a todo
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Priority 1 (low) to 5 (high)
        #[arg(long, default_value_t = lazyplan_core::DEFAULT_PRIORITY)]
        priority: u8,
        /// Due date (YYYY-MM-DDTHH:MM:SS)
        #[arg(long)]
        due: Option<String>,
        /// Start date (YYYY-MM-DDTHH:MM:SS)
        #[arg(long)]
        start: Option<String>,
        /// Tags (comma-separated)
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// Update supplied fields of a todo
    Update {
        id: EntityId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<u8>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Mark a todo completed
    Complete { id: EntityId },
    /// Delete a todo with its links and attached notes
    Delete { id: EntityId },
}

#[derive(Subcommand)]
enum GoalAction {
    /// List open goals
    List {
        /// Completed instead of open goals
        #[arg(long)]
        completed: bool,
    },
    /// Show a goal with its linked todos, events and sub-goals
    Show { id: EntityId },
    /// Add a goal
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = lazyplan_core::DEFAULT_PRIORITY)]
        priority: u8,
        #[arg(long)]
        due: Option<String>,
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// Update supplied fields of a goal
    Update {
        id: EntityId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<u8>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Mark a goal completed
    Complete { id: EntityId },
    /// Delete a goal with its links and attached notes
    Delete { id: EntityId },
}

#[derive(Subcommand)]
enum NoteAction {
    /// List notes
    List,
    /// Add a note
    Add {
        title: String,
        /// Free-form note type (idea, journal, ...)
        #[arg(long = "type", default_value = "")]
        note_type: String,
        #[arg(long, default_value = "")]
        content: String,
    },
    /// Update supplied fields of a note
    Update {
        id: EntityId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long = "type")]
        note_type: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a note and its links (attached notes are kept)
    Delete { id: EntityId },
}

#[derive(Subcommand)]
enum DepNoteAction {
    /// List attached notes, optionally of one parent
    List {
        #[arg(long, requires = "parent_id")]
        parent_type: Option<EntityKind>,
        #[arg(long, requires = "parent_type")]
        parent_id: Option<EntityId>,
    },
    /// Attach a note to a parent
    Add {
        title: String,
        #[arg(long)]
        parent_type: EntityKind,
        #[arg(long)]
        parent_id: EntityId,
        #[arg(long, default_value = "")]
        content: String,
    },
    /// Update an attached note
    Update {
        id: EntityId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete an attached note
    Delete { id: EntityId },
}

#[derive(Subcommand)]
enum LinkAction {
    /// Link a todo under a goal (goal -> todo)
    TodoToGoal { todo_id: EntityId, goal_id: EntityId },
    /// Link a subtask under a parent todo (parent -> subtask)
    TodoToTodo {
        parent_todo_id: EntityId,
        subtask_id: EntityId,
    },
    /// Link an event under a goal (goal -> event)
    EventToGoal { event_id: EntityId, goal_id: EntityId },
    /// Link a todo to an event (todo -> event)
    TodoToEvent { todo_id: EntityId, event_id: EntityId },
    /// Link a sub-goal under a parent goal (parent -> sub-goal)
    GoalToGoal {
        parent_goal_id: EntityId,
        subgoal_id: EntityId,
    },
    /// Link a todo to a note (todo -> note)
    TodoToNote { todo_id: EntityId, note_id: EntityId },
    /// Create a raw link without checking endpoints
    Create {
        from_type: EntityKind,
        from_id: EntityId,
        to_type: EntityKind,
        to_id: EntityId,
    },
    /// Remove the first link between two items
    Unlink {
        from_type: EntityKind,
        from_id: EntityId,
        to_type: EntityKind,
        to_id: EntityId,
    },
    /// Delete a link by id
    Delete { link_id: EntityId },
    /// Show everything linked to or from an item
    Show { item_type: EntityKind, item_id: EntityId },
}

#[derive(Subcommand)]
enum SearchAction {
    /// Case-insensitive title substring search
    Title {
        /// event, todo or goal
        kind: EntityKind,
        query: String,
    },
    /// Exact tag search, across todos, goals and events unless a kind is given
    Tag {
        tag: String,
        #[arg(long)]
        kind: Option<EntityKind>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = log_level(cli.log_level.as_deref());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    let (mut planner, status) = Planner::open(JsonFileBackend::new(&cli.data_file));
    report_load(&cli.data_file, &status);

    let output = commands::run(&mut planner, cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn log_level(flag: Option<&str>) -> &str {
    flag.unwrap_or(default_log_level())
}

fn report_load(path: &std::path::Path, status: &LoadStatus) {
    match status {
        LoadStatus::Loaded(counts) => info!(
            "event=data_load module=cli status=ok path={} todos={} goals={} events={} notes={}",
            path.display(),
            counts.todos,
            counts.goals,
            counts.events,
            counts.notes
        ),
        LoadStatus::Missing => info!(
            "event=data_load module=cli status=missing path={}",
            path.display()
        ),
        LoadStatus::Recovered { error } => {
            warn!(
                "event=data_load module=cli status=recovered path={} error={error}",
                path.display()
            );
            eprintln!(
                "warning: could not fully read {} ({error}); continuing with what was recovered",
                path.display()
            );
        }
    }
}
