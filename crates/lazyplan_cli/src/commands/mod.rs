//! Subcommand handlers. Each returns the JSON value `main` prints.

use crate::{dispatch, Commands, SearchAction};
use anyhow::{bail, Context, Result};
use lazyplan_core::{EntityKind, Planner, StoreBackend};
use serde_json::{json, Value};

mod items;
mod relations;

pub(crate) fn run<B: StoreBackend>(planner: &mut Planner<B>, command: Commands) -> Result<Value> {
    match command {
        Commands::Event { action } => items::event(planner, action),
        Commands::Todo { action } => items::todo(planner, action),
        Commands::Goal { action } => items::goal(planner, action),
        Commands::Note { action } => items::note(planner, action),
        Commands::DepNote { action } => relations::dependent_note(planner, action),
        Commands::Link { action } => relations::link(planner, action),
        Commands::Search { action } => search(planner, action),
        Commands::Tool { name, args } => {
            let args: Value = serde_json::from_str(&args)
                .with_context(|| format!("--args is not valid JSON: {args}"))?;
            Ok(dispatch::execute_tool(planner, &name, &args))
        }
        Commands::Tools => Ok(json!(dispatch::TOOL_NAMES)),
    }
}

fn search<B: StoreBackend>(planner: &Planner<B>, action: SearchAction) -> Result<Value> {
    let value = match action {
        SearchAction::Title { kind, query } => match kind {
            EntityKind::Event => json!(planner.search_events_by_title(&query)),
            EntityKind::Todo => json!(planner.search_todos_by_title(&query)),
            EntityKind::Goal => json!(planner.search_goals_by_title(&query)),
            EntityKind::Note => bail!("title search covers event, todo or goal"),
        },
        SearchAction::Tag { tag, kind: None } => json!(planner.search_all_by_tag(&tag)),
        SearchAction::Tag {
            tag,
            kind: Some(kind),
        } => match kind {
            EntityKind::Event => json!(planner.search_events_by_tag(&tag)),
            EntityKind::Todo => json!(planner.search_todos_by_tag(&tag)),
            EntityKind::Goal => json!(planner.search_goals_by_tag(&tag)),
            EntityKind::Note => bail!("notes carry no tags"),
        },
    };
    Ok(value)
}
