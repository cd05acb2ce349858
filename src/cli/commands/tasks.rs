//! Work-item queue commands.

use colored::Colorize;

use super::Context;
use crate::cli::args::{OutputFormat, TasksCommands};
use crate::error::JornadaError;
use crate::focus::Persistence;
use crate::output::{format_queue, format_work_items};
use crate::tasks::{self, WorkItem, WorkItemProvider};

/// Execute tasks subcommands.
///
/// # Errors
///
/// Returns an error if the work-item file cannot be read, a work item to add
/// does not exist or is not open, or the engine cannot be opened.
pub fn tasks(ctx: &Context, cmd: TasksCommands) -> Result<String, JornadaError> {
    let provider = ctx.provider();

    if matches!(cmd, TasksCommands::Available) {
        let items = tasks::available(&provider)?;
        return format_work_items(&items, "Available", ctx.format);
    }

    let mut engine = ctx.open_engine()?;
    let persistence = match cmd {
        TasksCommands::Available | TasksCommands::List => None,
        TasksCommands::Add { id } => {
            let item = require_available(&provider, &id)?;
            tracing::debug!(id = %item.id, title = %item.title, "queueing work item");
            Some(engine.add_work_item(item.id))
        }
        TasksCommands::Remove { id } => {
            if !engine.work_item_ids().contains(&id) {
                return Err(JornadaError::NotFound(format!("work item '{id}' is not queued")));
            }
            Some(engine.remove_work_item(&id))
        }
        TasksCommands::Set { ids } => Some(engine.set_work_items(ids)),
        TasksCommands::Clear => Some(engine.set_work_items(Vec::new())),
    };

    let shown = format_queue(engine.work_item_ids(), &ctx.known_items(), ctx.format)?;

    match (ctx.format, persistence) {
        (OutputFormat::Pretty, Some(Persistence::Degraded { reason })) => Ok(format!(
            "{shown}\n{} queue not saved: {reason}",
            "warning:".yellow().bold()
        )),
        _ => Ok(shown),
    }
}

/// Look up a work item that may be queued.
fn require_available(
    provider: &dyn WorkItemProvider,
    id: &str,
) -> Result<WorkItem, JornadaError> {
    let item = tasks::find(provider, id)?
        .ok_or_else(|| JornadaError::NotFound(format!("work item '{id}'")))?;

    if !item.is_available() {
        return Err(JornadaError::Config(format!(
            "work item '{id}' is {} and cannot be queued",
            item.status
        )));
    }
    Ok(item)
}
