//! Plan preview.

use super::Context;
use crate::error::JornadaError;
use crate::focus::{distribute, summarize};
use crate::output::format_plan;

/// Preview the sessions `start` would create.
///
/// With `work_item_ids` empty the queued work items are used; otherwise the
/// given ids are distributed instead. Nothing is saved either way.
///
/// # Errors
///
/// Returns an error if the engine cannot be opened or output formatting fails.
pub fn plan(ctx: &Context, work_item_ids: &[String]) -> Result<String, JornadaError> {
    let engine = ctx.open_engine()?;

    let sessions = if work_item_ids.is_empty() {
        engine.preview()
    } else {
        distribute(&engine.preview(), work_item_ids)
    };
    let summary = summarize(&sessions);

    format_plan(
        &sessions,
        &summary,
        engine.config(),
        &ctx.known_items(),
        ctx.format,
    )
}
