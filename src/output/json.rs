//! JSON output formatting for jornada.

use serde::Serialize;
use serde_json::json;

use crate::error::JornadaError;
use crate::focus::{PlanConfig, PlanSummary, Session};
use crate::tasks::{title_for, WorkItem};

/// Format a plan preview as JSON
///
/// # Errors
///
/// Returns `JornadaError::Json` if JSON serialization fails.
pub fn format_plan_json(
    sessions: &[Session],
    summary: &PlanSummary,
    config: &PlanConfig,
) -> Result<String, JornadaError> {
    let output = json!({
        "config": config,
        "summary": summary,
        "sessions": sessions,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format work items as JSON
///
/// # Errors
///
/// Returns `JornadaError::Json` if JSON serialization fails.
pub fn format_work_items_json(items: &[WorkItem], list_name: &str) -> Result<String, JornadaError> {
    let output = json!({
        "list": list_name,
        "count": items.len(),
        "items": items,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format the queue as JSON, with titles resolved where known
///
/// # Errors
///
/// Returns `JornadaError::Json` if JSON serialization fails.
pub fn format_queue_json(ids: &[String], items: &[WorkItem]) -> Result<String, JornadaError> {
    let queued: Vec<_> = ids
        .iter()
        .map(|id| json!({ "id": id, "title": title_for(items, id) }))
        .collect();
    let output = json!({
        "count": ids.len(),
        "items": queued,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `JornadaError::Json` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, JornadaError> {
    Ok(serde_json::to_string_pretty(value)?)
}
