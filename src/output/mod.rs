//! Output formatting for jornada.
//!
//! Every command renders either human-readable colored text or JSON.

mod json;
mod pretty;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cli::args::OutputFormat;
use crate::error::JornadaError;
use crate::focus::{EngineState, Persistence, Phase, PlanConfig, PlanSummary, Session};
use crate::tasks::WorkItem;

pub use json::*;
pub use pretty::*;

/// Everything the status views show about the timer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView<'a> {
    pub phase: Phase,
    pub is_paused: bool,
    pub current_index: usize,
    pub session_count: usize,
    pub current_session: Option<&'a Session>,
    /// Title of the work item assigned to the current session.
    pub current_work_item: Option<&'a str>,
    pub remaining_seconds: u32,
    pub progress: f64,
    pub started_at: Option<DateTime<Utc>>,
    pub summary: PlanSummary,
    pub persistence: &'a Persistence,
}

impl<'a> StatusView<'a> {
    /// Build a view over a state snapshot.
    #[must_use]
    pub fn new(
        state: &'a EngineState,
        summary: PlanSummary,
        progress: f64,
        persistence: &'a Persistence,
        items: &'a [WorkItem],
    ) -> Self {
        let current_session = state.current_session();
        let current_work_item = current_session
            .and_then(|s| s.work_item_id.as_deref())
            .map(|id| crate::tasks::title_for(items, id));

        Self {
            phase: state.phase,
            is_paused: state.is_paused,
            current_index: state.current_index,
            session_count: state.sessions.len(),
            current_session,
            current_work_item,
            remaining_seconds: state.remaining_seconds,
            progress,
            started_at: state.started_at,
            summary,
            persistence,
        }
    }
}

/// Format a plan preview.
///
/// # Errors
///
/// Returns `JornadaError::Json` if JSON serialization fails.
pub fn format_plan(
    sessions: &[Session],
    summary: &PlanSummary,
    config: &PlanConfig,
    items: &[WorkItem],
    format: OutputFormat,
) -> Result<String, JornadaError> {
    match format {
        OutputFormat::Pretty => Ok(format_plan_pretty(sessions, summary, config, items)),
        OutputFormat::Json => format_plan_json(sessions, summary, config),
    }
}

/// Format the plan configuration.
///
/// # Errors
///
/// Returns `JornadaError::Json` if JSON serialization fails.
pub fn format_config(config: &PlanConfig, format: OutputFormat) -> Result<String, JornadaError> {
    match format {
        OutputFormat::Pretty => Ok(format_config_pretty(config)),
        OutputFormat::Json => to_json(config),
    }
}

/// Format a list of work items.
///
/// # Errors
///
/// Returns `JornadaError::Json` if JSON serialization fails.
pub fn format_work_items(
    items: &[WorkItem],
    title: &str,
    format: OutputFormat,
) -> Result<String, JornadaError> {
    match format {
        OutputFormat::Pretty => Ok(format_work_items_pretty(items, title)),
        OutputFormat::Json => format_work_items_json(items, title),
    }
}

/// Format the queued work-item ids.
///
/// # Errors
///
/// Returns `JornadaError::Json` if JSON serialization fails.
pub fn format_queue(
    ids: &[String],
    items: &[WorkItem],
    format: OutputFormat,
) -> Result<String, JornadaError> {
    match format {
        OutputFormat::Pretty => Ok(format_queue_pretty(ids, items)),
        OutputFormat::Json => format_queue_json(ids, items),
    }
}

/// Format the timer status.
///
/// # Errors
///
/// Returns `JornadaError::Json` if JSON serialization fails.
pub fn format_status(view: &StatusView<'_>, format: OutputFormat) -> Result<String, JornadaError> {
    match format {
        OutputFormat::Pretty => Ok(format_status_pretty(view)),
        OutputFormat::Json => to_json(view),
    }
}
