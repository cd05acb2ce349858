//! Command implementations for jornada.
//!
//! Each command opens what it needs from the data root, performs one action
//! and returns the text to print.

mod config;
mod plan;
mod shell;
mod tasks;
mod timer;

pub use config::config;
pub use plan::plan;
pub use shell::{completion_install_instructions, completions, generate_completions, shell_from_str};
pub use tasks::tasks;
pub use timer::{back, pause, resume, skip, start, status, stop};

use std::rc::Rc;

use crate::cli::args::OutputFormat;
use crate::config::{Paths, Settings};
use crate::error::JornadaError;
use crate::focus::{EngineState, PlanConfig, TimerEngine};
use crate::output::StatusView;
use crate::storage::{Database, SqliteStore, CONFIG_KEY, STATE_KEY};
use crate::tasks::{JsonFileProvider, WorkItem, WorkItemProvider};

/// Timer engine backed by the jornada database.
pub type Engine = TimerEngine<SqliteStore<EngineState>, SqliteStore<PlanConfig>>;

/// Everything a command needs from the environment.
pub struct Context {
    pub paths: Paths,
    pub settings: Settings,
    pub format: OutputFormat,
}

impl Context {
    #[must_use]
    pub const fn new(paths: Paths, settings: Settings, format: OutputFormat) -> Self {
        Self {
            paths,
            settings,
            format,
        }
    }

    /// Open the database and restore the timer engine from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory or database cannot be opened,
    /// or if the `[plan]` settings are invalid.
    pub fn open_engine(&self) -> Result<Engine, JornadaError> {
        self.paths.ensure_dirs()?;
        let db = Rc::new(Database::open_at(&self.paths.database)?);
        let defaults = self.settings.plan.to_config()?;

        let engine = TimerEngine::open_with_defaults(
            SqliteStore::new(Rc::clone(&db), STATE_KEY),
            SqliteStore::new(db, CONFIG_KEY),
            defaults,
        )
        .with_tick_interval(self.settings.tick_interval());

        Ok(engine)
    }

    /// Work-item provider configured for this data root.
    #[must_use]
    pub fn provider(&self) -> JsonFileProvider {
        JsonFileProvider::new(self.settings.tasks_file(&self.paths))
    }

    /// Work items used to put titles next to ids.
    ///
    /// A broken work-item file only costs the titles, so errors are logged
    /// and an empty list returned.
    #[must_use]
    pub fn known_items(&self) -> Vec<WorkItem> {
        self.provider().work_items().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read work items");
            Vec::new()
        })
    }
}

/// Render the engine's status.
///
/// # Errors
///
/// Returns an error if output formatting fails.
pub fn render_status(engine: &Engine, items: &[WorkItem], format: OutputFormat) -> Result<String, JornadaError> {
    let view = StatusView::new(
        engine.state(),
        engine.plan_summary(),
        engine.progress(),
        engine.persistence(),
        items,
    );
    crate::output::format_status(&view, format)
}
