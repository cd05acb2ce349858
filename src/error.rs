//! Error types for jornada.

use thiserror::Error;

use crate::focus::Phase;

/// Errors produced by the planner, the timer engine and its collaborators.
#[derive(Debug, Error)]
pub enum JornadaError {
    /// Invalid configuration or settings.
    #[error("configuration error: {0}")]
    Config(String),

    /// SQLite failure.
    #[error("database error: {0}")]
    Database(String),

    /// Malformed input (settings file, work-item file, CLI value).
    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A referenced work item or record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// An action was requested in a phase that does not accept it.
    #[error("cannot {action} while {phase}")]
    InvalidTransition {
        /// The rejected action.
        action: &'static str,
        /// Phase the engine was in.
        phase: Phase,
    },

    /// The configuration leaves no room for a single focus session.
    #[error(
        "nothing to start: a {total}-minute jornada cannot hold a {focus}-minute focus session"
    )]
    EmptyPlan {
        /// Configured total duration in minutes.
        total: u32,
        /// Configured focus length in minutes.
        focus: u32,
    },
}

impl JornadaError {
    /// Exit code used by the binary for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Parse(_) => 2,
            Self::InvalidTransition { .. } | Self::EmptyPlan { .. } => 3,
            Self::NotFound(_) => 4,
            Self::Database(_) | Self::Io(_) | Self::Json(_) => 1,
        }
    }
}

impl From<rusqlite::Error> for JornadaError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Database(e.to_string())
    }
}
