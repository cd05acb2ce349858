//! Path resolution for jornada configuration and data files.
//!
//! All jornada data is stored in `~/.jornada/` (or `$JORNADA_HOME`):
//! - `config.yaml` - Settings file
//! - `jornada.db` - SQLite database holding the plan configuration and timer state
//! - `tasks.json` - Default work-item file

use std::path::PathBuf;

use crate::error::JornadaError;

/// Environment variable overriding the data root.
pub const HOME_ENV: &str = "JORNADA_HOME";

/// Paths to jornada configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.jornada/`
    pub root: PathBuf,
    /// Settings file: `~/.jornada/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.jornada/jornada.db`
    pub database: PathBuf,
    /// Work-item file: `~/.jornada/tasks.json`
    pub tasks_file: PathBuf,
}

impl Paths {
    /// Resolve paths from `$JORNADA_HOME`, else the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if neither variable is set.
    pub fn new() -> Result<Self, JornadaError> {
        if let Ok(root) = std::env::var(HOME_ENV) {
            if !root.is_empty() {
                return Ok(Self::with_root(PathBuf::from(root)));
            }
        }

        let home = std::env::var("HOME").map_err(|_| {
            JornadaError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".jornada")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("jornada.db"),
            tasks_file: root.join("tasks.json"),
            root,
        }
    }

    /// Ensure the root directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), JornadaError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                JornadaError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }

        Ok(())
    }
}
