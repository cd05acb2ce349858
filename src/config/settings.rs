//! Settings for jornada.
//!
//! Settings are loaded from `~/.jornada/config.yaml`. Every section and field
//! is optional. The plan configuration proper lives in the database and is
//! edited with `jornada config set`; the `plan` section here only seeds it.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::config::Paths;
use crate::error::JornadaError;
use crate::focus::PlanConfig;

/// Main settings structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// General settings.
    pub general: GeneralSettings,
    /// Plan defaults used before any configuration has been saved.
    pub plan: PlanDefaults,
    /// Work-item source.
    pub tasks: TaskSettings,
    /// Countdown behavior.
    pub timer: TimerSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Color output setting.
    #[serde(default)]
    pub color: ColorSetting,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

impl ColorSetting {
    /// Apply this setting to the `colored` crate.
    pub fn apply(self) {
        match self {
            Self::Auto => colored::control::unset_override(),
            Self::Always => colored::control::set_override(true),
            Self::Never => colored::control::set_override(false),
        }
    }
}

/// Plan defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanDefaults {
    #[serde(default = "default_total_minutes")]
    pub total_duration_minutes: u32,
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(default = "default_short_break")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break")]
    pub long_break_minutes: u32,
    #[serde(default = "default_long_break_interval")]
    pub long_break_interval: u32,
}

/// Work-item source settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TaskSettings {
    /// Path of the work-item JSON file. Defaults to `~/.jornada/tasks.json`.
    pub file: Option<PathBuf>,
}

/// Countdown settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerSettings {
    /// Milliseconds per tick in the interactive timer.
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
    /// Ring the terminal bell when a session ends.
    #[serde(default = "default_true")]
    pub bell: bool,
}

const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_total_minutes() -> u32 {
    240
}

const fn default_focus_minutes() -> u32 {
    25
}

const fn default_short_break() -> u32 {
    5
}

const fn default_long_break() -> u32 {
    15
}

const fn default_long_break_interval() -> u32 {
    4
}

const fn default_tick_millis() -> u64 {
    1000
}

const fn default_true() -> bool {
    true
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            color: ColorSetting::default(),
        }
    }
}

impl Default for PlanDefaults {
    fn default() -> Self {
        Self {
            total_duration_minutes: default_total_minutes(),
            focus_minutes: default_focus_minutes(),
            short_break_minutes: default_short_break(),
            long_break_minutes: default_long_break(),
            long_break_interval: default_long_break_interval(),
        }
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            tick_millis: default_tick_millis(),
            bell: default_true(),
        }
    }
}

impl PlanDefaults {
    /// The plan configuration these defaults describe.
    ///
    /// # Errors
    ///
    /// Returns `JornadaError::Config` if any field is zero.
    pub fn to_config(&self) -> Result<PlanConfig, JornadaError> {
        let config = PlanConfig {
            total_duration_minutes: self.total_duration_minutes,
            focus_minutes: self.focus_minutes,
            short_break_minutes: self.short_break_minutes,
            long_break_minutes: self.long_break_minutes,
            long_break_interval: self.long_break_interval,
        };
        config
            .validate()
            .map_err(|e| JornadaError::Config(format!("invalid [plan] settings: {e}")))?;
        Ok(config)
    }
}

impl Settings {
    /// Load settings from the default path.
    ///
    /// If the settings file doesn't exist, returns defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(paths: &Paths) -> Result<Self, JornadaError> {
        Self::load_from_path(&paths.config_file)
    }

    /// Load settings from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, JornadaError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            JornadaError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            JornadaError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Work-item file, resolved against the data root.
    #[must_use]
    pub fn tasks_file(&self, paths: &Paths) -> PathBuf {
        match &self.tasks.file {
            Some(file) if file.is_relative() => paths.root.join(file),
            Some(file) => file.clone(),
            None => paths.tasks_file.clone(),
        }
    }

    /// Tick cadence for the interactive timer.
    #[must_use]
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timer.tick_millis.max(1))
    }
}
