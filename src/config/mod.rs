//! Configuration management for jornada.
//!
//! This module handles loading settings from `~/.jornada/`.

mod paths;
mod settings;

pub use paths::{Paths, HOME_ENV};
pub use settings::{ColorSetting, GeneralSettings, PlanDefaults, Settings, TaskSettings, TimerSettings};
