//! jornada - focus-session planner and resumable Pomodoro timer
//!
//! Splits a work period into focus sessions and breaks, assigns queued work
//! items to the focus sessions, and runs a countdown whose full state is
//! saved on every transition so any process can resume it.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod focus;
pub mod output;
pub mod storage;
pub mod tasks;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::JornadaError;
pub use focus::{Persistence, TimerEngine};
