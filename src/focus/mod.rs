//! Focus-session planning and the resumable timer.
//!
//! - Plan a jornada into focus and break sessions
//! - Spread queued work items over the focus sessions
//! - Summarise a plan for preview
//! - Run the countdown, surviving restarts

pub mod distributor;
pub mod engine;
pub mod format;
pub mod planner;
pub mod state;
pub mod summary;
pub mod ticker;

pub use distributor::distribute;
pub use engine::{Persistence, TimerEngine};
pub use format::{
    format_minutes_as_hours_minutes, format_seconds_as_timer, parse_minutes, render_progress_bar,
};
pub use planner::plan;
pub use state::{EngineState, Phase, PlanConfig, Session, SessionKind, MAX_DURATION_MINUTES};
pub use summary::{summarize, PlanSummary};
pub use ticker::{Ticker, TICK_INTERVAL};
