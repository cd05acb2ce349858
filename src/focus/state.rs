//! Plan configuration, sessions and the persisted engine state.
//!
//! The serde layout of these types is the persisted JSON format, shared with
//! every other process reading the same store. Field names are camelCase and
//! must not change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::JornadaError;

/// Duration settings for one jornada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanConfig {
    /// Length of the whole work period.
    pub total_duration_minutes: u32,
    /// Length of each focus session.
    pub focus_minutes: u32,
    /// Length of a short break.
    pub short_break_minutes: u32,
    /// Length of a long break.
    pub long_break_minutes: u32,
    /// A long break follows every n-th focus session.
    pub long_break_interval: u32,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            total_duration_minutes: 240,
            focus_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            long_break_interval: 4,
        }
    }
}

/// Upper bound for every duration field: one week.
pub const MAX_DURATION_MINUTES: u32 = 7 * 24 * 60;

impl PlanConfig {
    /// Check that every field is positive and every duration is at most
    /// [`MAX_DURATION_MINUTES`].
    ///
    /// Planning with a zero focus length would never terminate, so every
    /// caller must run this before handing a configuration to the planner.
    ///
    /// # Errors
    ///
    /// Returns `JornadaError::Config` naming the first field out of range.
    pub fn validate(&self) -> Result<(), JornadaError> {
        let durations = [
            ("totalDurationMinutes", self.total_duration_minutes),
            ("focusMinutes", self.focus_minutes),
            ("shortBreakMinutes", self.short_break_minutes),
            ("longBreakMinutes", self.long_break_minutes),
        ];

        for (name, value) in durations {
            if value == 0 {
                return Err(JornadaError::Config(format!(
                    "{name} must be greater than zero"
                )));
            }
            if value > MAX_DURATION_MINUTES {
                return Err(JornadaError::Config(format!(
                    "{name} must be at most {MAX_DURATION_MINUTES} minutes"
                )));
            }
        }

        if self.long_break_interval == 0 {
            return Err(JornadaError::Config(
                "longBreakInterval must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Kind of interval in a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Focus,
    ShortBreak,
    LongBreak,
}

impl SessionKind {
    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Focus => "Focus",
            Self::ShortBreak => "Short Break",
            Self::LongBreak => "Long Break",
        }
    }

    /// Check if this is a break type.
    #[must_use]
    pub const fn is_break(&self) -> bool {
        matches!(self, Self::ShortBreak | Self::LongBreak)
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One interval of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Position in the plan, starting at 0.
    pub index: usize,
    #[serde(rename = "type")]
    pub kind: SessionKind,
    pub duration_minutes: u32,
    /// Work item assigned by the distributor. Always `None` for breaks.
    #[serde(rename = "taskId")]
    pub work_item_id: Option<String>,
    pub label: String,
}

impl Session {
    /// Full length of this session in seconds.
    #[must_use]
    pub const fn duration_seconds(&self) -> u32 {
        self.duration_minutes.saturating_mul(60)
    }
}

/// Top-level state of the timer engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Setup,
    Active,
    Completed,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Setup => write!(f, "setup"),
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// The full snapshot written to the state store on every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineState {
    pub phase: Phase,
    /// Configuration the current plan was built from.
    pub config: PlanConfig,
    pub sessions: Vec<Session>,
    /// Work items queued for the next start.
    #[serde(rename = "taskIds")]
    pub work_item_ids: Vec<String>,
    #[serde(rename = "currentSessionIndex")]
    pub current_index: usize,
    #[serde(rename = "timeRemainingSeconds")]
    pub remaining_seconds: u32,
    pub is_paused: bool,
    pub started_at: Option<DateTime<Utc>>,
}

impl EngineState {
    /// Setup defaults carrying the given configuration.
    #[must_use]
    pub const fn setup(config: PlanConfig) -> Self {
        Self {
            phase: Phase::Setup,
            config,
            sessions: Vec::new(),
            work_item_ids: Vec::new(),
            current_index: 0,
            remaining_seconds: 0,
            is_paused: false,
            started_at: None,
        }
    }

    /// The session the countdown is on, if any.
    #[must_use]
    pub fn current_session(&self) -> Option<&Session> {
        if self.phase == Phase::Setup {
            return None;
        }
        self.sessions.get(self.current_index)
    }

    /// Whether the tick source should be running for this state.
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.phase == Phase::Active && !self.is_paused
    }

    /// Bring a state loaded from storage back within its invariants.
    ///
    /// Returns a description of each repair made; an empty list means the
    /// state was already consistent.
    pub fn repair(&mut self) -> Vec<String> {
        let mut repairs = Vec::new();

        match self.phase {
            Phase::Setup => {
                let clean = self.sessions.is_empty()
                    && self.current_index == 0
                    && self.remaining_seconds == 0
                    && !self.is_paused
                    && self.started_at.is_none();
                if !clean {
                    repairs.push("setup state carried a leftover plan".to_string());
                    self.reset_plan();
                }
            }
            Phase::Active | Phase::Completed => {
                if self.sessions.is_empty() {
                    repairs.push(format!("{} state had no sessions", self.phase));
                    self.reset_plan();
                } else if self.current_index >= self.sessions.len() {
                    repairs.push(format!(
                        "session index {} out of range for {} sessions",
                        self.current_index,
                        self.sessions.len()
                    ));
                    self.reset_plan();
                } else {
                    let limit = self.sessions[self.current_index].duration_seconds();
                    if self.remaining_seconds > limit {
                        repairs.push(format!(
                            "remaining time {}s exceeds session length {limit}s",
                            self.remaining_seconds
                        ));
                        self.remaining_seconds = limit;
                    }
                }
            }
        }

        repairs
    }

    // Queued work items survive a repair; only the plan is discarded.
    fn reset_plan(&mut self) {
        let work_item_ids = std::mem::take(&mut self.work_item_ids);
        *self = Self::setup(self.config);
        self.work_item_ids = work_item_ids;
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::setup(PlanConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn focus(index: usize, minutes: u32) -> Session {
        Session {
            index,
            kind: SessionKind::Focus,
            duration_minutes: minutes,
            work_item_id: None,
            label: format!("Focus #{}", index + 1),
        }
    }

    #[test]
    fn test_validate_rejects_zero_fields() {
        assert!(PlanConfig::default().validate().is_ok());

        let config = PlanConfig {
            focus_minutes: 0,
            ..PlanConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("focusMinutes"));

        let config = PlanConfig {
            long_break_interval: 0,
            ..PlanConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_durations_at_one_week() {
        let at_bound = PlanConfig {
            total_duration_minutes: MAX_DURATION_MINUTES,
            focus_minutes: MAX_DURATION_MINUTES,
            short_break_minutes: MAX_DURATION_MINUTES,
            long_break_minutes: MAX_DURATION_MINUTES,
            long_break_interval: u32::MAX,
        };
        assert!(at_bound.validate().is_ok());

        let config = PlanConfig {
            total_duration_minutes: 80_000_000,
            focus_minutes: 80_000_000,
            ..PlanConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, JornadaError::Config(_)));
        assert!(err.to_string().contains("totalDurationMinutes"));

        let config = PlanConfig {
            long_break_minutes: MAX_DURATION_MINUTES + 1,
            ..PlanConfig::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("at most"));
    }

    #[test]
    fn test_duration_seconds_saturates() {
        assert_eq!(focus(0, 25).duration_seconds(), 1500);
        assert_eq!(focus(0, u32::MAX).duration_seconds(), u32::MAX);
    }

    #[test]
    fn test_setup_state_json_shape() {
        let state = EngineState::setup(PlanConfig::default());
        let value = serde_json::to_value(&state).unwrap();

        assert_eq!(value["phase"], "setup");
        assert_eq!(value["config"]["totalDurationMinutes"], 240);
        assert_eq!(value["config"]["longBreakInterval"], 4);
        assert_eq!(value["taskIds"], serde_json::json!([]));
        assert_eq!(value["currentSessionIndex"], 0);
        assert_eq!(value["timeRemainingSeconds"], 0);
        assert_eq!(value["isPaused"], false);
        assert!(value["startedAt"].is_null());
    }

    #[test]
    fn test_session_json_shape() {
        let session = Session {
            index: 1,
            kind: SessionKind::ShortBreak,
            duration_minutes: 5,
            work_item_id: None,
            label: "Short Break".to_string(),
        };
        let value = serde_json::to_value(&session).unwrap();

        assert_eq!(value["type"], "short_break");
        assert_eq!(value["durationMinutes"], 5);
        assert!(value["taskId"].is_null());
        assert_eq!(value["label"], "Short Break");
    }

    #[test]
    fn test_parse_persisted_active_state() {
        let json = r#"{
            "phase": "active",
            "config": {"totalDurationMinutes": 70, "focusMinutes": 25,
                       "shortBreakMinutes": 5, "longBreakMinutes": 15, "longBreakInterval": 2},
            "sessions": [{"index": 0, "type": "focus", "durationMinutes": 25,
                          "taskId": "A", "label": "Focus #1"}],
            "taskIds": ["A"],
            "currentSessionIndex": 0,
            "timeRemainingSeconds": 1200,
            "isPaused": true,
            "startedAt": "2026-10-15T09:00:00Z"
        }"#;

        let state: EngineState = serde_json::from_str(json).unwrap();
        assert_eq!(state.phase, Phase::Active);
        assert_eq!(state.sessions[0].work_item_id.as_deref(), Some("A"));
        assert_eq!(state.remaining_seconds, 1200);
        assert!(state.is_paused);
        assert!(state.started_at.is_some());
    }

    #[test]
    fn test_repair_clamps_remaining() {
        let mut state = EngineState::setup(PlanConfig::default());
        state.phase = Phase::Active;
        state.sessions = vec![focus(0, 25)];
        state.remaining_seconds = 9999;

        let repairs = state.repair();
        assert_eq!(repairs.len(), 1);
        assert_eq!(state.remaining_seconds, 1500);
        assert_eq!(state.phase, Phase::Active);
    }

    #[test]
    fn test_repair_resets_out_of_range_index() {
        let mut state = EngineState::setup(PlanConfig::default());
        state.phase = Phase::Active;
        state.sessions = vec![focus(0, 25)];
        state.current_index = 3;

        assert!(!state.repair().is_empty());
        assert_eq!(state, EngineState::setup(PlanConfig::default()));
    }

    #[test]
    fn test_repair_leaves_consistent_state_alone() {
        let mut state = EngineState::setup(PlanConfig::default());
        state.work_item_ids = vec!["A".to_string()];
        assert!(state.repair().is_empty());
        assert_eq!(state.work_item_ids, vec!["A".to_string()]);
    }

    #[test]
    fn test_current_session_hidden_in_setup() {
        let state = EngineState::default();
        assert!(state.current_session().is_none());
        assert!(!state.is_ticking());
    }
}
