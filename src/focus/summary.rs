//! Plan summaries for preview display.

use serde::{Deserialize, Serialize};

use super::format::format_minutes_as_hours_minutes;
use super::state::{Session, SessionKind};

/// Counts and totals for a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub focus_count: usize,
    pub short_break_count: usize,
    pub long_break_count: usize,
    pub total_focus_minutes: u32,
    pub total_break_minutes: u32,
    pub total_minutes: u32,
}

impl PlanSummary {
    /// One-line description, e.g. `4 focus (1h 40m), 3 breaks (25m)`.
    #[must_use]
    pub fn describe(&self) -> String {
        let breaks = self.short_break_count + self.long_break_count;
        format!(
            "{} focus ({}), {} break{} ({})",
            self.focus_count,
            format_minutes_as_hours_minutes(self.total_focus_minutes),
            breaks,
            if breaks == 1 { "" } else { "s" },
            format_minutes_as_hours_minutes(self.total_break_minutes),
        )
    }
}

/// Tally a session list in a single pass.
#[must_use]
pub fn summarize(sessions: &[Session]) -> PlanSummary {
    sessions
        .iter()
        .fold(PlanSummary::default(), |mut summary, session| {
            match session.kind {
                SessionKind::Focus => {
                    summary.focus_count += 1;
                    summary.total_focus_minutes += session.duration_minutes;
                }
                SessionKind::ShortBreak => {
                    summary.short_break_count += 1;
                    summary.total_break_minutes += session.duration_minutes;
                }
                SessionKind::LongBreak => {
                    summary.long_break_count += 1;
                    summary.total_break_minutes += session.duration_minutes;
                }
            }
            summary.total_minutes += session.duration_minutes;
            summary
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::planner::plan;
    use crate::focus::state::PlanConfig;

    #[test]
    fn test_summarize_seventy_minutes() {
        let sessions = plan(&PlanConfig {
            total_duration_minutes: 70,
            focus_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            long_break_interval: 2,
        });
        let summary = summarize(&sessions);

        assert_eq!(summary.focus_count, 2);
        assert_eq!(summary.short_break_count, 1);
        assert_eq!(summary.long_break_count, 1);
        assert_eq!(summary.total_focus_minutes, 50);
        assert_eq!(summary.total_break_minutes, 20);
        assert_eq!(summary.total_minutes, 70);
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&[]), PlanSummary::default());
    }

    #[test]
    fn test_describe() {
        let summary = PlanSummary {
            focus_count: 4,
            short_break_count: 2,
            long_break_count: 1,
            total_focus_minutes: 100,
            total_break_minutes: 25,
            total_minutes: 125,
        };
        assert_eq!(summary.describe(), "4 focus (1h 40m), 3 breaks (25m)");
    }
}
