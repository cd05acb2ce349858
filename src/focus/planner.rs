//! Session planning.
//!
//! Packs a jornada into alternating focus and break sessions.
//!
//! Long breaks are placed greedily whenever they fit in the remaining budget,
//! even as the final session. Short breaks are only placed when another focus
//! session can still follow them, so a plan never ends on a short break.
//! This asymmetry may be unintended; saved plans rely on it, so it stays.

use super::state::{PlanConfig, Session, SessionKind};

/// Build the ordered session list for a configuration.
///
/// The configuration must have passed [`PlanConfig::validate`]; a zero focus
/// length would never terminate. Assigned work items are left empty.
#[must_use]
pub fn plan(config: &PlanConfig) -> Vec<Session> {
    debug_assert!(
        config.validate().is_ok(),
        "planning an invalid configuration: {config:?}"
    );

    let total = config.total_duration_minutes;
    let focus = config.focus_minutes;
    let fits = |used: u32, extra: u32| used.checked_add(extra).is_some_and(|end| end <= total);

    let mut sessions = Vec::new();
    let mut time_used: u32 = 0;
    let mut focus_count: u32 = 0;

    while fits(time_used, focus) {
        focus_count += 1;
        time_used += focus;
        push(
            &mut sessions,
            SessionKind::Focus,
            focus,
            format!("Focus #{focus_count}"),
        );

        if focus_count % config.long_break_interval == 0 {
            let long = config.long_break_minutes;
            if fits(time_used, long) {
                time_used += long;
                push(
                    &mut sessions,
                    SessionKind::LongBreak,
                    long,
                    SessionKind::LongBreak.display_name().to_string(),
                );
            }
        } else {
            let short = config.short_break_minutes;
            if fits(time_used, short) && fits(time_used, short.saturating_add(focus)) {
                time_used += short;
                push(
                    &mut sessions,
                    SessionKind::ShortBreak,
                    short,
                    SessionKind::ShortBreak.display_name().to_string(),
                );
            }
        }
    }

    sessions
}

fn push(sessions: &mut Vec<Session>, kind: SessionKind, minutes: u32, label: String) {
    sessions.push(Session {
        index: sessions.len(),
        kind,
        duration_minutes: minutes,
        work_item_id: None,
        label,
    });
}
