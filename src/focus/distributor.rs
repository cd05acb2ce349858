//! Work-item distribution across focus sessions.

use super::state::{Session, SessionKind};

/// Assign work items to focus sessions, round-robin.
///
/// Breaks never get a work item and do not consume one. With no work items
/// every session is returned unassigned.
#[must_use]
pub fn distribute(sessions: &[Session], work_item_ids: &[String]) -> Vec<Session> {
    if work_item_ids.is_empty() {
        return sessions
            .iter()
            .map(|s| Session {
                work_item_id: None,
                ..s.clone()
            })
            .collect();
    }

    let mut cursor = 0;
    sessions
        .iter()
        .map(|s| {
            let work_item_id = if s.kind == SessionKind::Focus {
                let id = work_item_ids[cursor % work_item_ids.len()].clone();
                cursor += 1;
                Some(id)
            } else {
                None
            };
            Session {
                work_item_id,
                ..s.clone()
            }
        })
        .collect()
}
