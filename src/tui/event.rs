//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::error::JornadaError;
use crate::focus::{EngineState, PlanConfig};
use crate::storage::KeyValueStore;
use crate::tui::app::{App, HELP};

/// Action to take after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Pause a running countdown or resume a paused one.
    TogglePause,
    /// Start the jornada.
    Start,
    /// Skip to the next session.
    Skip,
    /// Restart the previous session.
    Back,
    /// Abandon the jornada.
    Stop,
}

/// Map a key press to an action.
#[must_use]
pub fn action_for_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(' ' | 'p') => Some(Action::TogglePause),
        KeyCode::Char('s') | KeyCode::Enter => Some(Action::Start),
        KeyCode::Char('n') | KeyCode::Right => Some(Action::Skip),
        KeyCode::Char('b') | KeyCode::Left => Some(Action::Back),
        KeyCode::Char('x') => Some(Action::Stop),
        _ => None,
    }
}

/// Handle terminal events, waiting at most `timeout`.
///
/// Returns an action to take, or None if no action is needed.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn handle_events<S, C>(
    app: &mut App<S, C>,
    timeout: Duration,
) -> Result<Option<Action>, JornadaError>
where
    S: KeyValueStore<EngineState>,
    C: KeyValueStore<PlanConfig>,
{
    if !event::poll(timeout)? {
        return Ok(None);
    }

    if let Event::Key(key) = event::read()? {
        if key.kind != KeyEventKind::Press {
            return Ok(None);
        }
        if key.code == KeyCode::Char('?') {
            app.status = Some(HELP.to_string());
            return Ok(None);
        }
        return Ok(action_for_key(key.code, key.modifiers));
    }

    Ok(None)
}
