//! Application state for the TUI.

use std::time::{Duration, Instant};

use crate::error::JornadaError;
use crate::focus::{EngineState, Persistence, Phase, PlanConfig, Session, TimerEngine};
use crate::storage::KeyValueStore;
use crate::tasks::{title_for, WorkItem};
use crate::tui::event::Action;

/// Longest wait for input before the loop checks the timer again.
pub const IDLE_POLL: Duration = Duration::from_millis(100);

/// Help text shown in the status bar.
pub const HELP: &str = "space:pause/resume | n:next | b:back | s:start | x:stop | q:quit";

/// Application state.
pub struct App<S, C> {
    engine: TimerEngine<S, C>,
    items: Vec<WorkItem>,
    /// Status message to display.
    pub status: Option<String>,
    bell: bool,
    bell_pending: bool,
    position: (Phase, usize),
}

impl<S, C> App<S, C>
where
    S: KeyValueStore<EngineState>,
    C: KeyValueStore<PlanConfig>,
{
    /// Create a new app around a restored engine.
    pub fn new(engine: TimerEngine<S, C>, items: Vec<WorkItem>, bell: bool) -> Self {
        let position = (engine.phase(), engine.current_index());
        Self {
            engine,
            items,
            status: Some("Press ? for help".to_string()),
            bell,
            bell_pending: false,
            position,
        }
    }

    #[must_use]
    pub const fn engine(&self) -> &TimerEngine<S, C> {
        &self.engine
    }

    /// Display title for a work-item id.
    #[must_use]
    pub fn title_for<'a>(&'a self, id: &'a str) -> &'a str {
        title_for(&self.items, id)
    }

    /// Sessions to list: the running plan, or the preview while in setup.
    #[must_use]
    pub fn sessions(&self) -> Vec<Session> {
        match self.engine.phase() {
            Phase::Setup => self.engine.preview(),
            Phase::Active | Phase::Completed => self.engine.sessions().to_vec(),
        }
    }

    /// How long to wait for input before the next tick is due.
    #[must_use]
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.engine
            .until_next_tick(now)
            .map_or(IDLE_POLL, |due| due.min(IDLE_POLL))
    }

    /// Apply a user action.
    pub fn apply(&mut self, action: Action) {
        let result = match action {
            Action::Quit => return,
            Action::TogglePause => {
                if self.engine.is_paused() {
                    self.engine.resume().map(|p| (p, "Resumed"))
                } else {
                    self.engine.pause().map(|p| (p, "Paused"))
                }
            }
            Action::Start => self.engine.start().map(|p| (p, "Started")),
            Action::Skip => self.engine.skip_forward().map(|p| (p, "Skipped")),
            Action::Back => self.engine.skip_back().map(|p| (p, "Back")),
            Action::Stop => Ok((self.engine.stop(), "Stopped")),
        };
        self.report(result);
        self.position = (self.engine.phase(), self.engine.current_index());
    }

    /// Adopt changes from other processes, then apply due ticks.
    ///
    /// External writes are taken in first so a due tick cannot overwrite
    /// them. Queues the bell when the countdown moves to another session on
    /// its own.
    pub fn on_tick(&mut self, now: Instant) {
        if self.engine.sync_external() {
            self.status = Some("Updated from another session".to_string());
            self.position = (self.engine.phase(), self.engine.current_index());
        }

        let ticks = self.engine.pump(now);
        let position = (self.engine.phase(), self.engine.current_index());
        if position != self.position {
            if ticks > 0 && self.bell {
                self.bell_pending = true;
            }
            self.position = position;
        }
    }

    /// Take a queued bell, if any.
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell_pending)
    }

    fn report(&mut self, result: Result<(Persistence, &str), JornadaError>) {
        self.status = Some(match result {
            Ok((Persistence::Durable, message)) => message.to_string(),
            Ok((Persistence::Degraded { reason }, message)) => {
                format!("{message} (not saved: {reason})")
            }
            Err(e) => e.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    type TestApp = App<MemoryStore<EngineState>, MemoryStore<PlanConfig>>;

    fn small_config() -> PlanConfig {
        PlanConfig {
            total_duration_minutes: 70,
            focus_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            long_break_interval: 2,
        }
    }

    fn app(bell: bool) -> TestApp {
        let engine = TimerEngine::open_with_defaults(
            MemoryStore::new(),
            MemoryStore::new(),
            small_config(),
        )
        .with_tick_interval(Duration::from_millis(10));
        App::new(engine, Vec::new(), bell)
    }

    /// An app plus independent handles on the stores it writes to.
    fn shared_app() -> (TestApp, MemoryStore<EngineState>, MemoryStore<PlanConfig>) {
        let state_store = MemoryStore::new();
        let config_store = MemoryStore::new();
        let state = state_store.handle();
        let config = config_store.handle();
        let engine = TimerEngine::open_with_defaults(state_store, config_store, small_config())
            .with_tick_interval(Duration::from_millis(10));
        (App::new(engine, Vec::new(), true), state, config)
    }

    #[test]
    fn test_setup_lists_preview() {
        let app = app(false);
        assert_eq!(app.engine().phase(), Phase::Setup);
        assert_eq!(app.sessions().len(), 4);
    }

    #[test]
    fn test_toggle_pause() {
        let mut app = app(false);
        app.apply(Action::Start);
        assert!(!app.engine().is_paused());

        app.apply(Action::TogglePause);
        assert!(app.engine().is_paused());
        assert_eq!(app.status.as_deref(), Some("Paused"));

        app.apply(Action::TogglePause);
        assert!(!app.engine().is_paused());
    }

    #[test]
    fn test_invalid_action_shows_error() {
        let mut app = app(false);
        app.apply(Action::Skip);

        assert_eq!(app.engine().phase(), Phase::Setup);
        assert!(app.status.as_deref().unwrap_or_default().contains("cannot"));
    }

    #[test]
    fn test_poll_timeout_idle_when_not_ticking() {
        let app = app(false);
        assert_eq!(app.poll_timeout(Instant::now()), IDLE_POLL);
    }

    #[test]
    fn test_poll_timeout_bounded_by_tick() {
        let mut app = app(false);
        app.apply(Action::Start);
        assert!(app.poll_timeout(Instant::now()) <= Duration::from_millis(10));
    }

    #[test]
    fn test_bell_on_session_change_from_ticks() {
        let mut app = app(true);
        app.apply(Action::Start);

        // Enough ticks to finish the first 25-minute focus session.
        let later = Instant::now() + Duration::from_millis(10 * 1500 + 5);
        app.on_tick(later);

        assert_eq!(app.engine().current_index(), 1);
        assert!(app.take_bell());
        assert!(!app.take_bell());
    }

    #[test]
    fn test_no_bell_for_user_skip() {
        let mut app = app(true);
        app.apply(Action::Start);
        app.apply(Action::Skip);
        app.on_tick(Instant::now());

        assert_eq!(app.engine().current_index(), 1);
        assert!(!app.take_bell());
    }

    #[test]
    fn test_no_bell_when_disabled() {
        let mut app = app(false);
        app.apply(Action::Start);
        let later = Instant::now() + Duration::from_millis(10 * 1500 + 5);
        app.on_tick(later);

        assert!(!app.take_bell());
    }

    #[test]
    fn test_external_pause_survives_due_tick() {
        let (mut app, state, config) = shared_app();
        app.apply(Action::Start);

        let mut other = TimerEngine::open(state.handle(), config.handle());
        other.pause().unwrap();

        app.on_tick(Instant::now() + Duration::from_millis(15));

        assert!(app.engine().is_paused());
        assert_eq!(app.engine().state().remaining_seconds, 1500);
        assert!(state.get().unwrap().unwrap().is_paused);
        assert_eq!(app.status.as_deref(), Some("Updated from another session"));
        assert!(!app.take_bell());
    }

    #[test]
    fn test_external_skip_does_not_ring() {
        let (mut app, state, config) = shared_app();
        app.apply(Action::Start);

        let mut other = TimerEngine::open(state.handle(), config.handle());
        other.skip_forward().unwrap();

        app.on_tick(Instant::now() + Duration::from_millis(15));

        assert_eq!(app.engine().current_index(), 1);
        assert_eq!(state.get().unwrap().unwrap().current_index, 1);
        assert!(!app.take_bell());
    }
}
