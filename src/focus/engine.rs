//! The resumable focus timer.
//!
//! `TimerEngine` owns the Setup → Active → Completed state machine. Every
//! transition writes the full [`EngineState`] to the state store, so a new
//! process can pick up exactly where the last one stopped. Time only moves
//! through [`TimerEngine::tick`], driven by the engine's [`Ticker`] when the
//! host calls [`TimerEngine::pump`].

use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::distributor::distribute;
use super::planner::plan;
use super::state::{EngineState, Phase, PlanConfig, Session};
use super::summary::{summarize, PlanSummary};
use super::ticker::Ticker;
use crate::error::JornadaError;
use crate::storage::KeyValueStore;

/// Whether the last write reached the state store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Persistence {
    /// State is saved.
    Durable,
    /// The last write failed; the engine keeps running from memory.
    Degraded { reason: String },
}

impl Persistence {
    #[must_use]
    pub const fn is_durable(&self) -> bool {
        matches!(self, Self::Durable)
    }
}

/// Focus timer state machine bound to its stores.
pub struct TimerEngine<S, C> {
    state_store: S,
    config_store: C,
    config: PlanConfig,
    state: EngineState,
    ticker: Ticker,
    persistence: Persistence,
    external_state: Receiver<EngineState>,
    external_config: Receiver<PlanConfig>,
}

impl<S, C> TimerEngine<S, C>
where
    S: KeyValueStore<EngineState>,
    C: KeyValueStore<PlanConfig>,
{
    /// Restore an engine from its stores, using the built-in plan defaults
    /// when no configuration was saved.
    pub fn open(state_store: S, config_store: C) -> Self {
        Self::open_with_defaults(state_store, config_store, PlanConfig::default())
    }

    /// Restore an engine from its stores.
    ///
    /// Unreadable or inconsistent saved data never prevents opening: the
    /// configuration falls back to `defaults`, the state is repaired or reset,
    /// and the problem is logged and reported through [`Self::persistence`].
    pub fn open_with_defaults(mut state_store: S, mut config_store: C, defaults: PlanConfig) -> Self {
        let mut persistence = Persistence::Durable;

        let config = match config_store.get() {
            Ok(Some(config)) => match config.validate() {
                Ok(()) => config,
                Err(e) => {
                    tracing::warn!(error = %e, "saved configuration is invalid, using defaults");
                    defaults
                }
            },
            Ok(None) => defaults,
            Err(e) => {
                tracing::warn!(error = %e, "could not load configuration, using defaults");
                persistence = Persistence::Degraded {
                    reason: format!("could not load configuration: {e}"),
                };
                defaults
            }
        };

        let state = match state_store.get() {
            Ok(Some(state)) => Self::adopt(state, config),
            Ok(None) => EngineState::setup(config),
            Err(e) => {
                tracing::warn!(error = %e, "could not load timer state, starting fresh");
                persistence = Persistence::Degraded {
                    reason: format!("could not load timer state: {e}"),
                };
                EngineState::setup(config)
            }
        };

        let external_state = state_store.subscribe();
        let external_config = config_store.subscribe();
        // Baseline the change detectors against what was just loaded.
        if let Err(e) = state_store.poll_external() {
            tracing::debug!(error = %e, "state change detection unavailable");
        }
        if let Err(e) = config_store.poll_external() {
            tracing::debug!(error = %e, "config change detection unavailable");
        }

        let mut engine = Self {
            state_store,
            config_store,
            config,
            state,
            ticker: Ticker::default(),
            persistence,
            external_state,
            external_config,
        };
        engine.reconcile_ticker();
        engine
    }

    /// Use a different tick cadence.
    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.ticker = Ticker::new(interval);
        self.reconcile_ticker();
        self
    }

    /// Repair a state read from storage and align it with the current
    /// configuration.
    fn adopt(mut state: EngineState, config: PlanConfig) -> EngineState {
        for repair in state.repair() {
            tracing::warn!(%repair, "repaired saved timer state");
        }
        if state.phase == Phase::Setup {
            state.config = config;
        }
        state
    }

    // ------------------------------------------------------------------
    // Accessors

    /// Current configuration (what the next start will plan with).
    #[must_use]
    pub const fn config(&self) -> &PlanConfig {
        &self.config
    }

    #[must_use]
    pub const fn state(&self) -> &EngineState {
        &self.state
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.state.phase
    }

    #[must_use]
    pub fn sessions(&self) -> &[Session] {
        &self.state.sessions
    }

    #[must_use]
    pub fn work_item_ids(&self) -> &[String] {
        &self.state.work_item_ids
    }

    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.state.current_index
    }

    #[must_use]
    pub fn current_session(&self) -> Option<&Session> {
        self.state.current_session()
    }

    #[must_use]
    pub const fn remaining_seconds(&self) -> u32 {
        self.state.remaining_seconds
    }

    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.state.is_paused
    }

    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.state.started_at
    }

    #[must_use]
    pub const fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    #[must_use]
    pub const fn is_ticking(&self) -> bool {
        self.ticker.is_ticking()
    }

    /// Time until the next tick is due, if the timer is running.
    #[must_use]
    pub fn until_next_tick(&self, now: Instant) -> Option<Duration> {
        self.ticker.until_next(now)
    }

    /// The plan `start` would produce right now.
    #[must_use]
    pub fn preview(&self) -> Vec<Session> {
        if self.config.validate().is_err() {
            return Vec::new();
        }
        distribute(&plan(&self.config), &self.state.work_item_ids)
    }

    /// Summary of the running plan, or of the preview while in setup.
    #[must_use]
    pub fn plan_summary(&self) -> PlanSummary {
        match self.state.phase {
            Phase::Setup => summarize(&self.preview()),
            Phase::Active | Phase::Completed => summarize(&self.state.sessions),
        }
    }

    /// Fraction of the current session already elapsed.
    #[must_use]
    pub fn progress(&self) -> f64 {
        let Some(session) = self.current_session() else {
            return if self.state.phase == Phase::Completed { 1.0 } else { 0.0 };
        };
        let total = session.duration_seconds();
        if total == 0 {
            return 1.0;
        }
        1.0 - f64::from(self.state.remaining_seconds) / f64::from(total)
    }

    // ------------------------------------------------------------------
    // Configuration and work items

    /// Replace the configuration.
    ///
    /// A running or completed plan keeps the configuration it was built
    /// from; only the next start uses the new one.
    ///
    /// # Errors
    ///
    /// Returns `JornadaError::Config` if any field is zero.
    pub fn update_configuration(&mut self, config: PlanConfig) -> Result<Persistence, JornadaError> {
        config.validate()?;

        self.config = config;
        let saved = self.config_store.set(&config);
        if self.state.phase == Phase::Setup {
            self.state.config = config;
        }
        tracing::debug!(?config, "configuration updated");

        let persistence = self.persist();
        match saved {
            Ok(()) => Ok(persistence),
            Err(e) => {
                tracing::warn!(error = %e, "failed to save configuration");
                self.persistence = Persistence::Degraded {
                    reason: format!("configuration not saved: {e}"),
                };
                Ok(self.persistence.clone())
            }
        }
    }

    /// Replace the queued work items. Duplicates are dropped, order kept.
    pub fn set_work_items(&mut self, ids: Vec<String>) -> Persistence {
        let mut unique: Vec<String> = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        self.state.work_item_ids = unique;
        self.persist()
    }

    /// Queue a work item. Already queued items are left where they are.
    pub fn add_work_item(&mut self, id: impl Into<String>) -> Persistence {
        let id = id.into();
        if self.state.work_item_ids.contains(&id) {
            return self.persistence.clone();
        }
        self.state.work_item_ids.push(id);
        self.persist()
    }

    /// Remove a queued work item.
    pub fn remove_work_item(&mut self, id: &str) -> Persistence {
        let before = self.state.work_item_ids.len();
        self.state.work_item_ids.retain(|queued| queued != id);
        if self.state.work_item_ids.len() == before {
            return self.persistence.clone();
        }
        self.persist()
    }

    // ------------------------------------------------------------------
    // Timer control

    /// Plan the jornada and start the first session.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless in setup, `Config` for an invalid
    /// configuration, and `EmptyPlan` when not even one focus session fits.
    /// The state is left untouched in every error case.
    pub fn start(&mut self) -> Result<Persistence, JornadaError> {
        self.require(Phase::Setup, "start")?;
        self.config.validate()?;

        let sessions = distribute(&plan(&self.config), &self.state.work_item_ids);
        let Some(first) = sessions.first() else {
            return Err(JornadaError::EmptyPlan {
                total: self.config.total_duration_minutes,
                focus: self.config.focus_minutes,
            });
        };

        self.state.remaining_seconds = first.duration_seconds();
        self.state.phase = Phase::Active;
        self.state.config = self.config;
        self.state.sessions = sessions;
        self.state.current_index = 0;
        self.state.is_paused = false;
        self.state.started_at = Some(Utc::now());
        tracing::debug!(
            sessions = self.state.sessions.len(),
            work_items = self.state.work_item_ids.len(),
            "jornada started"
        );

        Ok(self.transition())
    }

    /// Pause the countdown. Pausing twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless active.
    pub fn pause(&mut self) -> Result<Persistence, JornadaError> {
        self.require(Phase::Active, "pause")?;
        if self.state.is_paused {
            return Ok(self.persistence.clone());
        }
        self.state.is_paused = true;
        Ok(self.transition())
    }

    /// Resume a paused countdown. Resuming a running timer is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless active.
    pub fn resume(&mut self) -> Result<Persistence, JornadaError> {
        self.require(Phase::Active, "resume")?;
        if !self.state.is_paused {
            return Ok(self.persistence.clone());
        }
        self.state.is_paused = false;
        Ok(self.transition())
    }

    /// Jump to the next session, completing the jornada after the last one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless active.
    pub fn skip_forward(&mut self) -> Result<Persistence, JornadaError> {
        self.require(Phase::Active, "skip forward")?;
        Ok(self.advance())
    }

    /// Restart the previous session from its full length.
    ///
    /// Does nothing on the first session.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless active.
    pub fn skip_back(&mut self) -> Result<Persistence, JornadaError> {
        self.require(Phase::Active, "skip back")?;
        if self.state.current_index == 0 {
            return Ok(self.persistence.clone());
        }
        self.state.current_index -= 1;
        self.state.remaining_seconds = self.state.sessions[self.state.current_index].duration_seconds();
        Ok(self.transition())
    }

    /// Discard the plan and return to setup. Always succeeds.
    ///
    /// The configuration is kept; queued work items are cleared.
    pub fn stop(&mut self) -> Persistence {
        self.state = EngineState::setup(self.config);
        tracing::debug!("jornada stopped");
        self.transition()
    }

    /// Move to the next session, or complete the jornada after the last.
    ///
    /// Shared by explicit skips and by ticks that exhaust a session. Outside
    /// the active phase this does nothing.
    pub fn advance(&mut self) -> Persistence {
        if self.state.phase != Phase::Active {
            return self.persistence.clone();
        }

        let next = self.state.current_index + 1;
        if next < self.state.sessions.len() {
            self.state.current_index = next;
            self.state.remaining_seconds = self.state.sessions[next].duration_seconds();
            tracing::debug!(index = next, "advanced to next session");
        } else {
            self.state.remaining_seconds = 0;
            self.state.phase = Phase::Completed;
            tracing::debug!("jornada completed");
        }

        self.transition()
    }

    /// Count down one second.
    ///
    /// Only has an effect while active and not paused.
    pub fn tick(&mut self) -> Persistence {
        if !self.state.is_ticking() {
            return self.persistence.clone();
        }
        if self.state.remaining_seconds <= 1 {
            return self.advance();
        }
        self.state.remaining_seconds -= 1;
        self.persist()
    }

    /// Apply every tick that has come due by `now`.
    ///
    /// Returns the number of ticks applied.
    pub fn pump(&mut self, now: Instant) -> usize {
        let mut applied = 0;
        while self.ticker.take_due(now) {
            self.tick();
            applied += 1;
        }
        applied
    }

    /// Adopt state or configuration written by another process.
    ///
    /// Returns `true` if anything changed. Failures are logged and ignored.
    pub fn sync_external(&mut self) -> bool {
        let mut changed = false;

        if let Err(e) = self.config_store.poll_external() {
            tracing::debug!(error = %e, "config change poll failed");
        }
        let latest_config = self.external_config.try_iter().last();
        if let Some(config) = latest_config {
            if config.validate().is_ok() && config != self.config {
                tracing::debug!(?config, "adopting external configuration");
                self.config = config;
                if self.state.phase == Phase::Setup {
                    self.state.config = config;
                }
                changed = true;
            }
        }

        if let Err(e) = self.state_store.poll_external() {
            tracing::debug!(error = %e, "state change poll failed");
        }
        let latest_state = self.external_state.try_iter().last();
        if let Some(state) = latest_state {
            let state = Self::adopt(state, self.config);
            if state != self.state {
                tracing::debug!(phase = %state.phase, "adopting external timer state");
                self.state = state;
                self.reconcile_ticker();
                changed = true;
            }
        }

        changed
    }

    // ------------------------------------------------------------------

    fn require(&self, phase: Phase, action: &'static str) -> Result<(), JornadaError> {
        if self.state.phase == phase {
            Ok(())
        } else {
            Err(JornadaError::InvalidTransition {
                action,
                phase: self.state.phase,
            })
        }
    }

    /// Persist after a phase or pause change and bring the ticker in line.
    fn transition(&mut self) -> Persistence {
        self.reconcile_ticker();
        self.persist()
    }

    fn reconcile_ticker(&mut self) {
        if self.state.is_ticking() {
            self.ticker.start_ticking(Instant::now());
        } else {
            self.ticker.cancel_ticking();
        }
    }

    fn persist(&mut self) -> Persistence {
        match self.state_store.set(&self.state) {
            Ok(()) => {
                if !self.persistence.is_durable() {
                    tracing::info!("timer state is being saved again");
                }
                self.persistence = Persistence::Durable;
            }
            Err(e) => {
                if self.persistence.is_durable() {
                    tracing::warn!(error = %e, "failed to save timer state, continuing in memory");
                }
                self.persistence = Persistence::Degraded {
                    reason: e.to_string(),
                };
            }
        }
        self.persistence.clone()
    }
}
