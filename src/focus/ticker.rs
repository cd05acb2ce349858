//! Tick scheduling for the timer engine.
//!
//! The ticker does not own a thread. The host event loop asks it how many
//! whole intervals have elapsed since the last call and feeds that many ticks
//! to the engine.

use std::time::{Duration, Instant};

/// Default tick cadence.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// A cancellable periodic schedule.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Ticker {
    /// Create a stopped ticker with the given cadence.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            next_due: None,
        }
    }

    /// Begin ticking, first tick one interval from `now`.
    ///
    /// Has no effect if already ticking.
    pub fn start_ticking(&mut self, now: Instant) {
        if self.next_due.is_none() {
            self.next_due = Some(now + self.interval);
        }
    }

    /// Stop ticking. Pending ticks are discarded.
    pub fn cancel_ticking(&mut self) {
        self.next_due = None;
    }

    #[must_use]
    pub const fn is_ticking(&self) -> bool {
        self.next_due.is_some()
    }

    /// Time until the next tick, if ticking.
    #[must_use]
    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    /// Take one due tick, if any, and schedule the following one.
    ///
    /// Called in a loop by the engine so that a tick which cancels the
    /// schedule stops the remaining ones.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if due <= now => {
                self.next_due = Some(due + self.interval);
                true
            }
            _ => false,
        }
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(ticker: &mut Ticker, now: Instant) -> usize {
        let mut count = 0;
        while ticker.take_due(now) {
            count += 1;
        }
        count
    }

    #[test]
    fn test_idle_ticker_yields_nothing() {
        let mut ticker = Ticker::default();
        let now = Instant::now();
        assert!(!ticker.is_ticking());
        assert_eq!(drain(&mut ticker, now + Duration::from_secs(10)), 0);
    }

    #[test]
    fn test_counts_whole_intervals() {
        let mut ticker = Ticker::default();
        let start = Instant::now();
        ticker.start_ticking(start);

        assert_eq!(drain(&mut ticker, start + Duration::from_millis(999)), 0);
        assert_eq!(drain(&mut ticker, start + Duration::from_millis(3500)), 3);
        assert_eq!(drain(&mut ticker, start + Duration::from_millis(3900)), 0);
        assert_eq!(drain(&mut ticker, start + Duration::from_secs(4)), 1);
    }

    #[test]
    fn test_cancel_discards_pending() {
        let mut ticker = Ticker::default();
        let start = Instant::now();
        ticker.start_ticking(start);
        ticker.cancel_ticking();

        assert!(!ticker.is_ticking());
        assert_eq!(drain(&mut ticker, start + Duration::from_secs(5)), 0);
    }

    #[test]
    fn test_restart_is_idempotent() {
        let mut ticker = Ticker::default();
        let start = Instant::now();
        ticker.start_ticking(start);
        ticker.start_ticking(start + Duration::from_millis(800));

        assert_eq!(
            ticker.until_next(start + Duration::from_millis(800)),
            Some(Duration::from_millis(200))
        );
    }
}
