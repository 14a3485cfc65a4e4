use std::time::{Duration, Instant};

/// Fixed-interval pacing for [`crate::game::GameState::step`].
///
/// The caller owns the time source and passes `now` in, so the clock itself
/// never sleeps.
#[derive(Debug, Clone, Copy)]
pub struct TickClock {
    interval: Duration,
    last_tick: Instant,
}

impl TickClock {
    #[must_use]
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_tick: now,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Changes the period; the current phase is kept.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Returns true when a full interval has passed since the last tick.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_tick) >= self.interval
    }

    /// Starts a new interval at `now`.
    ///
    /// Called after each step and whenever stepping resumes, so the first
    /// step after a pause or reset waits a full interval.
    pub fn restart(&mut self, now: Instant) {
        self.last_tick = now;
    }

    /// Time left until the next tick is due, zero when already due.
    #[must_use]
    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.interval
            .saturating_sub(now.saturating_duration_since(self.last_tick))
    }
}
