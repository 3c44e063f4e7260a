//! Virtual-Clock Timers
//!
//! Owned, cancellable timers driven by explicit elapsed time rather than
//! the wall clock. Surfaces feed frame deltas in; tests feed whatever
//! durations they like. Nothing here sleeps.
//!
//! # Ownership
//!
//! A [`Timer`] is a plain value held by whichever component scheduled it
//! (usually as `Option<Timer>`). Dropping it is cancellation: a dropped
//! timer can never fire. [`Timer::cancel`] exists for holders that keep
//! the value around and is idempotent.
//!
//! # Carry
//!
//! [`Timer::fire_within`] consumes only the time needed to reach the next
//! deadline from a shared budget, so a component can walk through several
//! stages inside one `advance` call and hand the leftover to the next
//! stage. Large deltas then produce the same firing sequence as many
//! small ones.

use std::time::Duration;

/// Whether a timer fires once or keeps re-arming
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerMode {
    /// Fire once, then become inactive
    Once,
    /// Fire every period until cancelled
    Repeating,
}

/// A cancellable timer on a virtual clock
#[derive(Clone, Debug)]
pub struct Timer {
    period: Duration,
    /// Time accumulated towards the next firing
    elapsed: Duration,
    mode: TimerMode,
    active: bool,
    fired: u64,
}

impl Timer {
    /// Create a one-shot timer that fires after `delay`
    #[must_use]
    pub fn once(delay: Duration) -> Self {
        Self::new(delay, TimerMode::Once)
    }

    /// Create a repeating timer that fires every `interval`
    ///
    /// A zero interval is bumped to one millisecond so a repeating timer
    /// can never fire unboundedly inside a single budget.
    #[must_use]
    pub fn repeating(interval: Duration) -> Self {
        Self::new(interval.max(Duration::from_millis(1)), TimerMode::Repeating)
    }

    fn new(period: Duration, mode: TimerMode) -> Self {
        Self {
            period,
            elapsed: Duration::ZERO,
            mode,
            active: true,
            fired: 0,
        }
    }

    /// Timer mode
    #[must_use]
    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    /// Period between firings (or the one-shot delay)
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether the timer can still fire
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// How many times this timer has fired
    #[must_use]
    pub fn fired_count(&self) -> u64 {
        self.fired
    }

    /// Time left until the next firing, `None` once inactive
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.active.then(|| self.period.saturating_sub(self.elapsed))
    }

    /// Cancel the timer. Calling this more than once is harmless.
    pub fn cancel(&mut self) {
        self.active = false;
    }

    /// Try to fire once using time from `budget`
    ///
    /// If the budget covers the time left to the next deadline, that much
    /// is subtracted, the timer fires and `true` is returned. Otherwise the
    /// whole budget is absorbed into the timer and `false` is returned.
    /// Inactive timers never fire and never consume budget.
    pub fn fire_within(&mut self, budget: &mut Duration) -> bool {
        if !self.active {
            return false;
        }

        let needed = self.period.saturating_sub(self.elapsed);
        if *budget < needed {
            self.elapsed += *budget;
            *budget = Duration::ZERO;
            return false;
        }

        *budget -= needed;
        self.elapsed = Duration::ZERO;
        self.fired += 1;
        if self.mode == TimerMode::Once {
            self.active = false;
        }
        true
    }
}
