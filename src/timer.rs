//! Fixed-cadence gravity timer
//!
//! The engine has no clock of its own; the host asks this timer whether
//! a `tick` is due. Instants are passed in so the timer can be driven
//! from tests.

use std::time::{Duration, Instant};

/// Default gravity period
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct DropTimer {
    interval: Duration,
    last_tick: Instant,
}

impl DropTimer {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_tick: now,
        }
    }

    /// Returns true at most once per interval
    pub fn poll(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_tick) >= self.interval {
            self.last_tick = now;
            true
        } else {
            false
        }
    }

    /// How long the host may wait for input before the next tick
    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.interval
            .saturating_sub(now.saturating_duration_since(self.last_tick))
    }

    /// Restart the period, e.g. after a reset
    pub fn restart(&mut self, now: Instant) {
        self.last_tick = now;
    }
}

impl Default for DropTimer {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL, Instant::now())
    }
}
