//! Reconnect delay policy.

use std::time::Duration;

/// Exponential backoff: each unplanned close multiplies the delay by
/// `multiplier`, capped at `max`. A successful open resets it to `initial`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffPolicy {
    pub initial: Duration,
    pub max: Duration,
    pub multiplier: f64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(3), Duration::from_secs(30))
    }
}

impl BackoffPolicy {
    pub const MULTIPLIER: f64 = 1.5;

    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max: max.max(initial),
            multiplier: Self::MULTIPLIER,
        }
    }

    /// Delay following `current`.
    pub fn next(&self, current: Duration) -> Duration {
        current.mul_f64(self.multiplier).min(self.max)
    }

    /// Delay after `failures` consecutive unplanned closes.
    pub fn after(&self, failures: u32) -> Duration {
        (0..failures).fold(self.initial, |delay, _| self.next(delay))
    }
}
