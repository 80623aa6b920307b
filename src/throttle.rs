//! Rate policy for the external source.
//!
//! The source advertises a 1000-requests-per-window limit; the policy stays
//! under it with a fixed 1s pause after every candidate plus a 60s pause
//! after every 900th candidate. A transport failure is assumed to mean the
//! client is being rate-limited or blocked, so it triggers a long cooldown
//! before the loop continues.
//!
//! Decisions are pure (`pause_after`, `failure_cooldown`); the harvester
//! drives the actual `tokio::time::sleep`s, which keeps the schedule
//! testable without waiting.

use std::time::Duration;

/// Sleep schedule for the harvest loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatePolicy {
    /// Pause after every candidate.
    pub per_request: Duration,
    /// Extra pause fires after every `window` candidates (not at index 0).
    pub window: usize,
    pub window_pause: Duration,
    /// Cooldown after a transport failure.
    pub failure_cooldown: Duration,
}

impl Default for RatePolicy {
    fn default() -> Self {
        Self {
            per_request: Duration::from_secs(1),
            window: 900,
            window_pause: Duration::from_secs(60),
            failure_cooldown: Duration::from_secs(2000),
        }
    }
}

impl RatePolicy {
    /// A no-op policy for tests and dry runs.
    pub fn unthrottled() -> Self {
        Self {
            per_request: Duration::ZERO,
            window: 0,
            window_pause: Duration::ZERO,
            failure_cooldown: Duration::ZERO,
        }
    }

    /// Total pause owed after processing the candidate at `index`
    /// (0-based): the per-request pause, plus the window pause when the
    /// index is a positive multiple of the window size.
    pub fn pause_after(&self, index: usize) -> Duration {
        let mut pause = self.per_request;
        if self.window > 0 && index > 0 && index % self.window == 0 {
            pause += self.window_pause;
        }
        pause
    }

    pub fn failure_cooldown(&self) -> Duration {
        self.failure_cooldown
    }
}
