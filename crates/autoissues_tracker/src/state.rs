//! Build-scoped state shared with tracker backends.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Length of a tracker rate-limit window in seconds.
///
/// GitHub resets its limits hourly.
pub const RATE_LIMIT_WINDOW_SECS: f64 = 3600.0;

/// Records that a tracker reported its rate limit as exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateLimit {
    /// Seconds since the Unix epoch when the limit was hit.
    pub timestamp: f64,
    /// Whether the limit was hit.
    pub limit_hit: bool,
}

impl RateLimit {
    /// A marker for a limit hit at `timestamp`.
    pub const fn hit(timestamp: f64) -> Self {
        Self {
            timestamp,
            limit_hit: true,
        }
    }

    /// Returns true if lookups must still be skipped at `now`.
    pub fn is_active(&self, now: f64) -> bool {
        self.limit_hit && now - self.timestamp < RATE_LIMIT_WINDOW_SECS
    }
}

/// Access to build-scoped state from a tracker backend.
pub trait TrackerState: Send + Sync {
    /// Current time in seconds since the Unix epoch.
    fn now(&self) -> f64;

    /// Returns the rate-limit marker of `tracker`, if any.
    fn rate_limit(&self, tracker: &str) -> Option<RateLimit>;

    /// Sets or clears the rate-limit marker of `tracker`.
    fn set_rate_limit(&self, tracker: &str, limit: Option<RateLimit>);

    /// Returns true if `tracker` is currently rate limited.
    ///
    /// An expired marker is cleared.
    fn is_rate_limited(&self, tracker: &str) -> bool {
        match self.rate_limit(tracker) {
            Some(limit) if limit.is_active(self.now()) => true,
            Some(_) => {
                self.set_rate_limit(tracker, None);
                false
            }
            None => false,
        }
    }
}

/// Seconds since the Unix epoch.
pub fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

/// A standalone [`TrackerState`] for using backends outside of a build.
#[derive(Debug, Default)]
pub struct InMemoryState {
    limits: Mutex<HashMap<String, RateLimit>>,
    fixed_now: Option<f64>,
}

impl InMemoryState {
    /// Creates an empty state using the system clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty state whose clock always reads `now`.
    pub fn at(now: f64) -> Self {
        Self {
            limits: Mutex::default(),
            fixed_now: Some(now),
        }
    }
}

impl TrackerState for InMemoryState {
    fn now(&self) -> f64 {
        self.fixed_now.unwrap_or_else(unix_now)
    }

    fn rate_limit(&self, tracker: &str) -> Option<RateLimit> {
        self.limits.lock().get(tracker).copied()
    }

    fn set_rate_limit(&self, tracker: &str, limit: Option<RateLimit>) {
        let mut limits = self.limits.lock();
        match limit {
            Some(limit) => {
                limits.insert(tracker.to_string(), limit);
            }
            None => {
                limits.remove(tracker);
            }
        }
    }
}
