//! Fixed-window request limiter keyed by client.
//!
//! Each client owns one window. The first request in a window opens it with a
//! count of one; later requests increment the count until the budget is spent,
//! after which requests are refused until the window's reset time. The number
//! of tracked clients is bounded: when full, expired windows are swept and, if
//! that frees nothing, the window closest to expiry is evicted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tracing::debug;

use super::Error;

/// Limiter tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests admitted per window.
    pub max_requests: u32,
    /// Window length.
    pub window: Duration,
    /// Upper bound on tracked client windows.
    pub max_tracked_clients: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
            max_tracked_clients: 10_000,
        }
    }
}

/// Outcome of one admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// The request fits in the client's budget.
    Allowed {
        /// Requests left in the current window.
        remaining: u32,
    },
    /// The budget is spent until the window resets.
    Limited {
        /// Time until the window resets.
        retry_after: Duration,
    },
}

impl RateLimitDecision {
    /// Whether the request was admitted.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

#[derive(Debug, Clone, Copy)]
struct RateLimitWindow {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// Per-client fixed-window limiter safe to share across request handlers.
pub struct RateLimiter {
    max_requests: u32,
    window: TimeDelta,
    max_tracked_clients: usize,
    clock: Arc<dyn Clock>,
    windows: Mutex<HashMap<String, RateLimitWindow>>,
}

impl RateLimiter {
    /// Build a limiter reading time from `clock`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use namecheck::domain::{RateLimitConfig, RateLimiter};
    ///
    /// let limiter = RateLimiter::new(RateLimitConfig::default(), Arc::new(DefaultClock));
    /// assert!(limiter.allow("203.0.113.7").expect("limiter state available"));
    /// ```
    pub fn new(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            max_requests: config.max_requests.max(1),
            window: TimeDelta::from_std(config.window).unwrap_or(TimeDelta::MAX),
            max_tracked_clients: config.max_tracked_clients.max(1),
            clock,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Count one request from `client_key` and decide whether to admit it.
    ///
    /// # Errors
    /// Returns an internal error when the shared window map is poisoned.
    pub fn check(&self, client_key: &str) -> Result<RateLimitDecision, Error> {
        let now = self.clock.utc();
        let mut windows = self
            .windows
            .lock()
            .map_err(|_| Error::internal("rate limiter state poisoned"))?;

        let decision = match windows.get_mut(client_key) {
            Some(window) if now < window.reset_at => {
                if window.count < self.max_requests {
                    window.count += 1;
                    RateLimitDecision::Allowed {
                        remaining: self.max_requests - window.count,
                    }
                } else {
                    RateLimitDecision::Limited {
                        retry_after: (window.reset_at - now).to_std().unwrap_or(Duration::ZERO),
                    }
                }
            }
            Some(window) => {
                *window = self.open_window(now);
                self.first_request_decision()
            }
            None => {
                self.make_room(&mut windows, now);
                windows.insert(client_key.to_owned(), self.open_window(now));
                self.first_request_decision()
            }
        };
        Ok(decision)
    }

    /// Boolean form of [`RateLimiter::check`].
    ///
    /// # Errors
    /// Returns an internal error when the shared window map is poisoned.
    pub fn allow(&self, client_key: &str) -> Result<bool, Error> {
        self.check(client_key).map(|decision| decision.is_allowed())
    }

    /// Number of client windows currently held.
    ///
    /// # Errors
    /// Returns an internal error when the shared window map is poisoned.
    pub fn tracked_clients(&self) -> Result<usize, Error> {
        self.windows
            .lock()
            .map(|windows| windows.len())
            .map_err(|_| Error::internal("rate limiter state poisoned"))
    }

    fn open_window(&self, now: DateTime<Utc>) -> RateLimitWindow {
        RateLimitWindow {
            count: 1,
            reset_at: now.checked_add_signed(self.window).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    const fn first_request_decision(&self) -> RateLimitDecision {
        RateLimitDecision::Allowed {
            remaining: self.max_requests - 1,
        }
    }

    fn make_room(&self, windows: &mut HashMap<String, RateLimitWindow>, now: DateTime<Utc>) {
        if windows.len() < self.max_tracked_clients {
            return;
        }
        let before = windows.len();
        windows.retain(|_, window| window.reset_at > now);
        debug!(swept = before - windows.len(), "swept expired rate-limit windows");

        if windows.len() < self.max_tracked_clients {
            return;
        }
        let oldest = windows
            .iter()
            .min_by_key(|(_, window)| window.reset_at)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            windows.remove(&key);
            debug!(client = %key, "evicted rate-limit window at capacity");
        }
    }
}
