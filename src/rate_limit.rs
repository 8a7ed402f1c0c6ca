//! Fixed-window rate limiting per client.
//!
//! Each client gets a counter that resets at a fixed point in time rather
//! than sliding. A burst that straddles a reset can therefore admit up to
//! twice the per-window quota in a short span; that is accepted.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockWriteGuard};
use std::time::{Duration, Instant};

/// Quota and window length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPolicy {
    /// Requests allowed per window.
    pub max_requests: u32,
    /// Window length.
    pub window: Duration,
}

impl WindowPolicy {
    /// Create a policy allowing `max_requests` per `window_secs` seconds.
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self::new(10, 60)
    }
}

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The request may proceed.
    Admitted,
    /// The client has used its quota for the current window.
    Rejected {
        /// Time until the window resets.
        retry_after: Duration,
    },
}

impl Admission {
    /// Check if the request was admitted.
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

/// Counter state for one client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateWindow {
    /// Requests admitted in the current window.
    pub request_count: u32,
    /// When the current window ends.
    pub window_reset_at: Instant,
}

/// Fixed-window limiter keyed by client identifier.
///
/// # Example
///
/// ```
/// use newsgate::rate_limit::{FixedWindowLimiter, WindowPolicy};
///
/// let limiter = FixedWindowLimiter::new(WindowPolicy::new(2, 60));
///
/// assert!(limiter.admit("203.0.113.7").is_admitted());
/// assert!(limiter.admit("203.0.113.7").is_admitted());
/// assert!(!limiter.admit("203.0.113.7").is_admitted());
///
/// // Other clients have their own window
/// assert!(limiter.admit("198.51.100.1").is_admitted());
/// ```
#[derive(Debug)]
pub struct FixedWindowLimiter {
    policy: WindowPolicy,
    windows: RwLock<HashMap<String, RateWindow>>,
}

impl FixedWindowLimiter {
    /// Create a limiter with the given policy.
    pub fn new(policy: WindowPolicy) -> Self {
        Self {
            policy,
            windows: RwLock::new(HashMap::new()),
        }
    }

    /// The limiter's policy.
    pub fn policy(&self) -> WindowPolicy {
        self.policy
    }

    /// Count a request from `client` and decide whether to admit it.
    pub fn admit(&self, client: &str) -> Admission {
        self.admit_at(client, Instant::now())
    }

    /// [`admit`](Self::admit) as of `now`.
    pub fn admit_at(&self, client: &str, now: Instant) -> Admission {
        let mut windows = self.write();

        match windows.get_mut(client) {
            Some(window) if now < window.window_reset_at => {
                if window.request_count < self.policy.max_requests {
                    window.request_count += 1;
                    Admission::Admitted
                } else {
                    Admission::Rejected {
                        retry_after: window.window_reset_at - now,
                    }
                }
            }
            _ => {
                windows.insert(
                    client.to_string(),
                    RateWindow {
                        request_count: 1,
                        window_reset_at: now + self.policy.window,
                    },
                );
                Admission::Admitted
            }
        }
    }

    /// Current window for a client, if any.
    pub fn window(&self, client: &str) -> Option<RateWindow> {
        self.windows
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(client)
            .copied()
    }

    /// Drop windows that have already reset. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Instant::now())
    }

    /// [`sweep_expired`](Self::sweep_expired) as of `now`.
    pub fn sweep_expired_at(&self, now: Instant) -> usize {
        let mut windows = self.write();
        let before = windows.len();
        windows.retain(|_, w| now < w.window_reset_at);
        before - windows.len()
    }

    /// Number of tracked clients.
    pub fn len(&self) -> usize {
        self.windows.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether no clients are tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, RateWindow>> {
        self.windows.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for FixedWindowLimiter {
    fn default() -> Self {
        Self::new(WindowPolicy::default())
    }
}
