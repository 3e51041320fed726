//! Sliding-window rate limiter.
//!
//! Caps relayed messages to N per rolling 60-second window. Admission
//! timestamps are pruned lazily on each check. Checking while the
//! limiter is disabled drops the window, so re-enabling starts cold.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

/// Rolling window length.
const WINDOW: Duration = Duration::from_secs(60);

pub struct RateLimiter {
    window: Duration,
    admissions: Mutex<Vec<Instant>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::with_window(WINDOW)
    }

    fn with_window(window: Duration) -> Self {
        Self {
            window,
            admissions: Mutex::new(Vec::new()),
        }
    }

    /// Check whether a forward is admitted under `limit` per window and,
    /// if so, record it. A disabled limiter always admits and resets the
    /// window.
    pub fn check(&self, enabled: bool, limit: u32) -> bool {
        let mut admissions = self.admissions.lock();

        if !enabled {
            admissions.clear();
            return true;
        }

        let now = Instant::now();
        let window = self.window;
        admissions.retain(|t| now.duration_since(*t) < window);

        if admissions.len() < limit as usize {
            admissions.push(now);
            true
        } else {
            false
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn admits_up_to_limit_then_rejects() {
        let limiter = RateLimiter::new();
        assert!(limiter.check(true, 2));
        assert!(limiter.check(true, 2));
        assert!(!limiter.check(true, 2));
    }

    #[tokio::test(start_paused = true)]
    async fn window_expiry_frees_capacity() {
        let limiter = RateLimiter::new();
        assert!(limiter.check(true, 1));
        assert!(!limiter.check(true, 1));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(limiter.check(true, 1));
    }

    #[tokio::test]
    async fn disabled_admits_and_resets_window() {
        let limiter = RateLimiter::new();
        assert!(limiter.check(true, 1));
        assert!(!limiter.check(true, 1));

        // Disabling admits unconditionally and empties the window...
        assert!(limiter.check(false, 1));
        // ...so re-enabling starts cold.
        assert!(limiter.check(true, 1));
    }
}
