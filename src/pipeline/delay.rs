//! Delay gate.
//!
//! Enforces a minimum spacing between any two relayed messages,
//! independent of the rate limiter. The wait is an async timer
//! suspension, and the async lock is held across it so concurrent
//! forwards queue up behind each other instead of racing the
//! last-forward instant.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

pub struct DelayGate {
    last_forward: Mutex<Option<Instant>>,
}

impl DelayGate {
    pub fn new() -> Self {
        Self {
            last_forward: Mutex::new(None),
        }
    }

    /// Wait until at least `delay` has elapsed since the last forward.
    ///
    /// Never rejects; only stalls. The last-forward instant is updated in
    /// every case, including when the gate is disabled, so the baseline
    /// stays current.
    pub async fn enforce(&self, enabled: bool, delay: Duration) {
        let mut last = self.last_forward.lock().await;

        if enabled && let Some(prev) = *last {
            let elapsed = Instant::now().duration_since(prev);
            let wait = delay.saturating_sub(elapsed);
            if !wait.is_zero() {
                tokio::time::sleep(wait).await;
            }
        }

        *last = Some(Instant::now());
    }
}

impl Default for DelayGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn disabled_gate_never_stalls() {
        let gate = DelayGate::new();
        let start = Instant::now();
        gate.enforce(false, Duration::from_secs(5)).await;
        gate.enforce(false, Duration::from_secs(5)).await;
        assert_eq!(Instant::now().duration_since(start), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn first_forward_passes_immediately() {
        let gate = DelayGate::new();
        let start = Instant::now();
        gate.enforce(true, Duration::from_secs(5)).await;
        assert_eq!(Instant::now().duration_since(start), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn second_forward_waits_out_the_delay() {
        let gate = DelayGate::new();
        gate.enforce(true, Duration::from_secs(5)).await;

        let start = Instant::now();
        gate.enforce(true, Duration::from_secs(5)).await;
        assert_eq!(Instant::now().duration_since(start), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_delay_passes_immediately() {
        let gate = DelayGate::new();
        gate.enforce(true, Duration::from_secs(5)).await;

        tokio::time::advance(Duration::from_secs(6)).await;
        let start = Instant::now();
        gate.enforce(true, Duration::from_secs(5)).await;
        assert_eq!(Instant::now().duration_since(start), Duration::ZERO);
    }
}
