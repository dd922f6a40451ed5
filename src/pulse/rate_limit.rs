//! Fixed-delay rate limiting shared by every Pulse API call.
//!
//! The limiter enforces a minimum gap between the end of one request and the
//! start of the next. Time comes from a [`Clock`] so tests can drive it
//! without sleeping.

use std::future::Future;
use std::time::{Duration, Instant};

/// Source of time for the rate limiter.
///
/// `now()` must never go backwards.
pub trait Clock {
    fn now(&self) -> Instant;

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// Wall clock backed by tokio's timer
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        tokio::time::sleep(duration)
    }
}

#[derive(Debug)]
pub struct RateLimiter<C> {
    clock: C,
    min_interval: Duration,
    last_request: Option<Instant>,
}

impl<C: Clock> RateLimiter<C> {
    pub fn new(clock: C, min_interval: Duration) -> Self {
        Self {
            clock,
            min_interval,
            last_request: None,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Sleep until `min_interval` has passed since the last completed request.
    /// Returns how long it slept.
    pub async fn wait(&mut self) -> Duration {
        let Some(last) = self.last_request else {
            return Duration::ZERO;
        };

        let elapsed = self.clock.now().saturating_duration_since(last);
        let remaining = self.min_interval.saturating_sub(elapsed);

        if !remaining.is_zero() {
            tracing::debug!(
                sleep_ms = remaining.as_millis() as u64,
                "Rate limiting: sleeping before next request"
            );
            self.clock.sleep(remaining).await;
        }

        remaining
    }

    /// Record that a request just finished, successfully or not.
    pub fn mark_completed(&mut self) {
        self.last_request = Some(self.clock.now());
    }
}
