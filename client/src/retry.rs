//! Retry policies for the dispatch loop.

use http::StatusCode;
use rand::Rng;
use std::fmt::Debug;
use std::time::Duration;

/// Decides whether and when a failed attempt is retried.
pub trait RetryPolicy: Debug + Send + Sync + 'static {
    /// Return how long to wait before the next attempt, given how many
    /// retries were already made, or `None` to give up.
    fn backoff(&self, retries_attempted: u32) -> Option<Duration>;
}

/// Whether a response status is worth retrying.
///
/// Transport-level failures are always retryable; at the HTTP level only
/// timeouts, throttling and transient server errors are.
pub fn should_retry_status(status: StatusCode) -> bool {
    status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || (status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED)
}

/// Exponential backoff with a cap and a little jitter.
#[derive(Debug, Clone)]
pub struct BackoffRetryPolicy {
    /// How many retries to make after the initial attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubles each time after.
    pub base_delay: Duration,
    /// Upper bound for a single delay.
    pub max_delay: Duration,
}

impl Default for BackoffRetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(300),
            max_delay: Duration::from_secs(20),
        }
    }
}

impl BackoffRetryPolicy {
    /// The deterministic part of the delay, without jitter.
    fn base_backoff(&self, retries_attempted: u32) -> Option<Duration> {
        if retries_attempted >= self.max_retries {
            return None;
        }

        let delay = self
            .base_delay
            .checked_mul(1 << retries_attempted.min(31))
            .unwrap_or(self.max_delay);
        Some(delay.min(self.max_delay))
    }
}

impl RetryPolicy for BackoffRetryPolicy {
    fn backoff(&self, retries_attempted: u32) -> Option<Duration> {
        let delay = self.base_backoff(retries_attempted)?;

        // Spread retries out by up to 10% to avoid synchronized storms.
        let jitter_cap = (delay / 10).as_millis() as u64;
        let jitter = if jitter_cap == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_cap))
        };

        Some(delay + jitter)
    }
}

/// A policy that never retries.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRetryPolicy;

impl RetryPolicy for NoRetryPolicy {
    fn backoff(&self, _retries_attempted: u32) -> Option<Duration> {
        None
    }
}
