//! Retry policy for provider calls.
//!
//! Only rate-limit-class failures are retried. Backoff is exponential and
//! unscaled on the first retry: with the defaults (2 retries, 1000ms) a call
//! that is throttled every time waits 1000ms, then 2000ms, then gives up and
//! returns the last raw failure untouched.

use serde::{Deserialize, Serialize};
use std::future::Future;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::transport::TransportFailure;

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
pub(crate) fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Bounds for [`with_retry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Additional attempts after the first one.
    pub max_retries: u32,
    /// Wait before the first retry; doubles on every further retry.
    pub initial_delay_ms: u64,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_RETRIES: u32 = 2;
    pub const DEFAULT_INITIAL_DELAY_MS: u64 = 1000;

    pub fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay_ms: duration_ms(initial_delay),
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    /// Sum of all backoff waits when every attempt is throttled.
    pub fn total_backoff(&self) -> Duration {
        let factor = 1u64
            .checked_shl(self.max_retries)
            .unwrap_or(u64::MAX)
            .saturating_sub(1);
        Duration::from_millis(self.initial_delay_ms.saturating_mul(factor))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: Self::DEFAULT_MAX_RETRIES,
            initial_delay_ms: Self::DEFAULT_INITIAL_DELAY_MS,
        }
    }
}

/// Per-call retry bookkeeping. Lives only as long as one [`with_retry`] call.
#[derive(Debug)]
pub(crate) struct RetryState {
    attempt: u32,
    max_retries: u32,
    delay: Duration,
}

impl RetryState {
    pub(crate) fn new(policy: &RetryPolicy) -> Self {
        Self {
            attempt: 0,
            max_retries: policy.max_retries,
            delay: policy.initial_delay(),
        }
    }

    /// Number of retries performed so far.
    pub(crate) fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Advance to the next retry and return how long to wait before it,
    /// or `None` once the budget is spent.
    pub(crate) fn next_delay(&mut self) -> Option<Duration> {
        if self.attempt >= self.max_retries {
            return None;
        }
        self.attempt += 1;
        let delay = self.delay;
        self.delay = self.delay.saturating_mul(2);
        Some(delay)
    }
}

/// Run `operation`, retrying rate-limited failures with exponential backoff.
///
/// Any other failure is returned immediately. Cancelling `cancel` abandons the
/// in-flight attempt or the pending backoff and yields
/// [`TransportFailure::Cancelled`].
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut operation: F,
) -> Result<T, TransportFailure>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TransportFailure>>,
{
    let mut state = RetryState::new(policy);

    loop {
        if cancel.is_cancelled() {
            return Err(TransportFailure::Cancelled);
        }

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TransportFailure::Cancelled),
            outcome = operation() => outcome,
        };

        let failure = match outcome {
            Ok(value) => return Ok(value),
            Err(failure) => failure,
        };

        if !failure.is_rate_limited() {
            return Err(failure);
        }

        let Some(delay) = state.next_delay() else {
            warn!(
                retries = state.attempt(),
                "rate limited; retry budget exhausted"
            );
            return Err(failure);
        };

        warn!(
            attempt = state.attempt(),
            max_retries = policy.max_retries,
            delay_ms = duration_ms(delay),
            "rate limited; backing off before retry"
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TransportFailure::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }
    }
}
