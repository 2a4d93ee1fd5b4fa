//! Retry budget and backoff policy.
//!
//! The dashboard SDKs use deliberately simple, non-exponential waits: a fixed
//! second for connection failures, server errors and undecodable bodies, and
//! scenario-specific waits for rate limiting and known 4xx conflicts. Every
//! retryable outcome spends one unit of a per-call [`RetryBudget`].

use rand::Rng;
use std::time::Duration;

/// Wait applied after connection errors, 5xx responses and malformed JSON.
pub const FIXED_RETRY_WAIT: Duration = Duration::from_secs(1);

/// Lower bound, in seconds, of the wait after a network-deletion conflict.
pub const NETWORK_DELETE_MIN_WAIT_SECS: u64 = 30;

/// Retry settings shared by every call made through a client.
///
/// # Examples
///
/// ```
/// use meraki::RetryPolicy;
///
/// let policy = RetryPolicy {
///     maximum_retries: 4,
///     retry_4xx_error: true,
///     ..RetryPolicy::default()
/// };
/// assert_eq!(policy.budget().remaining(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts allowed per logical call. Must be at least 1.
    pub maximum_retries: u32,

    /// Fixed wait, in seconds, after an action-batch concurrency conflict.
    pub action_batch_retry_wait_time: u64,

    /// Ceiling, in seconds, of the random wait after a network-deletion
    /// conflict. The floor is [`NETWORK_DELETE_MIN_WAIT_SECS`].
    pub network_delete_retry_wait_time: u64,

    /// Whether unrecognised 4xx errors are retried.
    pub retry_4xx_error: bool,

    /// Ceiling, in seconds, of the random wait for retried 4xx errors.
    pub retry_4xx_error_wait_time: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            maximum_retries: 2,
            action_batch_retry_wait_time: 60,
            network_delete_retry_wait_time: 240,
            retry_4xx_error: false,
            retry_4xx_error_wait_time: 60,
        }
    }
}

impl RetryPolicy {
    /// Returns a fresh budget for one logical call.
    pub fn budget(&self) -> RetryBudget {
        RetryBudget::new(self.maximum_retries)
    }

    /// Wait after an action-batch concurrency conflict.
    pub fn action_batch_wait(&self) -> Duration {
        Duration::from_secs(self.action_batch_retry_wait_time)
    }

    /// Wait after a network-deletion concurrency conflict.
    pub fn network_delete_wait(&self) -> Duration {
        random_wait(NETWORK_DELETE_MIN_WAIT_SECS, self.network_delete_retry_wait_time)
    }

    /// Wait before retrying an unrecognised 4xx error.
    pub fn client_error_wait(&self) -> Duration {
        random_wait(1, self.retry_4xx_error_wait_time)
    }
}

/// Remaining attempts for one logical call.
///
/// Never negative and only ever decreases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    remaining: u32,
}

impl RetryBudget {
    /// Creates a budget with `remaining` attempts.
    pub fn new(remaining: u32) -> Self {
        Self { remaining }
    }

    /// Attempts left.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Returns `true` while another attempt may be made.
    pub fn has_remaining(&self) -> bool {
        self.remaining > 0
    }

    /// Spends one attempt. Returns `true` if the budget is now exhausted.
    pub fn spend(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }
}

/// Uniform random whole-second wait in `[low, high]`.
///
/// A ceiling below the floor collapses to the floor.
pub fn random_wait(low: u64, high: u64) -> Duration {
    let high = high.max(low);
    Duration::from_secs(rand::thread_rng().gen_range(low..=high))
}
