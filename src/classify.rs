//! Classification of 4xx responses other than 429.
//!
//! A few 4xx bodies describe transient concurrency conflicts rather than
//! genuine client errors. Those are retried with their own waits; everything
//! else fails unless the client was told to retry all 4xx errors.

use http::StatusCode;
use std::time::Duration;

use crate::error::ApiMessage;
use crate::retry::RetryPolicy;

/// Operation whose 400 responses may signal a deletion race.
pub const DELETE_NETWORK_OPERATION: &str = "deleteNetwork";

/// Fragment of the error returned when networks are deleted concurrently.
pub const NETWORK_DELETE_CONCURRENCY_ERROR: &str =
    "This may be due to concurrent requests to delete networks.";

/// Fragment of the error returned when too many action batches are pending.
pub const ACTION_BATCH_CONCURRENCY_ERROR: &str = "Too many concurrently executing batches";

/// What to do with a 4xx response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Wait, spend one retry and try again.
    Retry {
        /// How long to wait before the next attempt.
        wait: Duration,
        /// Which rule matched, for logging.
        cause: RetryCause,
    },
    /// Surface the error to the caller now.
    Fail,
}

/// The rule that made a 4xx retryable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryCause {
    /// Concurrent network deletion.
    NetworkDeleteConflict,
    /// Too many pending action batches.
    ActionBatchConflict,
    /// Generic 4xx retry was enabled.
    ClientError,
}

impl RetryCause {
    /// Short label for log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            RetryCause::NetworkDeleteConflict => "network delete concurrency error",
            RetryCause::ActionBatchConflict => "action batch concurrency error",
            RetryCause::ClientError => "client error",
        }
    }
}

/// Decides whether a non-429 4xx response is retried. First match wins.
pub fn classify_client_error(
    policy: &RetryPolicy,
    operation: &str,
    status: StatusCode,
    message: &ApiMessage,
) -> Verdict {
    let first_error = message.first_error();

    if operation == DELETE_NETWORK_OPERATION
        && status == StatusCode::BAD_REQUEST
        && first_error.is_some_and(|e| e.contains(NETWORK_DELETE_CONCURRENCY_ERROR))
    {
        return Verdict::Retry {
            wait: policy.network_delete_wait(),
            cause: RetryCause::NetworkDeleteConflict,
        };
    }

    if first_error.is_some_and(|e| e.contains(ACTION_BATCH_CONCURRENCY_ERROR)) {
        return Verdict::Retry {
            wait: policy.action_batch_wait(),
            cause: RetryCause::ActionBatchConflict,
        };
    }

    if policy.retry_4xx_error {
        return Verdict::Retry {
            wait: policy.client_error_wait(),
            cause: RetryCause::ClientError,
        };
    }

    Verdict::Fail
}
