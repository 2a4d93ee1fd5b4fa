//! Handling of HTTP 429 responses.
//!
//! The dashboard rate-limits per organization and answers with 429, usually
//! with a `Retry-After` header. When the header is missing the client waits a
//! random whole number of seconds up to a configured ceiling.

use http::HeaderMap;
use std::time::{Duration, SystemTime};

use crate::retry::random_wait;

/// Configuration for rate limit handling.
///
/// # Examples
///
/// ```
/// use meraki::rate_limit::RateLimitConfig;
/// use meraki::Client;
///
/// let config = RateLimitConfig {
///     wait_on_rate_limit: true,
///     retry_wait_ceiling_secs: 30,
/// };
/// let client = Client::builder().api_key("key").rate_limit_config(config).build();
/// assert!(client.is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Whether a 429 is retried at all. When `false` it fails immediately.
    pub wait_on_rate_limit: bool,

    /// Upper bound, in seconds, of the random wait used without `Retry-After`.
    ///
    /// Defaults to 60.
    pub retry_wait_ceiling_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            wait_on_rate_limit: true,
            retry_wait_ceiling_secs: 60,
        }
    }
}

impl RateLimitConfig {
    /// Returns how long to wait before retrying a 429 response.
    ///
    /// A `Retry-After` value is used as-is, without capping. Otherwise the wait
    /// is a uniform random integer number of seconds in `[1, ceiling]`.
    pub fn delay(&self, headers: &HeaderMap) -> Duration {
        parse_retry_after(headers).unwrap_or_else(|| random_wait(1, self.retry_wait_ceiling_secs))
    }
}

/// Parses the Retry-After header.
///
/// Supports both delay-seconds (integer) and HTTP-date formats. A date in the
/// past yields a zero wait.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let header = headers.get(http::header::RETRY_AFTER)?.to_str().ok()?.trim();

    if let Ok(seconds) = header.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    let date_time = httpdate::parse_http_date(header).ok()?;
    Some(
        date_time
            .duration_since(SystemTime::now())
            .unwrap_or(Duration::ZERO),
    )
}
