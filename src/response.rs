//! Response wrapper that preserves both decoded data and raw response details.
//!
//! The transport hands back a [`Response`] for every successful call so that
//! pagination can read the `Link` header while callers get the decoded JSON.

use http::{HeaderMap, StatusCode};
use std::time::Duration;

/// A successful HTTP response.
///
/// # Type Parameters
///
/// * `T` - The type of the decoded response data
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The decoded response data.
    pub data: T,

    /// The raw response body as a string.
    pub raw_body: String,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// The total latency of the call, including every retry and redirect.
    pub latency: Duration,

    /// The number of HTTP attempts made to complete this call.
    pub attempts: usize,
}

impl<T> Response<T> {
    /// Creates a new `Response`.
    pub fn new(
        data: T,
        raw_body: String,
        status: StatusCode,
        headers: HeaderMap,
        latency: Duration,
        attempts: usize,
    ) -> Self {
        Self {
            data,
            raw_body,
            status,
            headers,
            latency,
            attempts,
        }
    }

    /// Returns `true` if the call required retries.
    pub fn was_retried(&self) -> bool {
        self.attempts > 1
    }

    /// Returns a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Returns every `Link` header value joined into one list.
    ///
    /// Servers may split relations across several `Link` headers.
    pub fn link_header(&self) -> Option<String> {
        let values: Vec<&str> = self
            .headers
            .get_all(http::header::LINK)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.join(", "))
        }
    }
}
