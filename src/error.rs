//! Error types for dashboard API calls.
//!
//! Every terminal failure of a call surfaces as an [`Error`]. Failures that came
//! back from the dashboard (or that the transport gave up on) are carried by
//! [`ApiError`], which keeps the tag, operation, HTTP status, reason phrase and
//! best-effort decoded message so callers can branch without re-parsing the
//! response.

use http::StatusCode;
use serde_json::Value;
use std::fmt;

use crate::metadata::EndpointMetadata;

/// Number of characters of a non-JSON body kept as the error message.
const RAW_MESSAGE_LIMIT: usize = 100;

/// The main error type for dashboard API calls.
///
/// # Examples
///
/// ```no_run
/// use meraki::{Client, EndpointMetadata, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder().api_key("secret").build()?;
/// let metadata = EndpointMetadata::new(["organizations"], "getOrganizations");
///
/// match client.get(&metadata, "/organizations", None).await {
///     Ok(orgs) => println!("{orgs:?}"),
///     Err(Error::Api(err)) if err.status.as_u16() == 404 => {
///         eprintln!("not found: {}", err.message);
///     }
///     Err(e) => eprintln!("other error: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No API key was supplied to the builder or through the environment.
    #[error("Meraki API key needs to be defined")]
    ApiKeyMissing,

    /// Invalid configuration was provided.
    ///
    /// Covers unusable base URLs, proxies, certificate files, header values and
    /// logging sinks.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A caller-supplied argument was rejected before any request was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The dashboard answered with an error, or retries were exhausted.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A successful non-GET response carried a body that is not JSON.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// A page of a paginated call did not have the shape of the first page.
    #[error("Unexpected response for {operation}: {detail}")]
    UnexpectedResponse {
        /// The operation being paginated
        operation: String,
        /// What was wrong with the page
        detail: String,
    },

    /// The server kept redirecting.
    #[error("{operation} - gave up after {limit} consecutive redirects")]
    TooManyRedirects {
        /// The operation that was redirected
        operation: String,
        /// The redirect limit that was hit
        limit: usize,
    },

    /// An invalid URL was provided or returned by the server.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The underlying HTTP client could not be constructed.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl Error {
    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api(err) => Some(err.status),
            Error::DeserializationFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the inner [`ApiError`], if any.
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// Best-effort decoded body of a failed response.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiMessage {
    /// The body parsed as JSON.
    Json(Value),
    /// The body was not JSON; holds at most its first 100 characters.
    Text(String),
    /// No body (or no response at all).
    Empty,
}

impl ApiMessage {
    /// Decodes a response body, falling back to truncated text.
    pub fn from_body(body: &str) -> Self {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return ApiMessage::Empty;
        }
        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Null) => ApiMessage::Empty,
            Ok(value) => ApiMessage::Json(value),
            Err(_) => ApiMessage::Text(trimmed.chars().take(RAW_MESSAGE_LIMIT).collect()),
        }
    }

    /// Returns the first entry of a JSON `errors` array, if it is a string.
    ///
    /// The dashboard reports failures as `{"errors": ["..."]}`.
    pub fn first_error(&self) -> Option<&str> {
        match self {
            ApiMessage::Json(value) => value.get("errors")?.as_array()?.first()?.as_str(),
            _ => None,
        }
    }
}

impl fmt::Display for ApiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiMessage::Json(value) => write!(f, "{value}"),
            ApiMessage::Text(text) => f.write_str(text),
            ApiMessage::Empty => f.write_str("None"),
        }
    }
}

/// A classified failure of one logical API call.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{tag}, {operation} - {} {reason}, {message}", .status.as_u16())]
pub struct ApiError {
    /// Primary tag of the endpoint (first entry of its tags).
    pub tag: String,
    /// Operation identifier, e.g. `getOrganizations`.
    pub operation: String,
    /// HTTP status; 503 when no response was ever received.
    pub status: StatusCode,
    /// Reason phrase for the status.
    pub reason: String,
    /// Decoded body of the failed response.
    pub message: ApiMessage,
}

impl ApiError {
    /// Builds an error from a received response.
    pub fn from_response(metadata: &EndpointMetadata, status: StatusCode, body: &str) -> Self {
        Self {
            tag: metadata.primary_tag().to_string(),
            operation: metadata.operation.clone(),
            status,
            reason: reason_phrase(status),
            message: ApiMessage::from_body(body),
        }
    }

    /// Builds the synthetic 503 used when the server could never be reached.
    pub fn unavailable(metadata: &EndpointMetadata) -> Self {
        Self {
            tag: metadata.primary_tag().to_string(),
            operation: metadata.operation.clone(),
            status: StatusCode::SERVICE_UNAVAILABLE,
            reason: reason_phrase(StatusCode::SERVICE_UNAVAILABLE),
            message: ApiMessage::Empty,
        }
    }
}

pub(crate) fn reason_phrase(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("Unknown").to_string()
}

/// A specialized `Result` type for dashboard API calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> EndpointMetadata {
        EndpointMetadata::new(["networks", "configure"], "deleteNetwork")
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::from_response(
            &metadata(),
            StatusCode::NOT_FOUND,
            r#"{"errors": ["resource not found"]}"#,
        );
        assert_eq!(
            err.to_string(),
            r#"networks, deleteNetwork - 404 Not Found, {"errors":["resource not found"]}"#
        );
    }

    #[test]
    fn test_unavailable_is_503() {
        let err = ApiError::unavailable(&metadata());
        assert_eq!(err.status.as_u16(), 503);
        assert_eq!(err.reason, "Service Unavailable");
        assert_eq!(err.message, ApiMessage::Empty);
    }

    #[test]
    fn test_non_json_message_is_truncated() {
        let body = "x".repeat(250);
        let message = ApiMessage::from_body(&body);
        assert_eq!(message, ApiMessage::Text("x".repeat(100)));
    }

    #[test]
    fn test_first_error() {
        let message = ApiMessage::from_body(r#"{"errors": ["first", "second"]}"#);
        assert_eq!(message.first_error(), Some("first"));
        assert_eq!(ApiMessage::from_body("<html>").first_error(), None);
    }

    #[test]
    fn test_error_status() {
        let err = Error::Api(ApiError::unavailable(&metadata()));
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert!(err.as_api_error().is_some());
        assert_eq!(Error::ApiKeyMissing.status(), None);
    }
}
