//! Endpoint metadata and per-page state.

use serde::Serialize;
use std::fmt;

/// Descriptive metadata for one dashboard operation.
///
/// The first tag is the primary tag used in log lines and error messages.
/// Metadata is never mutated by the transport; multi-page fetches thread a
/// separate [`PageState`] alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointMetadata {
    /// Ordered tags, primary tag first.
    pub tags: Vec<String>,

    /// Operation identifier, e.g. `getNetworkEvents`.
    pub operation: String,
}

impl EndpointMetadata {
    /// Creates metadata from a list of tags and an operation name.
    pub fn new<I, S>(tags: I, operation: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            operation: operation.into(),
        }
    }

    /// Returns the primary tag, or an empty string when there are no tags.
    pub fn primary_tag(&self) -> &str {
        self.tags.first().map(String::as_str).unwrap_or_default()
    }

    /// Returns `true` if this is the given operation.
    pub fn is(&self, operation: &str) -> bool {
        self.operation == operation
    }
}

impl fmt::Display for EndpointMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.primary_tag(), self.operation)
    }
}

/// Position within a paginated fetch.
///
/// Starts at page 1 and only ever moves forward for the lifetime of one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    /// 1-indexed page number.
    pub page: u32,
}

impl PageState {
    /// State for the first page.
    pub fn first() -> Self {
        Self { page: 1 }
    }

    /// State for the page after this one.
    #[must_use]
    pub fn advance(self) -> Self {
        Self {
            page: self.page.saturating_add(1),
        }
    }
}
