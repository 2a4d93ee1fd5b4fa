//! Multi-page GET requests.
//!
//! Dashboard list endpoints paginate with RFC 8288 `Link` headers. A walk
//! starts from a resource path, then follows the `next` (or `prev`) relation
//! until the server stops sending one, the requested number of pages has been
//! fetched, or, for the network event log, the cursor shows there is nothing
//! left to read.
//!
//! Pages can be gathered two ways:
//!
//! - **Eager** ([`Client::collect_pages`]): every page is fetched before
//!   returning one merged JSON value.
//! - **Lazy** ([`Client::stream_pages`]): items are yielded one by one and the
//!   next page is only requested once the current one is drained.
//!
//! [`Client::get_pages`] picks between them according to the client's
//! [`PaginationMode`].
//!
//! # Examples
//!
//! ```no_run
//! use futures::TryStreamExt;
//! use meraki::pagination::{Direction, PageOptions, TotalPages};
//! use meraki::{Client, EndpointMetadata};
//!
//! # async fn example() -> Result<(), meraki::Error> {
//! let client = Client::builder().api_key("my-api-key").build()?;
//! let metadata = EndpointMetadata::new(["organizations", "configure"], "getOrganizationNetworks");
//!
//! let options = PageOptions::new()
//!     .total_pages("all".parse::<TotalPages>()?)
//!     .direction(Direction::Next);
//! let networks = client
//!     .collect_pages(&metadata, "/organizations/123/networks", None, options.clone())
//!     .await?;
//!
//! let mut stream = client.stream_pages(&metadata, "/organizations/123/networks", None, options);
//! while let Some(network) = stream.try_next().await? {
//!     println!("{network}");
//! }
//! # Ok(())
//! # }
//! ```

mod link;
mod page;
mod walker;

use chrono::{DateTime, Utc};
use futures::stream::{self, BoxStream, StreamExt};
use serde_json::Value;
use std::collections::VecDeque;
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

pub use link::{cursor, parse_timestamp, Links};
pub use page::Shape;

use crate::client::Client;
use crate::endpoint::Endpoint;
use crate::metadata::EndpointMetadata;
use crate::params::Params;
use crate::{Error, Result};
use page::Collector;
use walker::PageWalker;

/// Operation whose walks use time-based stopping rules.
pub const EVENT_LOG_OPERATION: &str = "getNetworkEvents";

/// Stream of items produced by lazy pagination.
pub type PageStream = BoxStream<'static, Result<Value>>;

/// How [`Client::get_pages`] returns its pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaginationMode {
    /// Fetch everything, then return one merged value.
    #[default]
    Eager,
    /// Return a stream that fetches pages on demand.
    Lazy,
}

/// Which `Link` relation a walk follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Follow `rel=next`.
    #[default]
    Next,
    /// Follow `rel=prev`.
    Prev,
}

impl Direction {
    /// The `Link` relation name.
    pub fn rel(self) -> &'static str {
        match self {
            Direction::Next => "next",
            Direction::Prev => "prev",
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "next" => Ok(Direction::Next),
            "prev" => Ok(Direction::Prev),
            other => Err(Error::InvalidInput(format!(
                "direction must be \"next\" or \"prev\", got {other:?}"
            ))),
        }
    }
}

/// Number of pages to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TotalPages {
    /// Keep going until the server runs out of pages.
    #[default]
    All,
    /// Stop after this many pages.
    Count(NonZeroU32),
}

impl TryFrom<i64> for TotalPages {
    type Error = Error;

    /// `-1` means all pages; any other value must be a positive page count.
    fn try_from(value: i64) -> Result<Self> {
        if value == -1 {
            return Ok(TotalPages::All);
        }
        u32::try_from(value)
            .ok()
            .and_then(NonZeroU32::new)
            .map(TotalPages::Count)
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "total_pages must be a positive integer, -1 or \"all\", got {value}"
                ))
            })
    }
}

impl FromStr for TotalPages {
    type Err = Error;

    /// Accepts `"all"` in any case, `"-1"`, or a positive integer.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(TotalPages::All);
        }
        let value = s.parse::<i64>().map_err(|_| {
            Error::InvalidInput(format!(
                "total_pages must be a positive integer, -1 or \"all\", got {s:?}"
            ))
        })?;
        TotalPages::try_from(value)
    }
}

/// Options of one paginated fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageOptions {
    /// Pages to fetch. Defaults to all.
    pub total_pages: TotalPages,
    /// Relation to follow. Defaults to `next`.
    pub direction: Direction,
    /// Forward event log walks stop once their cursor passes this time.
    pub event_log_end_time: Option<DateTime<Utc>>,
}

impl PageOptions {
    /// All pages, walking forward.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of pages.
    pub fn total_pages(mut self, total_pages: TotalPages) -> Self {
        self.total_pages = total_pages;
        self
    }

    /// Sets the direction.
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Sets the event log end time.
    pub fn event_log_end_time(mut self, end_time: DateTime<Utc>) -> Self {
        self.event_log_end_time = Some(end_time);
        self
    }
}

/// Result of [`Client::get_pages`].
pub enum Pages {
    /// Merged result of an eager walk; `None` if the first page was empty.
    Collected(Option<Value>),
    /// Items of a lazy walk.
    Stream(PageStream),
}

impl fmt::Debug for Pages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pages::Collected(value) => f.debug_tuple("Collected").field(value).finish(),
            Pages::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl Client {
    /// Fetches a paginated resource using the client's [`PaginationMode`].
    ///
    /// # Errors
    ///
    /// Eager walks fail with the first failing page. Lazy walks never fail
    /// here; their errors surface from the stream.
    pub async fn get_pages(
        &self,
        metadata: &EndpointMetadata,
        path: &str,
        params: Option<&Params>,
        options: PageOptions,
    ) -> Result<Pages> {
        match self.pagination_mode() {
            PaginationMode::Eager => self
                .collect_pages(metadata, path, params, options)
                .await
                .map(Pages::Collected),
            PaginationMode::Lazy => Ok(Pages::Stream(
                self.stream_pages(metadata, path, params, options),
            )),
        }
    }

    /// Fetches every requested page and merges them.
    ///
    /// Array pages are concatenated. `items` pages are concatenated and keep
    /// the last page's `meta.counts.items.remaining`. Event log pages are put
    /// in chronological order when walking forward, and the merged
    /// `pageStartAt`/`pageEndAt` span every page. Returns `None` when the first
    /// page has no body (e.g. `204 No Content`).
    ///
    /// # Errors
    ///
    /// Returns the first page's error, or [`Error::UnexpectedResponse`] when a
    /// later page does not have the first page's shape.
    pub async fn collect_pages(
        &self,
        metadata: &EndpointMetadata,
        path: &str,
        params: Option<&Params>,
        options: PageOptions,
    ) -> Result<Option<Value>> {
        let mut walker = PageWalker::new(
            self.clone(),
            metadata.clone(),
            path.to_string(),
            params.cloned(),
            options,
        );
        let mut collector = Collector::new(
            metadata.operation.clone(),
            walker.is_event_log(),
            walker.direction(),
        );

        while let Some(page) = walker.next_page().await? {
            match page.body {
                Some(body) => collector.absorb(body)?,
                None => tracing::debug!(
                    operation = %metadata.operation,
                    page = page.state.page,
                    "Page has no body"
                ),
            }
        }

        Ok(collector.finish())
    }

    /// Returns a stream over the items of every requested page.
    ///
    /// Nothing is requested until the stream is polled, and each further page
    /// only once the previous one is drained. Items come out in the same order
    /// [`Client::collect_pages`] would put them. The stream ends after its
    /// first error.
    pub fn stream_pages(
        &self,
        metadata: &EndpointMetadata,
        path: &str,
        params: Option<&Params>,
        options: PageOptions,
    ) -> PageStream {
        let state = StreamState {
            walker: PageWalker::new(
                self.clone(),
                metadata.clone(),
                path.to_string(),
                params.cloned(),
                options,
            ),
            shape: None,
            buffered: VecDeque::new(),
        };
        stream::try_unfold(state, next_item).boxed()
    }

    /// Fetches the pages of a described GET endpoint with loose arguments.
    ///
    /// Arguments the endpoint does not accept as query parameters are dropped.
    pub async fn get_endpoint_pages(
        &self,
        endpoint: &Endpoint,
        path_args: &[(&str, &str)],
        args: &Params,
        options: PageOptions,
    ) -> Result<Pages> {
        let metadata = endpoint.metadata();
        let path = endpoint.path(path_args)?;
        let query = endpoint.query(args);
        self.get_pages(&metadata, &path, Some(&query), options).await
    }
}

struct StreamState {
    walker: PageWalker,
    shape: Option<Shape>,
    buffered: VecDeque<Value>,
}

impl StreamState {
    fn absorb(&mut self, body: Value) -> Result<()> {
        let operation = &self.walker.metadata().operation;
        let direction = self.walker.direction();

        match self.shape {
            Some(shape) => {
                let items = shape.take_items(shape.normalize(body, direction), operation)?;
                self.buffered.extend(items);
            }
            None => {
                let shape = Shape::detect(&body, self.walker.is_event_log());
                self.shape = Some(shape);
                let body = shape.normalize(body, direction);
                if shape == Shape::Single {
                    self.buffered.push_back(body);
                } else {
                    self.buffered.extend(shape.take_items(body, operation)?);
                }
            }
        }
        Ok(())
    }
}

async fn next_item(mut state: StreamState) -> Result<Option<(Value, StreamState)>> {
    loop {
        if let Some(item) = state.buffered.pop_front() {
            return Ok(Some((item, state)));
        }
        let Some(page) = state.walker.next_page().await? else {
            return Ok(None);
        };
        if let Some(body) = page.body {
            state.absorb(body)?;
        }
    }
}
