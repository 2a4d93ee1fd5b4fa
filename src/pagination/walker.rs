//! Page-by-page traversal of a `Link`-paginated endpoint.

use chrono::{DateTime, Utc};
use http::Method;
use serde_json::Value;

use super::link::{cursor, parse_timestamp, Links};
use super::{Direction, PageOptions, TotalPages, EVENT_LOG_OPERATION};
use crate::client::{Call, Client};
use crate::metadata::{EndpointMetadata, PageState};
use crate::params::Params;
use crate::Result;

/// Forward event log walks stop once the cursor is this close to now.
const EVENT_LOG_RECENT_WINDOW_SECS: i64 = 5 * 60;

/// 2014-01-01T00:00:00Z. No event log predates it.
const EVENT_LOG_EPOCH_SECS: i64 = 1_388_534_400;

/// One fetched page.
#[derive(Debug)]
pub(crate) struct FetchedPage {
    pub(crate) state: PageState,
    pub(crate) body: Option<Value>,
}

enum Cursor {
    Start { path: String, params: Option<Params> },
    Follow(String),
    Done,
}

/// Fetches pages one at a time, following the `Link` relation of its
/// direction until the link runs out, the page budget is spent or an event log
/// heuristic says there is nothing left.
pub(crate) struct PageWalker {
    client: Client,
    metadata: EndpointMetadata,
    direction: Direction,
    event_log_end_time: Option<DateTime<Utc>>,
    pages_left: Option<u32>,
    state: PageState,
    cursor: Cursor,
}

impl PageWalker {
    pub(crate) fn new(
        client: Client,
        metadata: EndpointMetadata,
        path: String,
        params: Option<Params>,
        options: PageOptions,
    ) -> Self {
        let pages_left = match options.total_pages {
            TotalPages::All => None,
            TotalPages::Count(count) => Some(count.get()),
        };
        Self {
            client,
            metadata,
            direction: options.direction,
            event_log_end_time: options.event_log_end_time,
            pages_left,
            state: PageState::first(),
            cursor: Cursor::Start { path, params },
        }
    }

    pub(crate) fn metadata(&self) -> &EndpointMetadata {
        &self.metadata
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn is_event_log(&self) -> bool {
        self.metadata.is(EVENT_LOG_OPERATION)
    }

    /// Fetches the next page, `Ok(None)` once the walk is over.
    pub(crate) async fn next_page(&mut self) -> Result<Option<FetchedPage>> {
        let (url, params) = match std::mem::replace(&mut self.cursor, Cursor::Done) {
            Cursor::Done => return Ok(None),
            Cursor::Start { path, params } => (path, params),
            Cursor::Follow(url) => {
                self.state = self.state.advance();
                (url, None)
            }
        };

        let response = self
            .client
            .send(Call {
                metadata: &self.metadata,
                page: Some(self.state),
                method: Method::GET,
                url: &url,
                params: params.as_ref(),
                body: None,
            })
            .await?;
        let Some(response) = response else {
            return Ok(None);
        };

        if let Some(left) = self.pages_left.as_mut() {
            *left = left.saturating_sub(1);
        }

        let links = response
            .link_header()
            .map(|header| Links::parse(&header))
            .unwrap_or_default();
        self.cursor = self.next_cursor(response.data.is_some(), &links);

        Ok(Some(FetchedPage {
            state: self.state,
            body: response.data,
        }))
    }

    fn next_cursor(&self, has_body: bool, links: &Links) -> Cursor {
        if !has_body || self.pages_left == Some(0) {
            return Cursor::Done;
        }
        let Some(target) = links.get(self.direction.rel()) else {
            return Cursor::Done;
        };
        if self.is_event_log()
            && event_log_exhausted(self.direction, target, Utc::now(), self.event_log_end_time)
        {
            tracing::debug!(
                operation = %self.metadata.operation,
                page = self.state.page,
                link = target,
                "Event log exhausted, stopping"
            );
            return Cursor::Done;
        }
        Cursor::Follow(target.to_string())
    }
}

/// Decides whether the event log has nothing beyond `link`.
///
/// Walking forward, there is nothing newer once the `startingAfter` cursor is
/// within five minutes of `now` or past `end_time`. Walking backward, there is
/// nothing older than 2014. Cursors that are not timestamps never stop a walk.
pub(crate) fn event_log_exhausted(
    direction: Direction,
    link: &str,
    now: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
) -> bool {
    match direction {
        Direction::Next => {
            let Some(starting_after) = cursor(link, "startingAfter").and_then(|c| parse_timestamp(&c))
            else {
                return false;
            };
            (now - starting_after).num_seconds() < EVENT_LOG_RECENT_WINDOW_SECS
                || end_time.is_some_and(|end| starting_after > end)
        }
        Direction::Prev => cursor(link, "endingBefore")
            .and_then(|c| parse_timestamp(&c))
            .is_some_and(|ending_before| ending_before.timestamp() < EVENT_LOG_EPOCH_SECS),
    }
}
