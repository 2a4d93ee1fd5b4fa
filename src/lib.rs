//! # meraki - Transport layer for the Meraki Dashboard API
//!
//! This crate is the HTTP session underneath a dashboard API client: it
//! authenticates, retries rate limiting and transient failures from a bounded
//! per-call budget, follows redirects between API deployments, classifies 4xx
//! errors, and walks `Link`-paginated list endpoints either eagerly or as a
//! stream.
//!
//! ## Quick Start
//!
//! ```no_run
//! use meraki::pagination::PageOptions;
//! use meraki::{Client, EndpointMetadata};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), meraki::Error> {
//!     // Reads MERAKI_DASHBOARD_API_KEY when no key is given.
//!     let client = Client::builder().maximum_retries(4).build()?;
//!
//!     let metadata = EndpointMetadata::new(["organizations", "configure"], "getOrganizations");
//!     let organizations = client.get(&metadata, "/organizations", None).await?;
//!     println!("{organizations:?}");
//!
//!     let metadata = EndpointMetadata::new(["organizations", "configure"], "getOrganizationNetworks");
//!     let networks = client
//!         .collect_pages(&metadata, "/organizations/123/networks", None, PageOptions::new())
//!         .await?;
//!     println!("{networks:?}");
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Failed calls carry the primary tag, operation, status and the server's
//! message:
//!
//! ```no_run
//! use meraki::{Client, EndpointMetadata, Error};
//!
//! # async fn example(client: Client) {
//! let metadata = EndpointMetadata::new(["networks", "configure"], "getNetwork");
//! match client.get(&metadata, "/networks/N_1", None).await {
//!     Ok(network) => println!("{network:?}"),
//!     Err(Error::Api(e)) => eprintln!("{} failed with {}: {}", e.operation, e.status, e.message),
//!     Err(e) => eprintln!("{e}"),
//! }
//! # }
//! ```
//!
//! ## Retries
//!
//! | Response | Wait before the next attempt |
//! |---|---|
//! | connection error, 5xx, undecodable GET body | 1 second |
//! | 429 | `Retry-After`, else random up to `nginx_429_retry_wait_time` |
//! | 4xx, concurrent network deletion | random between 30 s and `network_delete_retry_wait_time` |
//! | 4xx, too many action batches | `action_batch_retry_wait_time` |
//! | other 4xx with `retry_4xx_error` | random up to `retry_4xx_error_wait_time` |
//!
//! Every wait spends one of `maximum_retries`; redirects spend nothing.

pub mod classify;
mod client;
pub mod endpoint;
mod error;
pub mod logging;
pub mod metadata;
pub mod pagination;
pub mod params;
pub mod rate_limit;
mod response;
pub mod retry;

pub use client::{
    rewrite_base_url, Client, ClientBuilder, JsonResponse, API_KEY_ENV, BE_GEO_ID_ENV, CALLER_ENV,
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT,
};
pub use endpoint::{Endpoint, EndpointMethod};
pub use error::{ApiError, ApiMessage, Error, Result};
pub use logging::LoggingConfig;
pub use metadata::{EndpointMetadata, PageState};
pub use pagination::{Direction, PageOptions, PageStream, Pages, PaginationMode, TotalPages};
pub use params::Params;
pub use response::Response;
pub use retry::{RetryBudget, RetryPolicy};
