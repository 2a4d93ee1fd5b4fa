//! HTTP session for the dashboard API.
//!
//! The [`Client`] executes one logical API operation per call, which may take
//! several HTTP attempts: it retries rate limiting, server errors, connection
//! failures, undecodable bodies and known 4xx conflicts from a bounded
//! per-call budget, and follows redirects between the API hostnames itself.
//! Use [`ClientBuilder`] to configure and create clients.

use http::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, LOCATION, USER_AGENT};
use http::{Method, StatusCode};
use serde_json::Value;
use std::env;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};
use url::Url;

use crate::classify::{classify_client_error, Verdict};
use crate::endpoint::{Endpoint, EndpointMethod};
use crate::error::{reason_phrase, ApiError, ApiMessage};
use crate::logging::{self, LoggingConfig};
use crate::metadata::{EndpointMetadata, PageState};
use crate::pagination::PaginationMode;
use crate::params::{encode_query, Params};
use crate::rate_limit::RateLimitConfig;
use crate::retry::{RetryBudget, RetryPolicy, FIXED_RETRY_WAIT, NETWORK_DELETE_MIN_WAIT_SECS};
use crate::{Error, Response, Result};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.meraki.com/api/v1";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "MERAKI_DASHBOARD_API_KEY";

/// Environment variable holding the partner (BE GEO) identifier.
pub const BE_GEO_ID_ENV: &str = "BE_GEO_ID";

/// Environment variable holding the caller identification string.
pub const CALLER_ENV: &str = "MERAKI_SDK_CALLER";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const USER_AGENT_PREFIX: &str = concat!("meraki-rust/", env!("CARGO_PKG_VERSION"));

/// Host/path fragments of the two API deployments a redirect may point at.
const API_HOST_MARKERS: [&str; 2] = ["meraki.com/api/v", "meraki.cn/api/v"];

/// Consecutive redirects followed within one call.
const MAX_REDIRECTS: usize = 10;

/// A successful response with its decoded JSON body (`None` when empty).
pub type JsonResponse = Response<Option<Value>>;

/// An HTTP session for making dashboard API calls.
///
/// The client is cheap to clone; clones share the connection pool, the
/// configuration and the (redirect-updated) base URL.
///
/// # Examples
///
/// ```no_run
/// use meraki::{Client, EndpointMetadata};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), meraki::Error> {
/// let client = Client::builder()
///     .api_key("my-api-key")
///     .single_request_timeout(Duration::from_secs(30))
///     .maximum_retries(4)
///     .build()?;
///
/// let metadata = EndpointMetadata::new(["organizations", "configure"], "getOrganizations");
/// let organizations = client.get(&metadata, "/organizations", None).await?;
/// println!("{organizations:?}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: RwLock<String>,
    timeout: Duration,
    retry_policy: RetryPolicy,
    rate_limit_config: RateLimitConfig,
    simulate: bool,
    pagination_mode: PaginationMode,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url())
            .field("simulate", &self.inner.simulate)
            .field("pagination_mode", &self.inner.pagination_mode)
            .finish_non_exhaustive()
    }
}

/// One logical request as seen by the retry loop.
pub(crate) struct Call<'a> {
    pub(crate) metadata: &'a EndpointMetadata,
    pub(crate) page: Option<PageState>,
    pub(crate) method: Method,
    pub(crate) url: &'a str,
    pub(crate) params: Option<&'a Params>,
    pub(crate) body: Option<&'a Value>,
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Returns the current base URL.
    ///
    /// Redirects to the other API deployment rewrite it for every clone.
    pub fn base_url(&self) -> String {
        self.inner
            .base_url
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the pagination mode used by [`Client::get_pages`].
    pub fn pagination_mode(&self) -> PaginationMode {
        self.inner.pagination_mode
    }

    /// Returns the retry policy.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.inner.retry_policy
    }

    /// Executes one logical API operation and returns the raw response.
    ///
    /// `url` may be absolute or relative to the base URL. Returns `Ok(None)`
    /// for non-GET calls in simulate mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] when the response is a non-retryable error or the
    /// retry budget is exhausted.
    pub async fn request(
        &self,
        metadata: &EndpointMetadata,
        method: Method,
        url: &str,
        params: Option<&Params>,
        body: Option<&Value>,
    ) -> Result<Option<JsonResponse>> {
        self.send(Call {
            metadata,
            page: None,
            method,
            url,
            params,
            body,
        })
        .await
    }

    /// Makes a GET request and returns the decoded body.
    pub async fn get(
        &self,
        metadata: &EndpointMetadata,
        url: &str,
        params: Option<&Params>,
    ) -> Result<Option<Value>> {
        let response = self.request(metadata, Method::GET, url, params, None).await?;
        Ok(response.and_then(|r| r.data))
    }

    /// Makes a POST request with an optional JSON body.
    pub async fn post(
        &self,
        metadata: &EndpointMetadata,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>> {
        let response = self.request(metadata, Method::POST, url, None, body).await?;
        Ok(response.and_then(|r| r.data))
    }

    /// Makes a PUT request with an optional JSON body.
    pub async fn put(
        &self,
        metadata: &EndpointMetadata,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>> {
        let response = self.request(metadata, Method::PUT, url, None, body).await?;
        Ok(response.and_then(|r| r.data))
    }

    /// Makes a DELETE request. Any response body is discarded.
    pub async fn delete(&self, metadata: &EndpointMetadata, url: &str) -> Result<()> {
        self.request(metadata, Method::DELETE, url, None, None).await?;
        Ok(())
    }

    /// Calls a described endpoint with loose named arguments.
    ///
    /// Arguments not accepted by the endpoint are dropped. GET endpoints send
    /// the filtered query; POST and PUT send the filtered body.
    pub async fn call_endpoint(
        &self,
        endpoint: &Endpoint,
        path_args: &[(&str, &str)],
        args: &Params,
    ) -> Result<Option<Value>> {
        let metadata = endpoint.metadata();
        let path = endpoint.path(path_args)?;

        match endpoint.method {
            EndpointMethod::Get => {
                let query = endpoint.query(args);
                self.get(&metadata, &path, Some(&query)).await
            }
            EndpointMethod::Post => {
                let body = Value::Object(endpoint.body(args));
                self.post(&metadata, &path, Some(&body)).await
            }
            EndpointMethod::Put => {
                let body = Value::Object(endpoint.body(args));
                self.put(&metadata, &path, Some(&body)).await
            }
            EndpointMethod::Delete => {
                self.delete(&metadata, &path).await?;
                Ok(None)
            }
        }
    }

    /// Runs the retry loop for one logical call.
    pub(crate) async fn send(&self, call: Call<'_>) -> Result<Option<JsonResponse>> {
        let metadata = call.metadata;
        let tag = metadata.primary_tag();
        let operation = metadata.operation.as_str();

        if self.inner.simulate && call.method != Method::GET {
            tracing::info!(tag, operation, method = %call.method, "{tag}, {operation} - SIMULATED");
            return Ok(None);
        }

        let start_time = Instant::now();
        let mut url = self.absolute_url(call.url);
        let mut query = call.params.map(encode_query);
        let mut budget = self.inner.retry_policy.budget();
        let mut attempts = 0;
        let mut redirects = 0;

        loop {
            attempts += 1;

            tracing::debug!(
                tag,
                operation,
                method = %call.method,
                url = %url,
                attempt = attempts,
                "Executing HTTP request"
            );

            let mut request = self
                .inner
                .http_client
                .request(call.method.clone(), url.as_str())
                .timeout(self.inner.timeout);
            if let Some(query) = &query {
                request = request.query(query);
            }
            if let Some(body) = call.body {
                request = request.json(body);
            }

            let (status, headers, raw_body) = match execute(request).await {
                Ok(parts) => parts,
                Err(e) => {
                    tracing::warn!(
                        tag,
                        operation,
                        error = %e,
                        "{tag}, {operation} - {e}, retrying in 1 second"
                    );
                    if wait_and_spend(FIXED_RETRY_WAIT, &mut budget).await {
                        let err = match e.status() {
                            Some(status) => ApiError::from_response(metadata, status, ""),
                            None => ApiError::unavailable(metadata),
                        };
                        return Err(fail(err));
                    }
                    continue;
                }
            };
            let reason = reason_phrase(status);

            if status.is_redirection() {
                redirects += 1;
                if redirects > MAX_REDIRECTS {
                    return Err(Error::TooManyRedirects {
                        operation: operation.to_string(),
                        limit: MAX_REDIRECTS,
                    });
                }
                let Some(location) = headers.get(LOCATION).and_then(|v| v.to_str().ok()) else {
                    return Err(fail(ApiError::from_response(metadata, status, &raw_body)));
                };
                let next = Url::parse(&url)?.join(location)?;
                if let Some(base_url) = rewrite_base_url(next.as_str()) {
                    self.set_base_url(base_url);
                }
                tracing::debug!(tag, operation, location = %next, "Following redirect");
                // A location with its own query replaces the caller's.
                if next.query().is_some() {
                    query = None;
                }
                url = next.to_string();
                continue;
            }

            if status.is_success() {
                match call.page {
                    Some(state) => tracing::info!(
                        tag,
                        operation,
                        page = state.page,
                        status = status.as_u16(),
                        "{tag}, {operation}; page {} - {} {reason}",
                        state.page,
                        status.as_u16()
                    ),
                    None => tracing::info!(
                        tag,
                        operation,
                        status = status.as_u16(),
                        "{tag}, {operation} - {} {reason}",
                        status.as_u16()
                    ),
                }

                let data = if raw_body.trim().is_empty() {
                    None
                } else {
                    match serde_json::from_str::<Value>(&raw_body) {
                        Ok(value) => Some(value),
                        Err(e) if call.method == Method::GET => {
                            tracing::warn!(
                                tag,
                                operation,
                                error = %e,
                                "{tag}, {operation} - {e}, retrying in 1 second"
                            );
                            if wait_and_spend(FIXED_RETRY_WAIT, &mut budget).await {
                                return Err(fail(ApiError::from_response(
                                    metadata, status, &raw_body,
                                )));
                            }
                            continue;
                        }
                        Err(e) => {
                            return Err(Error::DeserializationFailed {
                                raw_response: raw_body,
                                serde_error: e.to_string(),
                                status,
                            });
                        }
                    }
                };

                return Ok(Some(Response::new(
                    data,
                    raw_body,
                    status,
                    headers,
                    start_time.elapsed(),
                    attempts,
                )));
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let rate_limit = &self.inner.rate_limit_config;
                if !rate_limit.wait_on_rate_limit {
                    return Err(fail(ApiError::from_response(metadata, status, &raw_body)));
                }
                let wait = rate_limit.delay(&headers);
                tracing::warn!(
                    tag,
                    operation,
                    wait_secs = wait.as_secs(),
                    "{tag}, {operation} - {} {reason}, retrying in {} seconds",
                    status.as_u16(),
                    wait.as_secs()
                );
                if wait_and_spend(wait, &mut budget).await {
                    return Err(fail(ApiError::from_response(metadata, status, &raw_body)));
                }
                continue;
            }

            if status.is_server_error() {
                tracing::warn!(
                    tag,
                    operation,
                    status = status.as_u16(),
                    "{tag}, {operation} - {} {reason}, retrying in 1 second",
                    status.as_u16()
                );
                if wait_and_spend(FIXED_RETRY_WAIT, &mut budget).await {
                    return Err(fail(ApiError::from_response(metadata, status, &raw_body)));
                }
                continue;
            }

            if status.is_client_error() {
                let message = ApiMessage::from_body(&raw_body);
                match classify_client_error(&self.inner.retry_policy, operation, status, &message) {
                    Verdict::Retry { wait, cause } => {
                        tracing::warn!(
                            tag,
                            operation,
                            wait_secs = wait.as_secs(),
                            "{tag}, {operation} - {} {reason}, {message}, {}; retrying in {} seconds",
                            status.as_u16(),
                            cause.as_str(),
                            wait.as_secs()
                        );
                        if wait_and_spend(wait, &mut budget).await {
                            return Err(fail(ApiError::from_response(metadata, status, &raw_body)));
                        }
                        continue;
                    }
                    Verdict::Fail => {
                        return Err(fail(ApiError::from_response(metadata, status, &raw_body)));
                    }
                }
            }

            // 1xx and anything else the server should never send here.
            return Err(fail(ApiError::from_response(metadata, status, &raw_body)));
        }
    }

    fn absolute_url(&self, url: &str) -> String {
        if url.starts_with("https://") || url.starts_with("http://") {
            url.to_string()
        } else {
            format!("{}{}", self.base_url(), url)
        }
    }

    fn set_base_url(&self, base_url: String) {
        let mut guard = self
            .inner
            .base_url
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if *guard != base_url {
            tracing::info!(base_url = %base_url, "Base URL updated from redirect");
            *guard = base_url;
        }
    }
}

/// Sends a request and reads the whole body, releasing the connection.
async fn execute(
    request: reqwest::RequestBuilder,
) -> std::result::Result<(StatusCode, HeaderMap, String), reqwest::Error> {
    let response = request.send().await?;
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.text().await?;
    Ok((status, headers, body))
}

/// Sleeps, then spends one retry. Returns `true` when the budget is exhausted.
async fn wait_and_spend(wait: Duration, budget: &mut RetryBudget) -> bool {
    tokio::time::sleep(wait).await;
    budget.spend()
}

fn fail(err: ApiError) -> Error {
    tracing::error!(
        tag = %err.tag,
        operation = %err.operation,
        status = err.status.as_u16(),
        "{err}"
    );
    Error::Api(err)
}

/// Returns the `…/api/vN` prefix of a redirect location on a known API host.
pub fn rewrite_base_url(location: &str) -> Option<String> {
    API_HOST_MARKERS.iter().find_map(|marker| {
        let index = location.find(marker)?;
        location.get(..index + marker.len() + 1).map(str::to_string)
    })
}

/// Builder for configuring and creating a [`Client`].
///
/// Every option has a default; only the API key is required, and it may come
/// from the `MERAKI_DASHBOARD_API_KEY` environment variable.
///
/// # Examples
///
/// ```no_run
/// use meraki::{ClientBuilder, LoggingConfig};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), meraki::Error> {
/// let client = ClientBuilder::new()
///     .api_key("my-api-key")
///     .base_url("https://api.meraki.cn/api/v1")?
///     .single_request_timeout(Duration::from_secs(30))
///     .wait_on_rate_limit(true)
///     .nginx_429_retry_wait_time(30)
///     .maximum_retries(5)
///     .caller("NetOps Acme")
///     .logging(LoggingConfig::default())
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ClientBuilder {
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
    certificate_path: Option<PathBuf>,
    proxy: Option<String>,
    retry_policy: RetryPolicy,
    rate_limit_config: RateLimitConfig,
    simulate: bool,
    be_geo_id: Option<String>,
    caller: Option<String>,
    pagination_mode: PaginationMode,
    logging: Option<LoggingConfig>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            certificate_path: None,
            proxy: None,
            retry_policy: RetryPolicy::default(),
            rate_limit_config: RateLimitConfig::default(),
            simulate: false,
            be_geo_id: None,
            caller: None,
            pagination_mode: PaginationMode::Eager,
            logging: None,
        }
    }

    /// Sets the API key. Falls back to `MERAKI_DASHBOARD_API_KEY` when unset.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the base URL for all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or points at the retired v0 API.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref().trim_end_matches('/');
        if Url::parse(url)?.path().contains("/v0") {
            return Err(Error::Configuration(
                "the v0 API is no longer supported; use a /api/v1 base URL".to_string(),
            ));
        }
        self.base_url = url.to_string();
        Ok(self)
    }

    /// Sets the per-request timeout.
    pub fn single_request_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Trusts an additional PEM root certificate.
    pub fn certificate_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.certificate_path = Some(path.into());
        self
    }

    /// Routes all requests through a proxy.
    pub fn requests_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Sets whether 429 responses are retried.
    pub fn wait_on_rate_limit(mut self, wait: bool) -> Self {
        self.rate_limit_config.wait_on_rate_limit = wait;
        self
    }

    /// Sets the ceiling, in seconds, of the random wait after a 429 without
    /// `Retry-After`.
    pub fn nginx_429_retry_wait_time(mut self, secs: u64) -> Self {
        self.rate_limit_config.retry_wait_ceiling_secs = secs;
        self
    }

    /// Sets the whole rate limit configuration.
    pub fn rate_limit_config(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit_config = config;
        self
    }

    /// Sets the fixed wait, in seconds, after an action-batch conflict.
    pub fn action_batch_retry_wait_time(mut self, secs: u64) -> Self {
        self.retry_policy.action_batch_retry_wait_time = secs;
        self
    }

    /// Sets the ceiling, in seconds, of the wait after a network-deletion
    /// conflict. Must be at least 30.
    pub fn network_delete_retry_wait_time(mut self, secs: u64) -> Self {
        self.retry_policy.network_delete_retry_wait_time = secs;
        self
    }

    /// Sets whether unrecognised 4xx errors are retried.
    pub fn retry_4xx_error(mut self, retry: bool) -> Self {
        self.retry_policy.retry_4xx_error = retry;
        self
    }

    /// Sets the ceiling, in seconds, of the wait before retrying a 4xx error.
    pub fn retry_4xx_error_wait_time(mut self, secs: u64) -> Self {
        self.retry_policy.retry_4xx_error_wait_time = secs;
        self
    }

    /// Sets the number of attempts per logical call. Must be at least 1.
    pub fn maximum_retries(mut self, retries: u32) -> Self {
        self.retry_policy.maximum_retries = retries;
        self
    }

    /// Sets the whole retry policy.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// When enabled, non-GET calls are logged and skipped.
    pub fn simulate(mut self, simulate: bool) -> Self {
        self.simulate = simulate;
        self
    }

    /// Sets the partner identifier. Falls back to `BE_GEO_ID` when unset.
    pub fn be_geo_id(mut self, be_geo_id: impl Into<String>) -> Self {
        self.be_geo_id = Some(be_geo_id.into());
        self
    }

    /// Sets the caller identification, formatted `"ApplicationName VendorName"`.
    /// Falls back to `MERAKI_SDK_CALLER` when unset.
    pub fn caller(mut self, caller: impl Into<String>) -> Self {
        self.caller = Some(caller.into());
        self
    }

    /// Selects lazy streaming (`true`) or eager collection (`false`) for
    /// [`Client::get_pages`].
    pub fn use_iterator_for_get_pages(mut self, lazy: bool) -> Self {
        self.pagination_mode = if lazy {
            PaginationMode::Lazy
        } else {
            PaginationMode::Eager
        };
        self
    }

    /// Installs a global `tracing` subscriber when the client is built.
    pub fn logging(mut self, config: LoggingConfig) -> Self {
        self.logging = Some(config);
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ApiKeyMissing`] without touching the network when no
    /// API key is available, and [`Error::Configuration`] for unusable
    /// settings.
    pub fn build(self) -> Result<Client> {
        let api_key = self
            .api_key
            .or_else(|| env_var(API_KEY_ENV))
            .filter(|key| !key.trim().is_empty())
            .ok_or(Error::ApiKeyMissing)?;

        if self.retry_policy.maximum_retries == 0 {
            return Err(Error::Configuration(
                "maximum_retries must be at least 1".to_string(),
            ));
        }
        if self.retry_policy.network_delete_retry_wait_time < NETWORK_DELETE_MIN_WAIT_SECS {
            return Err(Error::Configuration(format!(
                "network_delete_retry_wait_time must be at least {NETWORK_DELETE_MIN_WAIT_SECS} seconds"
            )));
        }

        if let Some(config) = &self.logging {
            logging::init(config)?;
        }

        let be_geo_id = self.be_geo_id.or_else(|| env_var(BE_GEO_ID_ENV));
        let caller = self.caller.or_else(|| env_var(CALLER_ENV));
        if let Some(caller) = &caller {
            if caller.split_whitespace().count() != 2 {
                tracing::warn!(
                    caller = %caller,
                    "Caller should be formatted as \"ApplicationName VendorName\""
                );
            }
        }

        let mut default_headers = HeaderMap::new();
        let mut authorization = header_value(&format!("Bearer {api_key}"))?;
        authorization.set_sensitive(true);
        default_headers.insert(AUTHORIZATION, authorization);
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(
            USER_AGENT,
            header_value(&user_agent(be_geo_id.as_deref(), caller.as_deref()))?,
        );

        let mut http_client = reqwest::Client::builder()
            .default_headers(default_headers)
            .redirect(reqwest::redirect::Policy::none());

        if let Some(proxy) = &self.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str())
                .map_err(|e| Error::Configuration(format!("Invalid proxy {proxy}: {e}")))?;
            http_client = http_client.proxy(proxy);
        }

        if let Some(path) = &self.certificate_path {
            let pem = std::fs::read(path).map_err(|e| {
                Error::Configuration(format!("Failed to read certificate {}: {e}", path.display()))
            })?;
            let certificate = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                Error::Configuration(format!("Invalid certificate {}: {e}", path.display()))
            })?;
            http_client = http_client.add_root_certificate(certificate);
        }

        let http_client = http_client.build()?;

        let base_url = self.base_url;

        tracing::debug!(
            base_url = %base_url,
            timeout_secs = self.timeout.as_secs(),
            maximum_retries = self.retry_policy.maximum_retries,
            wait_on_rate_limit = self.rate_limit_config.wait_on_rate_limit,
            retry_4xx_error = self.retry_policy.retry_4xx_error,
            simulate = self.simulate,
            pagination_mode = ?self.pagination_mode,
            "Dashboard API session initialized"
        );

        Ok(Client {
            inner: Arc::new(ClientInner {
                http_client,
                base_url: RwLock::new(base_url),
                timeout: self.timeout,
                retry_policy: self.retry_policy,
                rate_limit_config: self.rate_limit_config,
                simulate: self.simulate,
                pagination_mode: self.pagination_mode,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::try_from(value)
        .map_err(|e| Error::Configuration(format!("Invalid header value: {e}")))
}

fn user_agent(be_geo_id: Option<&str>, caller: Option<&str>) -> String {
    let mut agent = USER_AGENT_PREFIX.to_string();
    if let Some(be_geo_id) = be_geo_id {
        agent.push_str(&format!(" BeGeoId/({be_geo_id})"));
    }
    if let Some(caller) = caller {
        agent.push_str(&format!(" Caller/({caller})"));
    }
    agent
}
