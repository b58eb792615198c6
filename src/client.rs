//! DigitalOcean client
//!
//! Turns request descriptors into HTTP calls, classifies the outcome and
//! decodes the typed result. List endpoints are walked page by page through
//! their `links.pages.next` URL.
//!
//! Each call snapshots the current [`Session`] (token + HTTP client) when it
//! is issued. [`Client::update_api_token`] swaps in a new session for later
//! calls; calls already in flight keep the one they captured.

use crate::config::Config;
use crate::error::{DoError, PagedError, RemoteError};
use crate::request::{Method, Null, PagedRequest, PagedResponse, Query, Request};
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE, PRAGMA};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::type_name;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use url::Url;

/// Base URL of the v2 API
pub const DEFAULT_API_URL: &str = "https://api.digitalocean.com/v2/";

/// Per-call timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.chars().count() > MAX_LOG_BODY_LENGTH {
        let head: String = body.chars().take(MAX_LOG_BODY_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", head, body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Token and HTTP client used by a call from start to finish
struct Session {
    token: String,
    base_url: String,
    timeout: Duration,
    http: reqwest::Client,
}

impl Session {
    fn new(token: String, base_url: String, timeout: Duration) -> Result<Self, DoError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("doapi/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| DoError::HttpClient(e.to_string()))?;

        Ok(Self {
            token,
            base_url,
            timeout,
            http,
        })
    }

    /// Build the absolute URL for `path`
    fn endpoint(&self, path: &str, query: Option<&Query>) -> Result<Url, DoError> {
        let endpoint = format!("{}{}", self.base_url, path);
        let mut url = Url::parse(&endpoint).map_err(|_| DoError::InvalidEndpoint(endpoint))?;

        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.query_pairs_mut().extend_pairs(query.iter());
        }

        Ok(url)
    }

    async fn execute<R>(
        &self,
        method: Method,
        path: &str,
        query: Option<&Query>,
        body: Option<Vec<u8>>,
    ) -> Result<R, DoError>
    where
        R: DeserializeOwned + 'static,
    {
        let url = self.endpoint(path, query)?;
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method.into(), url)
            .bearer_auth(&self.token)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache");

        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DoError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| DoError::Transport(e.to_string()))?;

        decode_response(status, &body)
    }

    async fn dispatch<Q: Request>(&self, request: &Q) -> Result<Q::Response, DoError> {
        let body = request.body().map(encode_body).transpose()?;
        let query = request.query();

        self.execute(request.method(), &request.path(), query.as_ref(), body)
            .await
    }

    async fn dispatch_all<Q>(&self, request: Q) -> Result<Vec<Q::Response>, PagedError<Q::Response>>
    where
        Q: PagedRequest,
        Q::Response: PagedResponse,
    {
        let mut pages = Vec::new();
        let mut current = request;

        loop {
            let response = match self.dispatch(&current).await {
                Ok(response) => response,
                Err(source) => {
                    tracing::debug!(
                        "Pagination stopped after {} page(s): {}",
                        pages.len(),
                        source
                    );
                    return Err(PagedError { pages, source });
                }
            };

            let next = response.next_page().map(next_page_params);
            pages.push(response);

            match next {
                Some((page, per_page)) => {
                    tracing::debug!("Next page: page={} per_page={}", page, per_page);
                    current = current.with_pages(Some(page), Some(per_page));
                }
                None => return Ok(pages),
            }
        }
    }
}

/// Encode a request body as JSON
fn encode_body<B: Serialize>(body: &B) -> Result<Vec<u8>, DoError> {
    serde_json::to_vec(body).map_err(|source| DoError::EncodeFailure {
        type_name: type_name::<B>(),
        source,
    })
}

/// Classify a response by status and decode its body
///
/// 4xx and 5xx become [`DoError::Remote`] when the body is a
/// [`RemoteError`], otherwise [`DoError::ErrorStatusCode`]. 204 and [`Null`]
/// targets never look at the body. A 204 for a target with no empty form
/// (a record rather than `Null` or `Option<T>`) fails with
/// [`DoError::DecodeFailure`].
pub(crate) fn decode_response<R>(status: u16, body: &[u8]) -> Result<R, DoError>
where
    R: DeserializeOwned + 'static,
{
    match status {
        200..=299 => {}
        400..=u16::MAX => {
            tracing::error!(
                "API error: {} - {}",
                status,
                sanitize_for_log(&String::from_utf8_lossy(body))
            );
            return Err(match serde_json::from_slice::<RemoteError>(body) {
                Ok(mut remote) => {
                    remote.status = Some(status);
                    DoError::Remote(remote)
                }
                Err(_) => DoError::ErrorStatusCode(status),
            });
        }
        _ => return Err(DoError::UnacceptableStatusCode(status)),
    }

    if status == 204 || Null::is::<R>() {
        return serde_json::from_value(serde_json::Value::Null).map_err(|source| {
            DoError::DecodeFailure {
                type_name: type_name::<R>(),
                source,
            }
        });
    }

    if body.is_empty() {
        return Err(DoError::MissingBody);
    }

    serde_json::from_slice(body).map_err(|source| DoError::DecodeFailure {
        type_name: type_name::<R>(),
        source,
    })
}

/// Read `page` and `per_page` from a next-page link
///
/// # Panics
///
/// The API always includes both parameters in a next link; a link without
/// them is a contract violation and panics.
fn next_page_params(link: &str) -> (u32, u32) {
    let url = match Url::parse(link) {
        Ok(url) => url,
        Err(e) => panic!("cannot parse next page link {:?}: {}", link, e),
    };

    let param = |names: &[&str]| {
        url.query_pairs()
            .find(|(key, _)| names.contains(&key.as_ref()))
            .and_then(|(_, value)| value.parse::<u32>().ok())
    };

    let Some(page) = param(&["page"]) else {
        panic!("next page link without a page parameter: {}", link);
    };
    let Some(per_page) = param(&["per_page", "perPage"]) else {
        panic!("next page link without a per_page parameter: {}", link);
    };

    (page, per_page)
}

/// DigitalOcean API client
#[derive(Clone)]
pub struct Client {
    session: Arc<RwLock<Arc<Session>>>,
}

impl Client {
    /// Create a client for the public API
    pub fn new(api_token: impl Into<String>) -> Result<Self, DoError> {
        Self::with_base_url(api_token, DEFAULT_API_URL)
    }

    /// Create a client against another base URL (must end with `/`)
    pub fn with_base_url(
        api_token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, DoError> {
        Self::build(api_token.into(), base_url.into(), DEFAULT_TIMEOUT)
    }

    /// Create a client from persisted configuration
    pub fn from_config(config: &Config) -> Result<Self, DoError> {
        Self::build(
            config.effective_token(),
            config.effective_base_url(),
            config.effective_timeout(),
        )
    }

    fn build(token: String, base_url: String, timeout: Duration) -> Result<Self, DoError> {
        let session = Session::new(token, base_url, timeout)?;
        Ok(Self {
            session: Arc::new(RwLock::new(Arc::new(session))),
        })
    }

    async fn session(&self) -> Arc<Session> {
        self.session.read().await.clone()
    }

    /// Replace the API token and reset the HTTP client
    ///
    /// Only calls issued after this returns use the new token.
    pub async fn update_api_token(&self, token: impl Into<String>) -> Result<(), DoError> {
        let mut current = self.session.write().await;
        let fresh = Session::new(token.into(), current.base_url.clone(), current.timeout)?;
        *current = Arc::new(fresh);

        tracing::debug!("API token updated, HTTP session reset");
        Ok(())
    }

    /// Whether a non-empty token is configured
    pub async fn has_token(&self) -> bool {
        !self.session().await.token.is_empty()
    }

    /// Execute one request descriptor
    pub async fn request<Q: Request>(&self, request: &Q) -> Result<Q::Response, DoError> {
        let session = self.session().await;
        session.dispatch(request).await
    }

    /// Execute a call from its parts; `body` must already be JSON
    pub async fn request_raw<R>(
        &self,
        method: Method,
        path: &str,
        query: Option<&Query>,
        body: Option<Vec<u8>>,
    ) -> Result<R, DoError>
    where
        R: DeserializeOwned + 'static,
    {
        let session = self.session().await;
        session.execute(method, path, query, body).await
    }

    /// Fetch every page of a list request, in page order
    ///
    /// On failure the returned [`PagedError`] carries the pages fetched
    /// before the failing one.
    pub async fn request_all<Q>(
        &self,
        request: &Q,
    ) -> Result<Vec<Q::Response>, PagedError<Q::Response>>
    where
        Q: PagedRequest,
        Q::Response: PagedResponse,
    {
        let session = self.session().await;
        session.dispatch_all(request.clone()).await
    }

    /// Run [`Client::request`] on the tokio runtime
    ///
    /// The session is captured before this returns.
    pub async fn spawn_request<Q>(&self, request: Q) -> JoinHandle<Result<Q::Response, DoError>>
    where
        Q: Request + Send + Sync + 'static,
    {
        let session = self.session().await;
        tokio::spawn(async move { session.dispatch(&request).await })
    }

    /// Run [`Client::request_all`] on the tokio runtime
    pub async fn spawn_request_all<Q>(
        &self,
        request: Q,
    ) -> JoinHandle<Result<Vec<Q::Response>, PagedError<Q::Response>>>
    where
        Q: PagedRequest + Send + Sync + 'static,
        Q::Response: PagedResponse,
    {
        let session = self.session().await;
        tokio::spawn(async move { session.dispatch_all(request).await })
    }
}
