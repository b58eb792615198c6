//! Error types
//!
//! Every failure the dispatcher can produce is one variant of [`DoError`].
//! Paginated calls wrap it in [`PagedError`] together with the pages that
//! were collected before the failure.

use serde::Deserialize;
use std::fmt;

/// Error payload returned by the API for 4xx/5xx responses
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteError {
    pub id: String,
    pub message: String,
    /// Observed HTTP status; not part of the wire payload
    #[serde(skip)]
    pub status: Option<u16>,
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "remote error: {}:", self.id)?;
        if let Some(status) = self.status {
            write!(f, " code: {}", status)?;
        }
        write!(f, " {}", self.message)
    }
}

impl std::error::Error for RemoteError {}

/// Errors produced by a single API call
#[derive(Debug, thiserror::Error)]
pub enum DoError {
    /// The server rejected the request
    #[error(transparent)]
    Remote(RemoteError),

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// 4xx/5xx response whose body was not a [`RemoteError`]
    #[error("error status code: {0}")]
    ErrorStatusCode(u16),

    /// Status outside both the success and the error ranges
    #[error("unacceptable status code: {0}")]
    UnacceptableStatusCode(u16),

    #[error("failed to encode body as {type_name}: {source}")]
    EncodeFailure {
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode body as {type_name}: {source}")]
    DecodeFailure {
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("response body is missing")]
    MissingBody,

    /// No HTTP response was obtained
    #[error("transport error: {0}")]
    Transport(String),

    /// The underlying HTTP client could not be built
    #[error("failed to create HTTP client: {0}")]
    HttpClient(String),
}

impl DoError {
    /// HTTP status observed for this error, if a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            DoError::Remote(remote) => remote.status,
            DoError::ErrorStatusCode(code) | DoError::UnacceptableStatusCode(code) => Some(*code),
            _ => None,
        }
    }
}

/// Failure of a paginated call
///
/// `pages` holds every page received before the failing one, in order. An
/// empty `pages` means the first request already failed.
#[derive(Debug, thiserror::Error)]
#[error("paginated request failed after {} page(s): {source}", .pages.len())]
pub struct PagedError<R> {
    pub pages: Vec<R>,
    #[source]
    pub source: DoError,
}

impl<R> PagedError<R> {
    /// Whether at least one page arrived before the failure
    pub fn is_partial(&self) -> bool {
        !self.pages.is_empty()
    }
}
