//! Request descriptors
//!
//! A descriptor is a plain value describing one API call. Resource modules
//! implement [`Request`] (and [`PagedRequest`] for list endpoints); the
//! [`Client`](crate::client::Client) only ever sees these traits.

use serde::de::{Deserialize, Deserializer, IgnoredAny};
use serde::{Serialize, Serializer};
use std::any::TypeId;
use std::collections::BTreeMap;
use std::fmt;

/// Query parameters attached to a request URL
pub type Query = BTreeMap<String, String>;

/// HTTP methods used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Patch => reqwest::Method::PATCH,
        }
    }
}

/// "No meaningful body"
///
/// Body type of requests that send nothing, and response type of endpoints
/// that answer with no content. Deserializing `Null` accepts and discards
/// any input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Null;

impl Null {
    /// Whether `T` is the `Null` sentinel
    pub fn is<T: 'static>() -> bool {
        TypeId::of::<T>() == TypeId::of::<Null>()
    }
}

impl Serialize for Null {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_unit()
    }
}

impl<'de> Deserialize<'de> for Null {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IgnoredAny::deserialize(deserializer)?;
        Ok(Null)
    }
}

/// One API call
pub trait Request {
    /// Encodable payload; [`Null`] for body-less requests
    type Body: Serialize;
    /// Decoded response shape
    type Response: serde::de::DeserializeOwned + Send + 'static;

    fn method(&self) -> Method;

    /// Path relative to the API base URL, without a leading slash
    fn path(&self) -> String;

    fn query(&self) -> Option<Query> {
        None
    }

    fn body(&self) -> Option<&Self::Body> {
        None
    }
}

/// Response of a list endpoint
pub trait PagedResponse {
    fn meta(&self) -> &Meta;
    fn links(&self) -> &Links;

    /// URL of the following page, if any
    fn next_page(&self) -> Option<&str> {
        self.links().pages.as_ref()?.next.as_deref()
    }
}

/// List request that can be re-issued for another page
pub trait PagedRequest: Request + Clone
where
    Self::Response: PagedResponse,
{
    fn page(&self) -> Option<u32>;
    fn per_page(&self) -> Option<u32>;
    fn set_pages(&mut self, page: Option<u32>, per_page: Option<u32>);

    /// Copy of this request with only the page fields replaced
    fn with_pages(&self, page: Option<u32>, per_page: Option<u32>) -> Self {
        let mut next = self.clone();
        next.set_pages(page, per_page);
        next
    }
}

/// Pagination summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct Meta {
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct Links {
    #[serde(default)]
    pub pages: Option<Pages>,
}

/// Page URLs; any of them may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct Pages {
    #[serde(default)]
    pub first: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub last: Option<String>,
}
