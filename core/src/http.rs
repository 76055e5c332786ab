//! Request descriptor and response types.
//!
//! # Design
//! `HttpRequest` is the frozen result of a build call. It owns copies of the
//! URL, method, headers, and body, so later mutation of the sender never
//! reaches an already-built request. `HttpResponse` is generic over its body
//! so the same shape serves both text and byte decoding.

use std::fmt;

use serde::{Deserialize, Serialize};
use ureq::http::Uri;

use crate::types::Header;

/// HTTP method for a request. Only GET and POST are supported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// A fully specified request, ready to send.
///
/// `body` is only ever `Some` for `Method::Post`. `headers` keeps insertion
/// order and duplicates. On the wire, values sharing a name are grouped at
/// the position of that name's first occurrence: `A:1, B:2, A:3` is sent as
/// `a:1, a:3, b:2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: Vec<Header>,
    pub body: Option<String>,
}

/// A response with its body decoded as `T` (`String` or `Vec<u8>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse<T> {
    pub status: u16,
    pub headers: Vec<Header>,
    pub body: T,
}

impl<T> HttpResponse<T> {
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// First header value matching `name`, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    pub fn body(&self) -> &T {
        &self.body
    }

    pub fn into_body(self) -> T {
        self.body
    }

    pub(crate) fn map_body<U>(self, f: impl FnOnce(T) -> U) -> HttpResponse<U> {
        HttpResponse {
            status: self.status,
            headers: self.headers,
            body: f(self.body),
        }
    }
}
