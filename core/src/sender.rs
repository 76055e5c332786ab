//! Fluent request builder and blocking sender.
//!
//! # Design
//! `HttpSender` accumulates a URL and an ordered header list, freezes them
//! into an `HttpRequest` on each build call, and sends the last built request
//! through a `ureq::Agent` it owns for its whole lifetime.
//!
//! The public `build_*` and `send_and_receive_*` methods report every failure
//! as `None`. Each is a thin wrapper over a `try_*` method that returns the
//! typed `SenderError`; the wrappers log the reason before dropping it.

use std::fmt;

use tracing::{debug, warn};
use ureq::http::header::{HeaderName, HeaderValue};
use ureq::http::Uri;
use ureq::Agent;

use crate::error::SenderError;
use crate::http::{HttpRequest, HttpResponse, Method};
use crate::types::Header;

/// Builder and sender for single GET/POST requests.
///
/// Mutating methods return `&mut Self` so calls can be chained:
///
/// ```no_run
/// use http_sender::HttpSender;
///
/// let mut sender = HttpSender::new();
/// let body = sender
///     .add_header("Accept", "text/plain")
///     .set_url("http://localhost:3000/text")
///     .build_request()
///     .and_then(|s| s.send_and_receive_string())
///     .map(|r| r.into_body());
/// ```
///
/// Not meant to be shared between threads; use one sender per thread.
pub struct HttpSender {
    url: Option<String>,
    headers: Vec<Header>,
    request: Option<HttpRequest>,
    agent: Agent,
}

impl fmt::Debug for HttpSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSender")
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

impl Default for HttpSender {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpSender {
    pub fn new() -> Self {
        Self::with_agent(default_agent())
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        let mut sender = Self::new();
        sender.url = Some(url.into());
        sender
    }

    /// Use a caller-configured agent. Unless the agent was built with
    /// `http_status_as_error(false)` and `max_redirects(0)`, non-2xx statuses
    /// surface as transport failures and redirects are followed.
    pub fn with_agent(agent: Agent) -> Self {
        Self {
            url: None,
            headers: Vec::new(),
            request: None,
            agent,
        }
    }

    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.add_header_pair(Header::new(name, value))
    }

    pub fn add_header_pair(&mut self, header: Header) -> &mut Self {
        self.headers.push(header);
        self
    }

    /// Replace the stored URL. Validation is deferred to the next build.
    pub fn set_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.url = Some(url.into());
        self
    }

    pub fn reset_headers(&mut self) -> &mut Self {
        self.headers.clear();
        self
    }

    /// Remove the first header named exactly `name`. Later headers with the
    /// same name are kept.
    pub fn remove_header(&mut self, name: &str) -> &mut Self {
        if let Some(pos) = self.headers.iter().position(|h| h.name == name) {
            self.headers.remove(pos);
        }
        self
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// The last successfully built request.
    pub fn request(&self) -> Option<&HttpRequest> {
        self.request.as_ref()
    }

    /// Build a GET with the stored URL and headers.
    pub fn build_request(&mut self) -> Option<&mut Self> {
        self.build_request_full(None, Method::Get, None)
    }

    /// Build a GET, first replacing the stored URL when `new_url` is given.
    pub fn build_request_url(&mut self, new_url: Option<&str>) -> Option<&mut Self> {
        self.build_request_full(new_url, Method::Get, None)
    }

    /// Build with the stored URL. `body` is only used for POST.
    pub fn build_request_method(&mut self, method: Method, body: Option<&str>) -> Option<&mut Self> {
        self.build_request_full(None, method, body)
    }

    pub fn build_request_full(
        &mut self,
        new_url: Option<&str>,
        method: Method,
        body: Option<&str>,
    ) -> Option<&mut Self> {
        match self.try_build_request(new_url, method, body) {
            Ok(sender) => Some(sender),
            Err(err) => {
                warn!(error = %err, "failed to build request");
                None
            }
        }
    }

    /// Freeze the current state into an `HttpRequest`.
    ///
    /// `new_url` overwrites the stored URL before validation, so a rejected
    /// URL stays stored. On failure the previously built request is kept.
    pub fn try_build_request(
        &mut self,
        new_url: Option<&str>,
        method: Method,
        body: Option<&str>,
    ) -> Result<&mut Self, SenderError> {
        if let Some(url) = new_url {
            self.url = Some(url.to_string());
        }
        let url = self.url.as_deref().ok_or(SenderError::MissingUrl)?;
        let uri = parse_url(url)?;
        for header in &self.headers {
            check_header(header)?;
        }

        let body = match method {
            Method::Post => body.map(str::to_string),
            Method::Get => None,
        };
        let request = HttpRequest {
            method,
            uri,
            headers: self.headers.clone(),
            body,
        };
        debug!(
            method = %request.method,
            uri = %request.uri,
            headers = request.headers.len(),
            "built request"
        );
        self.request = Some(request);
        Ok(self)
    }

    /// Send the last built request and decode the body as text.
    pub fn send_and_receive_string(&self) -> Option<HttpResponse<String>> {
        absent_on_error(self.try_send_string())
    }

    /// Send the last built request and return the raw body bytes.
    pub fn send_and_receive_bytes(&self) -> Option<HttpResponse<Vec<u8>>> {
        absent_on_error(self.try_send_bytes())
    }

    /// Text decoding is lossy: invalid UTF-8 becomes U+FFFD rather than an error.
    pub fn try_send_string(&self) -> Result<HttpResponse<String>, SenderError> {
        let response = self.dispatch()?;
        Ok(response.map_body(|bytes| match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        }))
    }

    pub fn try_send_bytes(&self) -> Result<HttpResponse<Vec<u8>>, SenderError> {
        self.dispatch()
    }

    fn dispatch(&self) -> Result<HttpResponse<Vec<u8>>, SenderError> {
        let request = self.request.as_ref().ok_or(SenderError::NotBuilt)?;
        debug!(method = %request.method, uri = %request.uri, "sending request");

        let mut response = match request.method {
            Method::Get => with_headers(self.agent.get(request.uri.clone()), &request.headers).call()?,
            Method::Post => {
                let builder = with_headers(self.agent.post(request.uri.clone()), &request.headers);
                match &request.body {
                    Some(body) => builder.send(body.as_bytes())?,
                    None => builder.send_empty()?,
                }
            }
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| Header::new(name.as_str(), String::from_utf8_lossy(value.as_bytes())))
            .collect();
        let body = response.body_mut().with_config().limit(u64::MAX).read_to_vec()?;
        debug!(status, bytes = body.len(), "received response");

        Ok(HttpResponse { status, headers, body })
    }
}

/// One request per send: error statuses and redirects come back as responses.
fn default_agent() -> Agent {
    Agent::config_builder()
        .http_status_as_error(false)
        .max_redirects(0)
        .build()
        .new_agent()
}

fn absent_on_error<T>(result: Result<T, SenderError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(error = %err, "failed to send request");
            None
        }
    }
}

/// Accept only absolute `http`/`https` URLs.
fn parse_url(url: &str) -> Result<Uri, SenderError> {
    let uri: Uri = url.parse().map_err(|source| SenderError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    match (uri.scheme_str(), uri.authority()) {
        (Some("http" | "https"), Some(_)) => Ok(uri),
        _ => Err(SenderError::UnsupportedScheme { url: url.to_string() }),
    }
}

fn check_header(header: &Header) -> Result<(), SenderError> {
    let valid = HeaderName::from_bytes(header.name.as_bytes()).is_ok()
        && HeaderValue::from_str(&header.value).is_ok();
    if valid {
        Ok(())
    } else {
        Err(SenderError::InvalidHeader {
            name: header.name.clone(),
        })
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[Header]) -> ureq::RequestBuilder<B> {
    for header in headers {
        builder = builder.header(header.name.as_str(), header.value.as_str());
    }
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://localhost:3000/text";

    fn sender() -> HttpSender {
        HttpSender::with_url(URL)
    }

    fn names(headers: &[Header]) -> Vec<&str> {
        headers.iter().map(|h| h.name.as_str()).collect()
    }

    #[test]
    fn build_attaches_headers_in_insertion_order() {
        let mut s = sender();
        s.add_header("X-First", "1")
            .add_header_pair(Header::new("X-Second", "2"))
            .add_header("X-First", "3");
        s.build_request().unwrap();

        let req = s.request().unwrap();
        assert_eq!(
            req.headers,
            vec![
                Header::new("X-First", "1"),
                Header::new("X-Second", "2"),
                Header::new("X-First", "3"),
            ]
        );
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.uri.to_string(), URL);
        assert!(req.body.is_none());
    }

    #[test]
    fn remove_header_removes_first_match_only() {
        let mut s = sender();
        s.add_header("A", "1").add_header("B", "2").add_header("A", "3");
        s.remove_header("A");

        assert_eq!(s.headers(), &[Header::new("B", "2"), Header::new("A", "3")]);
    }

    #[test]
    fn remove_header_is_case_sensitive() {
        let mut s = sender();
        s.add_header("Accept", "text/plain");
        s.remove_header("accept");
        assert_eq!(names(s.headers()), vec!["Accept"]);
    }

    #[test]
    fn remove_header_missing_name_is_noop() {
        let mut s = sender();
        s.add_header("A", "1");
        s.remove_header("Z");
        assert_eq!(s.headers().len(), 1);
    }

    #[test]
    fn reset_headers_yields_headerless_request() {
        let mut s = sender();
        s.add_header("A", "1").add_header("B", "2").reset_headers();
        s.build_request().unwrap();
        assert!(s.request().unwrap().headers.is_empty());
    }

    #[test]
    fn build_without_new_url_keeps_stored_url() {
        let mut s = sender();
        s.build_request_url(None).unwrap();
        assert_eq!(s.url(), Some(URL));
        assert_eq!(s.request().unwrap().uri.to_string(), URL);
    }

    #[test]
    fn build_with_new_url_overwrites_before_building() {
        let mut s = sender();
        s.build_request_url(Some("https://example.com/other")).unwrap();
        assert_eq!(s.url(), Some("https://example.com/other"));
        assert_eq!(s.request().unwrap().uri.to_string(), "https://example.com/other");
    }

    #[test]
    fn post_carries_exact_body() {
        let mut s = sender();
        s.build_request_method(Method::Post, Some("{\"x\":1}")).unwrap();
        let req = s.request().unwrap();
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.body.as_deref(), Some("{\"x\":1}"));
    }

    #[test]
    fn get_ignores_body_argument() {
        let mut s = sender();
        s.build_request_method(Method::Get, Some("ignored")).unwrap();
        assert!(s.request().unwrap().body.is_none());
    }

    #[test]
    fn post_without_body_has_no_payload() {
        let mut s = sender();
        s.build_request_full(None, Method::Post, None).unwrap();
        let req = s.request().unwrap();
        assert_eq!(req.method, Method::Post);
        assert!(req.body.is_none());
    }

    #[test]
    fn built_request_is_not_affected_by_later_mutation() {
        let mut s = sender();
        s.add_header("A", "1");
        s.build_request().unwrap();
        s.add_header("B", "2").set_url("http://localhost:3000/bytes");

        let req = s.request().unwrap();
        assert_eq!(names(&req.headers), vec!["A"]);
        assert_eq!(req.uri.to_string(), URL);
    }

    #[test]
    fn rebuild_picks_up_current_state() {
        let mut s = sender();
        s.build_request().unwrap();
        s.add_header("B", "2").set_url("http://localhost:3000/bytes");
        s.build_request().unwrap();

        let req = s.request().unwrap();
        assert_eq!(names(&req.headers), vec!["B"]);
        assert_eq!(req.uri.to_string(), "http://localhost:3000/bytes");
    }

    #[test]
    fn empty_url_is_absent() {
        let mut s = sender();
        s.set_url("");
        assert!(s.build_request().is_none());
        assert!(matches!(
            s.try_build_request(None, Method::Get, None),
            Err(SenderError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn illegal_characters_are_absent() {
        let mut s = sender();
        assert!(s.build_request_url(Some("http://local host/a b")).is_none());
    }

    #[test]
    fn missing_url_is_absent() {
        let mut s = HttpSender::new();
        assert!(s.build_request().is_none());
        assert!(matches!(
            s.try_build_request(None, Method::Get, None),
            Err(SenderError::MissingUrl)
        ));
    }

    #[test]
    fn relative_or_foreign_scheme_is_rejected() {
        let mut s = HttpSender::new();
        for url in ["/text", "ftp://localhost/file"] {
            assert!(matches!(
                s.try_build_request(Some(url), Method::Get, None),
                Err(SenderError::UnsupportedScheme { .. })
            ));
        }
    }

    #[test]
    fn invalid_header_is_absent() {
        let mut s = sender();
        s.add_header("Bad Name", "v");
        assert!(matches!(
            s.try_build_request(None, Method::Get, None),
            Err(SenderError::InvalidHeader { name }) if name == "Bad Name"
        ));
    }

    #[test]
    fn failed_build_keeps_previous_request() {
        let mut s = sender();
        s.build_request().unwrap();
        assert!(s.build_request_url(Some("")).is_none());
        assert_eq!(s.url(), Some(""));
        assert_eq!(s.request().unwrap().uri.to_string(), URL);
    }

    #[test]
    fn send_before_build_is_absent() {
        let s = sender();
        assert!(s.send_and_receive_string().is_none());
        assert!(s.send_and_receive_bytes().is_none());
        assert!(matches!(s.try_send_bytes(), Err(SenderError::NotBuilt)));
    }
}
