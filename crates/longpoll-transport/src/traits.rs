use std::borrow::Cow;
use std::future::Future;
use std::time::Duration;

use bytes::Bytes;

use crate::error::Result;

/// Issues long-poll `GET` requests.
///
/// Implementations complete each request exactly once: with a response of
/// any status, or with a [`TransportError`](crate::TransportError). Dropping
/// the returned future must abandon the request; the session relies on this
/// to cancel an in-flight poll.
pub trait HttpTransport: Send + Sync + 'static {
    /// Send `request` and wait for the server to answer.
    fn get(&self, request: PollRequest) -> impl Future<Output = Result<HttpResponse>> + Send;
}

/// A single conditional long-poll request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollRequest {
    /// Absolute URL (`<base url><channel id>`).
    pub url: String,
    /// Request headers in send order.
    pub headers: Vec<(String, String)>,
    /// How long the server may hold the request open.
    pub timeout: Duration,
}

impl PollRequest {
    /// Create a request without headers.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            timeout,
        }
    }

    /// Append a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Look up a request header by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A minimal HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub status: u16,
    /// Response headers (lowercase names).
    pub headers: Vec<(String, String)>,
    /// The response body bytes.
    pub body: Bytes,
}

impl HttpResponse {
    /// Create a response, lowercasing header names.
    pub fn new<I, K, V>(status: u16, headers: I, body: impl Into<Bytes>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            status,
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.into()))
                .collect(),
            body: body.into(),
        }
    }

    /// Look up a response header by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True for `304 Not Modified`.
    pub fn is_not_modified(&self) -> bool {
        self.status == 304
    }

    /// The body as text, replacing invalid UTF-8.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_headers_are_case_insensitive() {
        let response = HttpResponse::new(200, [("ETag", "abc"), ("Last-Modified", "x")], "");
        assert_eq!(response.header("etag"), Some("abc"));
        assert_eq!(response.header("Etag"), Some("abc"));
        assert_eq!(response.header("LAST-MODIFIED"), Some("x"));
        assert_eq!(response.header("content-length"), None);
        assert_eq!(response.headers[0].0, "etag");
    }

    #[test]
    fn status_classification() {
        let ok = HttpResponse::new(200, Vec::<(&str, &str)>::new(), "");
        let not_modified = HttpResponse::new(304, Vec::<(&str, &str)>::new(), "");
        let gateway = HttpResponse::new(502, Vec::<(&str, &str)>::new(), "");

        assert!(ok.is_success());
        assert!(!not_modified.is_success());
        assert!(not_modified.is_not_modified());
        assert!(!gateway.is_success());
    }

    #[test]
    fn text_replaces_invalid_utf8() {
        let response = HttpResponse::new(
            200,
            Vec::<(&str, &str)>::new(),
            Bytes::from_static(b"ok\xff"),
        );
        assert_eq!(response.text(), "ok\u{fffd}");
    }

    #[test]
    fn request_builder_keeps_header_order() {
        let request = PollRequest::new("http://example.com/lp/1_chat_1", Duration::from_secs(31))
            .with_header("If-Modified-Since", "Tue, 01 Jan 2024 00:00:00 GMT")
            .with_header("If-None-Match", "0");

        assert_eq!(request.headers[0].0, "If-Modified-Since");
        assert_eq!(request.header("if-none-match"), Some("0"));
    }
}
