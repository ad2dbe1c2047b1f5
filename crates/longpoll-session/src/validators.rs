//! Conditional-request validators (`Last-Modified` / `ETag`).

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::DEFAULT_CLOCK_SKEW_GUARD;

/// Entity tag sent before the server has provided one.
pub const DEFAULT_ETAG: &str = "0";

/// IMF-fixdate (RFC 7231 §7.1.1.1). chrono renders `%a`/`%b` in English
/// independent of the host locale.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Tracks the validator pair that makes the next poll conditional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalCacheState {
    last_modified: Option<String>,
    etag: String,
    clock_skew_guard: Duration,
}

impl Default for ConditionalCacheState {
    fn default() -> Self {
        Self::new(DEFAULT_CLOCK_SKEW_GUARD)
    }
}

impl ConditionalCacheState {
    /// Create unseeded validators.
    pub fn new(clock_skew_guard: Duration) -> Self {
        Self {
            last_modified: None,
            etag: DEFAULT_ETAG.to_string(),
            clock_skew_guard,
        }
    }

    /// Whether `last_modified` has a value.
    pub fn is_seeded(&self) -> bool {
        self.last_modified.is_some()
    }

    /// Seed `last_modified` with `now` minus the clock-skew guard.
    ///
    /// Does nothing once a value is present.
    pub fn seed(&mut self, now: DateTime<Utc>) {
        if self.last_modified.is_some() {
            return;
        }
        let guard = chrono::Duration::from_std(self.clock_skew_guard)
            .unwrap_or_else(|_| chrono::Duration::seconds(5));
        self.last_modified = Some(format_http_date(now - guard));
    }

    /// Take `ETag` and `Last-Modified` from response headers.
    ///
    /// Header names match case-insensitively.
    pub fn update_from_headers<K, V>(&mut self, headers: &[(K, V)])
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in headers {
            let name = name.as_ref();
            if name.eq_ignore_ascii_case("etag") {
                self.etag = value.as_ref().to_string();
            } else if name.eq_ignore_ascii_case("last-modified") {
                self.last_modified = Some(value.as_ref().to_string());
            }
        }
    }

    /// Headers for the next request.
    ///
    /// `If-Modified-Since` is omitted until seeded.
    pub fn request_headers(&self) -> Vec<(String, String)> {
        let mut headers = Vec::with_capacity(2);
        if let Some(date) = &self.last_modified {
            headers.push(("If-Modified-Since".to_string(), date.clone()));
        }
        headers.push(("If-None-Match".to_string(), self.etag.clone()));
        headers
    }

    /// Current `Last-Modified` value.
    pub fn last_modified(&self) -> Option<&str> {
        self.last_modified.as_deref()
    }

    /// Current entity tag.
    pub fn etag(&self) -> &str {
        &self.etag
    }

    /// Configured clock-skew guard.
    pub fn clock_skew_guard(&self) -> Duration {
        self.clock_skew_guard
    }
}

/// Render `at` as an IMF-fixdate.
pub fn format_http_date(at: DateTime<Utc>) -> String {
    at.format(HTTP_DATE_FORMAT).to_string()
}
