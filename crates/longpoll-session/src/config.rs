use std::time::Duration;

/// Default long-poll window the transport is asked to honor.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(31);

/// Default amount subtracted from "now" when seeding `If-Modified-Since`.
pub const DEFAULT_CLOCK_SKEW_GUARD: Duration = Duration::from_secs(5);

/// Controls session polling behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long each request may be held open. Default: 31 s.
    pub poll_timeout: Duration,
    /// How far before "now" the first `If-Modified-Since` points. Default: 5 s.
    pub clock_skew_guard: Duration,
    /// Maximum remembered frame fingerprints. Default: unbounded.
    pub max_fingerprints: Option<usize>,
    /// Also deliver individual frames that are not JSON documents.
    ///
    /// The whole response body is always delivered as one raw message; this
    /// additionally delivers each raw frame. Default: false.
    pub deliver_raw_frames: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            clock_skew_guard: DEFAULT_CLOCK_SKEW_GUARD,
            max_fingerprints: None,
            deliver_raw_frames: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.poll_timeout, Duration::from_millis(31_000));
        assert_eq!(config.clock_skew_guard, Duration::from_secs(5));
        assert_eq!(config.max_fingerprints, None);
        assert!(!config.deliver_raw_frames);
    }
}
