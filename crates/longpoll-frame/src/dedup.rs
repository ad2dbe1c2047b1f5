//! Suppresses frames already delivered by a session.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use sha2::{Digest, Sha256};

/// SHA-256 of a frame's raw text.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Fingerprint the raw (pre-decode) text of a frame.
    pub fn of(raw: &str) -> Self {
        Self(Sha256::digest(raw.as_bytes()).into())
    }

    /// The digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Eight hex digits are plenty to tell fingerprints apart in logs.
        let short: String = self.to_string().chars().take(8).collect();
        f.debug_tuple("Fingerprint").field(&short).finish()
    }
}

/// Remembers the fingerprints of every frame a session has delivered.
///
/// Fingerprints are kept in insertion order. By default the set is
/// unbounded; with a capacity limit the oldest fingerprint is evicted once
/// the limit is exceeded, after which that frame would be delivered again.
#[derive(Debug, Clone, Default)]
pub struct Deduplicator {
    seen: HashSet<Fingerprint>,
    order: VecDeque<Fingerprint>,
    limit: Option<usize>,
}

impl Deduplicator {
    /// Create an unbounded deduplicator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a deduplicator that keeps at most `limit` fingerprints.
    ///
    /// A limit of zero is treated as one.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit.max(1)),
            ..Self::default()
        }
    }

    /// Returns true if `raw` has not been seen, recording it.
    pub fn should_deliver(&mut self, raw: &str) -> bool {
        let fingerprint = Fingerprint::of(raw);
        if !self.seen.insert(fingerprint) {
            tracing::trace!(?fingerprint, "duplicate frame suppressed");
            return false;
        }
        self.order.push_back(fingerprint);

        if let Some(limit) = self.limit {
            while self.order.len() > limit {
                if let Some(evicted) = self.order.pop_front() {
                    self.seen.remove(&evicted);
                }
            }
        }
        true
    }

    /// Whether `raw` would currently be suppressed.
    pub fn contains(&self, raw: &str) -> bool {
        self.seen.contains(&Fingerprint::of(raw))
    }

    /// Number of fingerprints held.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The configured capacity limit.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Forget every fingerprint.
    pub fn clear(&mut self) {
        self.seen.clear();
        self.order.clear();
    }
}
