use std::time::Duration;

/// Errors that can occur while issuing a poll request.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be sent or the connection failed.
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// The server did not answer within the long-poll timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The response head arrived but reading the body failed.
    #[error("failed reading response body: {0}")]
    Body(String),

    /// Any other transport failure.
    #[error("transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Returns true if the failure was a timeout.
    ///
    /// Long-poll servers routinely let requests run into the timeout when
    /// nothing was published, so callers usually log these quietly.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
