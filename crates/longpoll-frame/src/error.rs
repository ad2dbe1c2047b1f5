/// Errors that can occur while decoding a frame.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The frame looked like JSON but did not parse.
    #[error("malformed json frame: {0}")]
    Json(#[from] serde_json::Error),

    /// The frame ended before a JSON value was complete.
    #[error("frame ended before a complete json value")]
    Truncated,
}

pub type Result<T> = std::result::Result<T, DecodeError>;
