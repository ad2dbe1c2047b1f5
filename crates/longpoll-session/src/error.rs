/// Errors that can occur in session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Bad input to a naming or construction helper.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `connect` was called outside a tokio runtime.
    #[error("no tokio runtime available to drive the poll loop")]
    NoRuntime,
}

pub type Result<T> = std::result::Result<T, SessionError>;
