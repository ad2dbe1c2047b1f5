use std::fmt;

use longpoll_session::{PollFailure, SessionError};
use longpoll_transport::TransportError;

// Exit code constants aligned with sysexits-style semantics.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn transport_error(context: &str, err: &TransportError) -> CliError {
    let code = match err {
        TransportError::Timeout(_) => TIMEOUT,
        TransportError::Request { .. } | TransportError::Body(_) => TRANSPORT_ERROR,
        TransportError::Other(_) => FAILURE,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn poll_error(context: &str, failure: &PollFailure) -> CliError {
    match failure {
        PollFailure::Transport(err) => transport_error(context, err),
        PollFailure::Status(_) => CliError::new(TRANSPORT_ERROR, format!("{context}: {failure}")),
    }
}

pub fn session_error(context: &str, err: SessionError) -> CliError {
    match err {
        SessionError::InvalidArgument(_) => CliError::new(USAGE, format!("{context}: {err}")),
        SessionError::NoRuntime => CliError::new(INTERNAL, format!("{context}: {err}")),
    }
}
