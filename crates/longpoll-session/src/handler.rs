use longpoll_frame::MessageFrame;
use longpoll_transport::TransportError;

/// Why a poll completed without delivering messages.
#[derive(Debug)]
pub enum PollFailure {
    /// The server answered with a non-2xx status (including 304).
    Status(u16),
    /// The request failed below HTTP.
    Transport(TransportError),
}

impl PollFailure {
    /// True for `304 Not Modified`, the normal "nothing new" answer.
    pub fn is_not_modified(&self) -> bool {
        matches!(self, Self::Status(304))
    }

    /// True when the transport gave up waiting.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(err) if err.is_timeout())
    }
}

impl std::fmt::Display for PollFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status(status) => write!(f, "server answered with status {status}"),
            Self::Transport(err) => write!(f, "{err}"),
        }
    }
}

/// Receives what a session delivers.
///
/// Called from the polling task, outside the session lock, so handlers may
/// call back into the session (for example to disconnect).
pub trait MessageHandler: Send + Sync + 'static {
    /// One delivered message.
    fn on_message(&self, message: MessageFrame);

    /// A poll failed; the session re-issues regardless.
    fn on_failure(&self, failure: &PollFailure) {
        let _ = failure;
    }
}

impl<F> MessageHandler for F
where
    F: Fn(MessageFrame) + Send + Sync + 'static,
{
    fn on_message(&self, message: MessageFrame) {
        self(message)
    }
}
