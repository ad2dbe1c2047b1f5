//! Long-poll session state machine.
//!
//! This is the "just works" layer. Bind a [`Session`] to a base URL and a
//! channel, hand it a message handler, and call [`Session::connect`]. The
//! session keeps exactly one conditional `GET` in flight, re-issues it after
//! every completion, frames and de-duplicates response bodies, and stops only
//! on [`Session::disconnect`].

pub mod channel;
pub mod config;
pub mod error;
pub mod gate;
pub mod handler;
mod poll_loop;
pub mod session;
pub mod validators;

pub use channel::{channel, is_valid_channel, ChannelIdPart};
pub use config::{SessionConfig, DEFAULT_CLOCK_SKEW_GUARD, DEFAULT_POLL_TIMEOUT};
pub use error::{Result, SessionError};
pub use gate::{AlwaysReconnect, PauseSwitch, ReconnectGate};
pub use handler::{MessageHandler, PollFailure};
pub use longpoll_frame::MessageFrame;
pub use session::{Session, SessionBuilder};
pub use validators::{ConditionalCacheState, DEFAULT_ETAG};
