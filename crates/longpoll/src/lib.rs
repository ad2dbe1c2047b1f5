//! HTTP long-polling client.
//!
//! longpoll keeps a persistent subscription to a server-side channel by
//! re-issuing conditional `GET` requests, splitting concatenated JSON
//! bodies into frames, and suppressing retransmitted frames.
//!
//! # Crate Structure
//!
//! - [`transport`]: HTTP transport seam and the `reqwest` implementation
//! - [`frame`]: Response framing, decoding and de-duplication
//! - [`session`]: The poll/reconnect state machine and channel naming
//!
//! ```no_run
//! use longpoll::session::{channel, MessageFrame, SessionBuilder};
//! use longpoll::transport::ReqwestTransport;
//!
//! # async fn run() -> longpoll::session::Result<()> {
//! let id = channel(42, "chat", 7)?;
//! let session = SessionBuilder::new("http://example.com/lp/", id).build(
//!     ReqwestTransport::new(),
//!     |message: MessageFrame| println!("{message:?}"),
//! );
//! session.connect()?;
//! # Ok(())
//! # }
//! ```

/// Re-export transport types.
pub mod transport {
    pub use longpoll_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use longpoll_frame::*;
}

/// Re-export session types.
pub mod session {
    pub use longpoll_session::*;
}
