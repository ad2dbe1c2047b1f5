//! Response framing, decoding and de-duplication for long-poll bodies.
//!
//! Long-poll servers flush whatever was published since the last request,
//! often as JSON documents written back to back with no separator:
//!
//! ```text
//! {"seq":1}{"seq":2}[3,4]
//! ```
//!
//! This crate turns such a body into individual frames, decodes each frame
//! into a [`MessageFrame`], and suppresses retransmitted frames through a
//! [`Deduplicator`]. Framing never assumes the body is valid JSON.

pub mod decode;
pub mod dedup;
pub mod error;
pub mod framer;

pub use decode::{decode_frame, MessageFrame};
pub use dedup::{Deduplicator, Fingerprint};
pub use error::{DecodeError, Result};
pub use framer::{frames, Frames};
