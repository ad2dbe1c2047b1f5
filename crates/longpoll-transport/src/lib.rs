//! HTTP transport abstraction for long-polling clients.
//!
//! The poll loop only needs one operation from the network: issue a
//! conditional `GET` and hand back status, headers and body. This crate
//! defines that seam:
//! - [`HttpTransport`], the trait the session drives
//! - [`PollRequest`] / [`HttpResponse`], the values crossing it
//! - [`ReqwestTransport`], the shipped implementation (feature `reqwest`)
//!
//! This is the lowest layer of longpoll. Connection pooling, TLS and timeout
//! enforcement all live behind the trait.

pub mod error;
pub mod traits;

#[cfg(feature = "reqwest")]
pub mod reqwest_client;

pub use error::{Result, TransportError};
pub use traits::{HttpResponse, HttpTransport, PollRequest};

#[cfg(feature = "reqwest")]
pub use reqwest_client::ReqwestTransport;
