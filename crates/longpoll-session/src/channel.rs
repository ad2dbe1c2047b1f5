//! Channel id naming convention.
//!
//! Channel ids are `"{user}_{service}_{instance}"`. The server may interpret
//! them however it likes; this only gives clients a stable scheme per
//! (user, service, instance).

use crate::error::{Result, SessionError};

/// One numeric component of a channel id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelIdPart {
    /// No id; rendered as `0`.
    Absent,
    /// An integer id.
    Number(i64),
    /// A string that must parse as an integer.
    Text(String),
}

impl ChannelIdPart {
    fn resolve(&self, what: &str) -> Result<i64> {
        match self {
            Self::Absent => Ok(0),
            Self::Number(n) => Ok(*n),
            Self::Text(text) => text.parse().map_err(|_| {
                SessionError::InvalidArgument(format!("{what} must be numeric, got {text:?}"))
            }),
        }
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(impl From<$ty> for ChannelIdPart {
            fn from(value: $ty) -> Self {
                Self::Number(i64::from(value))
            }
        })*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<&str> for ChannelIdPart {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ChannelIdPart {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<ChannelIdPart>> From<Option<T>> for ChannelIdPart {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

/// Build a channel id from a user id, a service name and a service id.
///
/// Absent ids default to `0`. Numeric strings are normalized (`"+7"` becomes
/// `7`); non-numeric strings fail with [`SessionError::InvalidArgument`].
pub fn channel(
    user_id: impl Into<ChannelIdPart>,
    service_name: &str,
    service_id: impl Into<ChannelIdPart>,
) -> Result<String> {
    let user = user_id.into().resolve("user id")?;
    let service = service_id.into().resolve("service id")?;
    Ok(format!("{user}_{service_name}_{service}"))
}

/// Returns true if `channel` can be appended to a base URL as a path segment.
pub fn is_valid_channel(channel: &str) -> bool {
    !channel.is_empty()
        && !channel
            .chars()
            .any(|c| matches!(c, '/' | '?' | '#') || c.is_whitespace() || c.is_control())
}
