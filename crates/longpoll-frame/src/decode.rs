use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{DecodeError, Result};

/// One message delivered to a session handler.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MessageFrame {
    /// A JSON object.
    Object(Map<String, Value>),
    /// A JSON array.
    Array(Vec<Value>),
    /// Text that is not a JSON document (or an entire response body).
    Raw(String),
}

impl MessageFrame {
    /// True for object and array frames.
    pub fn is_structured(&self) -> bool {
        !matches!(self, Self::Raw(_))
    }

    /// Short label for logs and output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Object(_) => "object",
            Self::Array(_) => "array",
            Self::Raw(_) => "raw",
        }
    }

    /// Borrow the object map, if this is an object frame.
    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow the raw text, if this is a raw frame.
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Self::Raw(text) => Some(text),
            _ => None,
        }
    }
}

/// Decode one frame.
///
/// Trimmed text starting with `{` or `[` is parsed as JSON; only the first
/// value is read, anything after it is ignored. Any other text becomes
/// [`MessageFrame::Raw`].
pub fn decode_frame(raw: &str) -> Result<MessageFrame> {
    let text = raw.trim();
    if !(text.starts_with('{') || text.starts_with('[')) {
        return Ok(MessageFrame::Raw(text.to_string()));
    }

    let value = serde_json::Deserializer::from_str(text)
        .into_iter::<Value>()
        .next()
        .ok_or(DecodeError::Truncated)??;

    Ok(match value {
        Value::Object(map) => MessageFrame::Object(map),
        Value::Array(items) => MessageFrame::Array(items),
        other => MessageFrame::Raw(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_object() {
        let frame = decode_frame(r#"{"a":1}"#).unwrap();
        assert_eq!(frame.as_object().unwrap()["a"], json!(1));
        assert_eq!(frame.kind(), "object");
    }

    #[test]
    fn decodes_array_with_surrounding_whitespace() {
        let frame = decode_frame("  [1, 2, 3]\n").unwrap();
        assert_eq!(frame, MessageFrame::Array(vec![json!(1), json!(2), json!(3)]));
    }

    #[test]
    fn non_json_text_is_raw() {
        let frame = decode_frame("  hello ").unwrap();
        assert_eq!(frame, MessageFrame::Raw("hello".to_string()));
        assert!(!frame.is_structured());
        // Scalars are not documents here.
        assert_eq!(decode_frame("42").unwrap(), MessageFrame::Raw("42".into()));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            decode_frame(r#"{"a":"#),
            Err(DecodeError::Json(_))
        ));
        assert!(matches!(decode_frame("[1,"), Err(DecodeError::Json(_))));
    }

    #[test]
    fn trailing_text_after_first_value_is_ignored() {
        let frame = decode_frame(r#"{"a":1}]garbage"#).unwrap();
        assert_eq!(frame.as_object().unwrap()["a"], json!(1));
    }

    #[test]
    fn serializes_with_kind_tag() {
        let frame = decode_frame(r#"{"a":1}"#).unwrap();
        let encoded = serde_json::to_value(&frame).unwrap();
        assert_eq!(encoded, json!({ "kind": "object", "value": { "a": 1 } }));

        let raw = serde_json::to_value(MessageFrame::Raw("x".into())).unwrap();
        assert_eq!(raw, json!({ "kind": "raw", "value": "x" }));
    }
}
