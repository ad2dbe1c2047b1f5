//! Splits a raw response body into frame substrings.
//!
//! A frame boundary sits between a closing `}` and an immediately following
//! `{`. A `\r\n` pair is also a boundary, so bodies that already separate
//! documents with CRLF frame the same way. Empty segments between CRLF
//! boundaries are skipped. A body without any boundary is a single frame,
//! even when it is empty or not JSON at all.
//!
//! Boundaries are purely lexical: a `}{` inside a JSON string value splits
//! the document.

/// Iterate over the frames of `body`.
///
/// The iterator is lazy and borrows `body`; clone it to restart.
pub fn frames(body: &str) -> Frames<'_> {
    Frames {
        body,
        pos: 0,
        done: false,
    }
}

/// Lazy iterator over the frames of a response body.
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    body: &'a str,
    pos: usize,
    done: bool,
}

impl<'a> Iterator for Frames<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        while !self.done {
            let rest = &self.body[self.pos..];
            match next_boundary(rest.as_bytes()) {
                Some((end, skip)) => {
                    self.pos += end + skip;
                    let frame = &rest[..end];
                    if !frame.is_empty() {
                        return Some(frame);
                    }
                }
                None => {
                    self.done = true;
                    // The whole body is one frame when no boundary was found.
                    if !rest.is_empty() || self.pos == 0 {
                        return Some(rest);
                    }
                }
            }
        }
        None
    }
}

impl std::iter::FusedIterator for Frames<'_> {}

/// Find the next boundary in `bytes`.
///
/// Returns `(frame_end, delimiter_len)`. Both delimiters are ASCII, so the
/// offsets always fall on UTF-8 character boundaries.
fn next_boundary(bytes: &[u8]) -> Option<(usize, usize)> {
    bytes.windows(2).enumerate().find_map(|(i, pair)| match pair {
        b"}{" => Some((i + 1, 0)),
        b"\r\n" => Some((i, 2)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(body: &str) -> Vec<&str> {
        frames(body).collect()
    }

    #[test]
    fn splits_concatenated_objects() {
        assert_eq!(collect(r#"{"a":1}{"b":2}"#), vec![r#"{"a":1}"#, r#"{"b":2}"#]);
    }

    #[test]
    fn n_documents_yield_n_valid_frames() {
        let docs = [r#"{"seq":1}"#, r#"{"seq":2,"nested":{"x":[1,2]}}"#, r#"{"seq":3}"#];
        let body = docs.concat();

        let framed = collect(&body);
        assert_eq!(framed, docs);
        for frame in framed {
            serde_json::from_str::<serde_json::Value>(frame).expect("each frame should be json");
        }
    }

    #[test]
    fn body_without_boundary_is_one_frame() {
        assert_eq!(collect(r#"{"a":1}"#), vec![r#"{"a":1}"#]);
        assert_eq!(collect("plain text"), vec!["plain text"]);
        assert_eq!(collect("[1,2]{"), vec!["[1,2]{"]);
    }

    #[test]
    fn empty_body_is_one_empty_frame() {
        assert_eq!(collect(""), vec![""]);
    }

    #[test]
    fn crlf_is_a_boundary() {
        assert_eq!(
            collect("{\"a\":1}\r\n{\"b\":2}\r\n"),
            vec!["{\"a\":1}", "{\"b\":2}"]
        );
        assert_eq!(collect("one\r\n\r\ntwo"), vec!["one", "two"]);
        assert!(collect("\r\n").is_empty());
    }

    #[test]
    fn whitespace_between_documents_is_not_a_boundary() {
        assert_eq!(collect("{\"a\":1} {\"b\":2}"), vec!["{\"a\":1} {\"b\":2}"]);
    }

    #[test]
    fn arrays_between_objects_stay_attached() {
        // Only `}{` and CRLF split; `][` and `}[` do not.
        assert_eq!(collect("[1][2]"), vec!["[1][2]"]);
        assert_eq!(collect("{}[1]{}"), vec!["{}[1]{}"]);
    }

    #[test]
    fn multibyte_text_is_preserved() {
        assert_eq!(
            collect(r#"{"m":"héllo"}{"m":"wörld"}"#),
            vec![r#"{"m":"héllo"}"#, r#"{"m":"wörld"}"#]
        );
    }

    #[test]
    fn iterator_is_restartable() {
        let body = r#"{"a":1}{"b":2}"#;
        let iter = frames(body);
        let first: Vec<_> = iter.clone().collect();
        let second: Vec<_> = iter.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn fused_after_exhaustion() {
        let mut iter = frames("x");
        assert_eq!(iter.next(), Some("x"));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }
}
