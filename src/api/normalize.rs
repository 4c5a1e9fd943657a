//! api::normalize
//!
//! Best-effort repair of provider response bodies before JSON parsing.
//!
//! # Design
//!
//! Some provider responses arrive with single-quoted string delimiters
//! instead of strict JSON double quotes. This module ASCII-decodes the raw
//! body, rewrites single-quote delimiters to double quotes, and hands the
//! result to a standard JSON parser.
//!
//! The rewrite is a heuristic fix-up for that one quirk, nothing more. It is
//! deliberately kept as an isolated step with its failure modes pinned by
//! unit tests: an apostrophe inside a double-quoted string value is rewritten
//! like any other single quote and corrupts the string, which surfaces as a
//! [`DecodeError`] rather than a silently wrong value. Do not reach for this
//! as a general lenient-JSON parser.
//!
//! Strict double-quoted JSON containing no single quotes passes through with
//! meaning identical to direct parsing.

use serde_json::Value;
use thiserror::Error;

/// Errors from response-body decoding.
///
/// A decode failure never yields a partially-parsed structure; callers get
/// the whole value or an error.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body contains bytes outside the ASCII range.
    #[error("response body is not ASCII")]
    NotAscii,

    /// The body is not valid JSON after normalization.
    #[error("response body is not valid JSON after normalization: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Decode a raw response body into a structured value.
///
/// Applies the single-to-double quote rewrite, then parses as JSON.
///
/// # Errors
///
/// - [`DecodeError::NotAscii`] if any byte is outside the ASCII range.
/// - [`DecodeError::Parse`] if the rewritten text is not valid JSON.
pub fn normalize(body: &[u8]) -> Result<Value, DecodeError> {
    if !body.is_ascii() {
        return Err(DecodeError::NotAscii);
    }

    // ASCII bytes are valid UTF-8.
    let text = std::str::from_utf8(body).map_err(|_| DecodeError::NotAscii)?;
    let repaired = text.replace('\'', "\"");

    Ok(serde_json::from_str(&repaired)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strict_json_passes_through_unchanged() {
        let body = br#"{"login": "octocat", "id": 1, "names": ["a", "b"]}"#;

        let normalized = normalize(body).expect("normalize");
        let direct: Value = serde_json::from_slice(body).expect("direct parse");

        assert_eq!(normalized, direct);
    }

    #[test]
    fn single_quoted_delimiters_are_repaired() {
        let body = b"{'access_token': 'tok1', 'scope': 'repo'}";

        let value = normalize(body).expect("normalize");

        assert_eq!(value, json!({"access_token": "tok1", "scope": "repo"}));
    }

    #[test]
    fn mixed_quoting_is_repaired() {
        let body = br#"{"name": 'widget', "fork": false}"#;

        let value = normalize(body).expect("normalize");

        assert_eq!(value, json!({"name": "widget", "fork": false}));
    }

    #[test]
    fn scalars_and_arrays_decode() {
        assert_eq!(normalize(b"42").expect("int"), json!(42));
        assert_eq!(normalize(b"'hi'").expect("string"), json!("hi"));
        assert_eq!(normalize(b"[1, 2, 3]").expect("array"), json!([1, 2, 3]));
        assert_eq!(normalize(b"null").expect("null"), json!(null));
    }

    // Known failure mode: an apostrophe inside a legitimate double-quoted
    // string is rewritten into a delimiter and corrupts the value. The
    // corruption must surface as an error, never as a mangled success.
    #[test]
    fn embedded_apostrophe_corrupts_and_errors() {
        let body = br#"{"name": "it's broken"}"#;

        let err = normalize(body).unwrap_err();

        assert!(matches!(err, DecodeError::Parse(_)));
    }

    #[test]
    fn non_ascii_body_is_rejected() {
        let body = "{\"name\": \"caf\u{e9}\"}".as_bytes();

        let err = normalize(body).unwrap_err();

        assert!(matches!(err, DecodeError::NotAscii));
    }

    #[test]
    fn malformed_body_is_rejected() {
        assert!(matches!(
            normalize(b"{not json at all"),
            Err(DecodeError::Parse(_))
        ));
        assert!(matches!(normalize(b""), Err(DecodeError::Parse(_))));
    }
}
