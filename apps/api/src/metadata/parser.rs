//! Response parser — pulls one JSON object out of raw backend text.
//!
//! Backends often wrap the object in prose or markdown fences. The parser locates the
//! outermost balanced `{...}` span (ignoring braces inside string literals) and parses only
//! that. No schema semantics are applied here.

use serde_json::{Map, Value};
use thiserror::Error;

pub type ParsedObject = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("response contains no JSON object")]
    NoJsonObject,

    #[error("response contains an unterminated JSON object")]
    Unbalanced,

    #[error("invalid JSON: {0}")]
    InvalidJson(String),
}

/// Parses the outermost JSON object found in `raw`.
///
/// If a balanced span is not valid JSON, scanning resumes after that span. A `{` that never
/// closes (or opens a stray quote) is skipped and scanning resumes at the next `{`, so loose
/// braces in leading prose do not hide the real payload.
pub fn parse(raw: &str) -> Result<ParsedObject, ParseError> {
    let mut offset = 0;
    let mut first_error: Option<ParseError> = None;

    while let Some(start) = raw[offset..].find('{').map(|i| offset + i) {
        let Some(end) = balanced_end(raw, start) else {
            first_error.get_or_insert(ParseError::Unbalanced);
            offset = start + 1;
            continue;
        };

        match serde_json::from_str::<Value>(&raw[start..end]) {
            Ok(Value::Object(object)) => return Ok(object),
            // A balanced span always starts with '{', so any other Ok variant is unreachable.
            Ok(_) => {}
            Err(e) => {
                first_error.get_or_insert(ParseError::InvalidJson(e.to_string()));
            }
        }
        offset = end;
    }

    Err(first_error.unwrap_or(ParseError::NoJsonObject))
}

/// Returns the byte index one past the `}` that closes the `{` at `start`.
fn balanced_end(raw: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in raw[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + i + c.len_utf8());
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_object_from_surrounding_prose() {
        let raw = "Here is your result:\n{\"a\":1}\nThanks!";
        let object = parse(raw).unwrap();
        assert_eq!(Value::Object(object), json!({"a": 1}));
    }

    #[test]
    fn test_extracts_object_from_code_fence() {
        let raw = "```json\n{\"title\": \"Temple festival\", \"tags\": [\"a\"]}\n```";
        let object = parse(raw).unwrap();
        assert_eq!(object["title"], json!("Temple festival"));
    }

    #[test]
    fn test_outermost_object_wins_over_nested() {
        let raw = r#"{"outer": {"inner": 1}, "n": 2}"#;
        let object = parse(raw).unwrap();
        assert!(object.contains_key("outer"));
        assert_eq!(object["n"], json!(2));
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let raw = r#"prefix {"title": "use } and { freely", "q": "say \"hi\" }"} suffix"#;
        let object = parse(raw).unwrap();
        assert_eq!(object["title"], json!("use } and { freely"));
        assert_eq!(object["q"], json!("say \"hi\" }"));
    }

    #[test]
    fn test_skips_invalid_leading_span() {
        let raw = "Note {not json} then {\"ok\": true}";
        let object = parse(raw).unwrap();
        assert_eq!(object["ok"], json!(true));
    }

    #[test]
    fn test_skips_unclosed_brace_in_leading_prose() {
        let raw = "Output uses the shape { title, tags ... as requested:\n{\"a\":1}\nThanks!";
        let object = parse(raw).unwrap();
        assert_eq!(Value::Object(object), json!({"a": 1}));
    }

    #[test]
    fn test_skips_stray_quote_in_leading_prose() {
        let raw = "Note {6\" screen} then {\"a\":1}";
        let object = parse(raw).unwrap();
        assert_eq!(Value::Object(object), json!({"a": 1}));
    }

    #[test]
    fn test_unclosed_brace_without_payload_is_unbalanced() {
        assert_eq!(parse("shape { title, tags and nothing else"), Err(ParseError::Unbalanced));
    }

    #[test]
    fn test_no_object_is_malformed() {
        assert_eq!(parse("I cannot help with that."), Err(ParseError::NoJsonObject));
        assert_eq!(parse(""), Err(ParseError::NoJsonObject));
    }

    #[test]
    fn test_top_level_array_is_malformed() {
        assert_eq!(parse("[1, 2, 3]"), Err(ParseError::NoJsonObject));
    }

    #[test]
    fn test_unterminated_object_is_malformed() {
        assert_eq!(parse("{\"a\": 1"), Err(ParseError::Unbalanced));
    }

    #[test]
    fn test_invalid_json_reports_syntax_error() {
        let err = parse("{\"a\": 1,}").unwrap_err();
        assert!(matches!(err, ParseError::InvalidJson(_)));
    }

    #[test]
    fn test_multibyte_text_around_object() {
        let raw = "परिणाम: {\"language_detected\": \"Hindi\"} धन्यवाद";
        let object = parse(raw).unwrap();
        assert_eq!(object["language_detected"], json!("Hindi"));
    }
}
