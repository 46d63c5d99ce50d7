//! Tolerant JSON recovery from completion-service text
//!
//! Completion replies rarely arrive as bare JSON: models wrap payloads in
//! markdown fences and surround them with prose. Recovery runs an ordered
//! strategy ladder and the caller declares the shape it expects; a value of
//! the other shape is rejected at every rung rather than coerced.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

/// First fenced code block, with or without a `json` tag
static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").unwrap()
});

/// JSON shape the caller expects back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Object,
    Array,
}

impl JsonShape {
    const fn name(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    const fn delimiters(self) -> (char, char) {
        match self {
            Self::Object => ('{', '}'),
            Self::Array => ('[', ']'),
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }
}

/// No strategy produced a value of the expected shape
#[derive(Debug, Clone, Error)]
#[error("could not recover a JSON {} from response: {reason}", shape.name())]
pub struct ParseFailure {
    pub shape: JsonShape,
    pub reason: String,
}

/// Recover a JSON object from free-form response text
pub fn extract_object(text: &str) -> Result<Value, ParseFailure> {
    extract(text, JsonShape::Object)
}

/// Recover a JSON array from free-form response text
pub fn extract_array(text: &str) -> Result<Value, ParseFailure> {
    extract(text, JsonShape::Array)
}

/// Run the strategy ladder: direct parse, fenced block, trimmed delimiters.
/// First strategy yielding a value of the expected shape wins.
fn extract(text: &str, shape: JsonShape) -> Result<Value, ParseFailure> {
    let mut last_reason = String::new();

    match parse_with_shape(text, shape) {
        Ok(value) => return Ok(value),
        Err(reason) => last_reason = pick_reason(last_reason, reason),
    }

    if let Some(captures) = FENCED_BLOCK.captures(text) {
        if let Some(interior) = captures.get(1) {
            match parse_with_shape(interior.as_str(), shape) {
                Ok(value) => return Ok(value),
                Err(reason) => last_reason = pick_reason(last_reason, reason),
            }
        }
    }

    if let Some(trimmed) = trim_to_delimiters(text, shape) {
        match parse_with_shape(trimmed, shape) {
            Ok(value) => return Ok(value),
            Err(reason) => last_reason = pick_reason(last_reason, reason),
        }
    }

    if last_reason.is_empty() {
        last_reason = "no candidate JSON found".to_string();
    }

    Err(ParseFailure {
        shape,
        reason: last_reason,
    })
}

/// Parse a candidate and verify its shape
fn parse_with_shape(candidate: &str, shape: JsonShape) -> Result<Value, String> {
    let value: Value = serde_json::from_str(candidate.trim()).map_err(|e| e.to_string())?;
    if shape.matches(&value) {
        Ok(value)
    } else {
        Err(format!("parsed JSON is not an {}", shape.name()))
    }
}

/// Substring from the first opening to the last closing delimiter
fn trim_to_delimiters(text: &str, shape: JsonShape) -> Option<&str> {
    let (open, close) = shape.delimiters();
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

/// Keep the most informative reason: a shape mismatch beats a syntax error
/// from an earlier rung
fn pick_reason(previous: String, current: String) -> String {
    if previous.is_empty() || current.contains("is not") {
        current
    } else {
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn direct_object_parses_unchanged() {
        let value = extract_object(r#"{"complete": "yes"}"#).unwrap();
        assert_eq!(value, json!({"complete": "yes"}));
    }

    #[test]
    fn direct_array_parses_unchanged() {
        let value = extract_array(r#"[{"name": "t1"}, {"name": "t2"}]"#).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn tagged_fence_is_unwrapped() {
        let text = "Here is the result:\n```json\n{\"components\": []}\n```\nHope that helps!";
        let value = extract_object(text).unwrap();
        assert_eq!(value, json!({"components": []}));
    }

    #[test]
    fn bare_fence_is_unwrapped() {
        let text = "```\n[1, 2, 3]\n```";
        let value = extract_array(text).unwrap();
        assert_eq!(value, json!([1, 2, 3]));
    }

    #[test]
    fn fenced_result_equals_unfenced_result() {
        let payload = r#"{"a": [1, {"b": "c"}]}"#;
        let fenced = format!("```json\n{payload}\n```");
        assert_eq!(
            extract_object(payload).unwrap(),
            extract_object(&fenced).unwrap()
        );
    }

    #[test]
    fn prose_around_braces_is_trimmed() {
        let text = "The architecture is {\"components\": [{\"id\": \"web\"}]} as requested.";
        let value = extract_object(text).unwrap();
        assert_eq!(value["components"][0]["id"], "web");
    }

    #[test]
    fn prose_around_brackets_is_trimmed() {
        let text = "Threats found: [{\"name\": \"spoofed login\"}] — review carefully.";
        let value = extract_array(text).unwrap();
        assert_eq!(value[0]["name"], "spoofed login");
    }

    #[test]
    fn object_requested_array_present_fails() {
        let err = extract_object("[1, 2, 3]").unwrap_err();
        assert_eq!(err.shape, JsonShape::Object);
        assert!(err.reason.contains("not an object"));
    }

    #[test]
    fn array_requested_object_present_fails() {
        let err = extract_array(r#"{"threats": []}"#).unwrap_err();
        assert_eq!(err.shape, JsonShape::Array);
        assert!(err.reason.contains("not an array"));
    }

    #[test]
    fn fenced_wrong_shape_fails() {
        let err = extract_array("```json\n{\"a\": 1}\n```").unwrap_err();
        assert!(err.reason.contains("not an array"));
    }

    #[test]
    fn scalar_json_is_not_accepted() {
        assert!(extract_object("42").is_err());
        assert!(extract_array("\"just a string\"").is_err());
    }

    #[test]
    fn plain_prose_fails() {
        let err = extract_object("I could not produce an analysis, sorry.").unwrap_err();
        assert!(err.to_string().contains("could not recover"));
    }

    #[test]
    fn malformed_fence_falls_through_to_trim() {
        // The fence interior is garbage, but the text still carries a
        // complete object ahead of it.
        let text = "{\"fixed\": true} is the result\n```json\nnot json at all\n```";
        let value = extract_object(text).unwrap();
        assert_eq!(value, json!({"fixed": true}));
    }

    #[test]
    fn empty_input_fails() {
        assert!(extract_object("").is_err());
        assert!(extract_array("   ").is_err());
    }

    #[test]
    fn nested_arrays_inside_object_do_not_confuse_shape_check() {
        let value = extract_object(r#"{"items": [1, 2]}"#).unwrap();
        assert!(value.is_object());
    }

    #[test]
    fn first_fence_wins_over_later_fences() {
        let text = "```json\n{\"first\": 1}\n```\n```json\n{\"second\": 2}\n```";
        let value = extract_object(text).unwrap();
        assert_eq!(value, json!({"first": 1}));
    }
}
