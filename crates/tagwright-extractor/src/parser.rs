//! Parse stage-2 model output into a raw extraction result

use crate::error::ExtractorError;
use serde_json::{Map, Value};
use tracing::debug;

/// Untyped extraction result, keys in the order the model emitted them
pub type ExtractionResult = Map<String, Value>;

/// Parse model output as a JSON object
///
/// The output is parsed as-is first. If that fails, code fences are stripped
/// and the text between the first `{` and the last `}` is parsed instead.
/// Anything that still fails, or parses to something other than an object,
/// is an error.
pub fn parse_extraction(response: &str) -> Result<ExtractionResult, ExtractorError> {
    let value = match serde_json::from_str::<Value>(response.trim()) {
        Ok(value) => value,
        Err(e) => {
            debug!("Direct JSON parse failed, trying recovery: {}", e);
            let candidate = recover_json(response).ok_or_else(|| {
                ExtractorError::InvalidFormat("no JSON object found in model output".to_string())
            })?;
            serde_json::from_str(candidate)?
        }
    };

    match value {
        Value::Object(map) => Ok(map),
        other => Err(ExtractorError::InvalidFormat(format!(
            "expected a JSON object, got {}",
            kind_of(&other)
        ))),
    }
}

/// Strip code fences and slice from the first `{` to the last `}`
fn recover_json(response: &str) -> Option<&str> {
    let mut text = response.trim();
    if text.get(..7).is_some_and(|p| p.eq_ignore_ascii_case("```json")) {
        text = &text[7..];
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    text = text.trim_end();
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    let first = text.find('{')?;
    let last = text.rfind('}')?;
    if last <= first {
        return None;
    }
    Some(text[first..=last].trim())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_object() {
        let parsed = parse_extraction(r#"{"task": ["parkour"], "institution": "MIT"}"#).unwrap();
        assert_eq!(parsed["task"], json!(["parkour"]));
        assert_eq!(parsed["institution"], json!("MIT"));
    }

    #[test]
    fn test_code_fenced_object() {
        let response = "```json\n{\"robot_type\": [\"humanoid\"]}\n```";
        let parsed = parse_extraction(response).unwrap();
        assert_eq!(parsed["robot_type"], json!(["humanoid"]));
    }

    #[test]
    fn test_bare_fence_and_chatter() {
        let response = "```\nHere you go: {\"task\": \"walking\"} hope this helps\n```";
        let parsed = parse_extraction(response).unwrap();
        assert_eq!(parsed["task"], json!("walking"));
    }

    #[test]
    fn test_key_order_preserved() {
        let parsed = parse_extraction(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        assert_eq!(parsed.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_no_object_is_error() {
        assert!(matches!(
            parse_extraction("I could not find anything."),
            Err(ExtractorError::InvalidFormat(_))
        ));
        assert!(parse_extraction("} backwards {").is_err());
    }

    #[test]
    fn test_broken_json_is_error() {
        assert!(matches!(
            parse_extraction("```json\n{\"task\": [\"a\",}\n```"),
            Err(ExtractorError::JsonParse(_))
        ));
    }

    #[test]
    fn test_non_object_is_error() {
        assert!(matches!(
            parse_extraction(r#"["task:parkour"]"#),
            Err(ExtractorError::InvalidFormat(_))
        ));
        assert!(parse_extraction("42").is_err());
    }
}
