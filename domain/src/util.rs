//! Shared utility functions.

use serde_json::{Map, Value};
use thiserror::Error;

/// Failure to recover a JSON object from a language model reply
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JsonPayloadError {
    #[error("empty response")]
    Empty,

    #[error("no JSON object found in response")]
    NoObject,

    #[error("invalid JSON: {0}")]
    Invalid(String),
}

/// Extract the outermost JSON object from a model reply.
///
/// Models sometimes wrap structured output in prose or a fenced code block,
/// so the object is taken from the first `{` to the last `}`.
pub fn extract_json_object(response: &str) -> Result<Map<String, Value>, JsonPayloadError> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(JsonPayloadError::Empty);
    }

    let start = trimmed.find('{').ok_or(JsonPayloadError::NoObject)?;
    let end = trimmed.rfind('}').ok_or(JsonPayloadError::NoObject)?;
    if end < start {
        return Err(JsonPayloadError::NoObject);
    }

    match serde_json::from_str::<Value>(&trimmed[start..=end]) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(JsonPayloadError::NoObject),
        Err(e) => Err(JsonPayloadError::Invalid(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_plain_object() {
        let map = extract_json_object(r#"{"next_node": "general_agent"}"#).unwrap();
        assert_eq!(map["next_node"], "general_agent");
    }

    #[test]
    fn extracts_fenced_object() {
        let response = "Here you go:\n```json\n{\"confidence\": 0.9}\n```\n";
        let map = extract_json_object(response).unwrap();
        assert_eq!(map["confidence"], 0.9);
    }

    #[test]
    fn empty_and_missing_objects() {
        assert_eq!(extract_json_object("   "), Err(JsonPayloadError::Empty));
        assert_eq!(extract_json_object("no json"), Err(JsonPayloadError::NoObject));
        assert_eq!(extract_json_object("} backwards {"), Err(JsonPayloadError::NoObject));
    }

    #[test]
    fn invalid_object() {
        assert!(matches!(
            extract_json_object("{not json}"),
            Err(JsonPayloadError::Invalid(_))
        ));
    }
}
