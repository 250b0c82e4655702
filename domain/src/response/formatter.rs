//! Builds the user-facing reply from the populated result slots

use crate::agent::insight::AgentNotice;
use crate::state::results::AgentResults;
use crate::tool::failure::ToolFailure;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reply when no tool produced anything
pub const NO_RESULTS_TEXT: &str = "No results available.";

/// Reply of the error node
pub const FALLBACK_APOLOGY: &str =
    "I'm sorry, something went wrong while handling your request. Please try again in a moment.";

/// Field names tried, in order, when extracting display text
const TEXT_FIELDS: [&str; 4] = ["text", "answer", "content", "response"];

/// The assembled reply and what went into it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedResponse {
    pub text: String,
    pub results_count: usize,
    pub has_faq: bool,
    pub has_book_recommendation: bool,
    pub has_book_details: bool,
    pub failures_count: usize,
    pub notices_count: usize,
}

/// Display text of one result value.
///
/// Lookup order: the primary and alternate text fields, then `message`; an
/// object carrying `error` shows its message; anything else falls back to its
/// JSON rendering.
pub fn extract_display_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Object(map) => {
            if map.contains_key("error") {
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("Error occurred");
                return Some(message.to_string());
            }
            TEXT_FIELDS
                .iter()
                .chain(std::iter::once(&"message"))
                .filter_map(|field| map.get(*field).and_then(Value::as_str))
                .map(str::trim)
                .find(|text| !text.is_empty())
                .map(str::to_string)
                .or_else(|| Some(value.to_string()))
        }
        other => Some(other.to_string()),
    }
}

/// Concatenate result texts (slot order), then tool failure fragments, then
/// agent notices, separated by blank lines.
pub fn format_final_response(
    results: &AgentResults,
    failures: &[ToolFailure],
    notices: &[AgentNotice],
) -> FormattedResponse {
    let populated = results.populated();
    let mut parts: Vec<String> = populated
        .iter()
        .filter_map(|(_, value)| extract_display_text(value))
        .collect();
    let results_count = parts.len();

    parts.extend(failures.iter().map(ToolFailure::fragment));
    parts.extend(notices.iter().map(|n| n.message.clone()));

    let text = if parts.is_empty() {
        NO_RESULTS_TEXT.to_string()
    } else {
        parts.join("\n\n")
    };

    FormattedResponse {
        text,
        results_count,
        has_faq: results.faq.is_some(),
        has_book_recommendation: results.book_recommendation.is_some(),
        has_book_details: results.book_details.is_some(),
        failures_count: failures.len(),
        notices_count: notices.len(),
    }
}
