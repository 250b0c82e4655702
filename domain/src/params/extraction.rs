//! Extracted tool parameters and their validation rules

use crate::core::string::non_blank;
use crate::util::{JsonPayloadError, extract_json_object};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::LazyLock;
use thiserror::Error;

/// Upper bound of a plausible reader age
pub const MAX_AGE: u8 = 120;

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("valid number pattern"));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("extraction response was empty")]
    EmptyResponse,

    #[error("extraction response is not valid JSON: {0}")]
    InvalidJson(String),
}

impl From<JsonPayloadError> for ExtractionError {
    fn from(err: JsonPayloadError) -> Self {
        match err {
            JsonPayloadError::Empty => ExtractionError::EmptyResponse,
            other => ExtractionError::InvalidJson(other.to_string()),
        }
    }
}

/// Parameters for every tool, validated and repaired
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedParameters {
    pub faq_query: Option<String>,
    pub age: Option<u8>,
    pub age_from: Option<u8>,
    pub age_to: Option<u8>,
    pub genre: Option<String>,
    pub budget: Option<f64>,
    pub purpose: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

impl ExtractedParameters {
    /// Parse the extractor's reply and apply the validation rules
    pub fn parse(response: &str) -> Result<Self, ExtractionError> {
        let map = extract_json_object(response)?;
        Ok(Self::from_json(&map))
    }

    /// Validation rules:
    /// - ages outside `[0, 120]` are dropped
    /// - a range wins over a single age; an inverted range is swapped
    /// - negative budgets are dropped
    /// - an ISBN must be 10 to 13 digits once hyphens and spaces are removed
    pub fn from_json(map: &Map<String, Value>) -> Self {
        let text = |key: &str| map.get(key).and_then(Value::as_str).and_then(non_blank);
        let age = |key: &str| map.get(key).and_then(coerce_int).and_then(valid_age);

        let mut age_from = age("age_from");
        let mut age_to = age("age_to");
        if let (Some(from), Some(to)) = (age_from, age_to)
            && from > to
        {
            age_from = Some(to);
            age_to = Some(from);
        }
        let single_age = if age_from.is_some() || age_to.is_some() {
            None
        } else {
            age("age")
        };

        Self {
            faq_query: text("faq_query"),
            age: single_age,
            age_from,
            age_to,
            genre: text("genre"),
            budget: map
                .get("budget")
                .and_then(coerce_float)
                .filter(|b| b.is_finite() && *b >= 0.0),
            purpose: text("purpose"),
            title: text("title"),
            author: text("author"),
            isbn: text("isbn").and_then(|isbn| normalize_isbn(&isbn)),
        }
    }

    /// Age band to search with: the range if any bound is set, else the single age
    pub fn age_bounds(&self) -> Option<(u8, u8)> {
        match (self.age_from, self.age_to, self.age) {
            (None, None, Some(age)) => Some((age, age)),
            (None, None, None) => None,
            (from, to, _) => Some((from.unwrap_or(0), to.unwrap_or(MAX_AGE))),
        }
    }

    pub fn has_book_identifier(&self) -> bool {
        self.title.is_some() || self.author.is_some() || self.isbn.is_some()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn valid_age(value: i64) -> Option<u8> {
    (0..=i64::from(MAX_AGE))
        .contains(&value)
        .then(|| value as u8)
}

/// Integer from a JSON number or a string such as `"16"`, `"16+"`, `"16-18"`
/// or `"16 to 18"` (the first number wins).
pub fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let number = LEADING_NUMBER.find(s.trim())?.as_str();
            number
                .parse::<i64>()
                .ok()
                .or_else(|| number.parse::<f64>().ok().map(|f| f.trunc() as i64))
        }
        _ => None,
    }
}

/// Float from a JSON number or a string such as `"$15"` or `"15.50 dollars"`.
pub fn coerce_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => LEADING_NUMBER.find(s.trim())?.as_str().parse::<f64>().ok(),
        _ => None,
    }
}

fn normalize_isbn(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| *c != '-' && !c.is_whitespace()).collect();
    let valid = (10..=13).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit());
    valid.then_some(digits)
}
