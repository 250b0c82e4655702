//! FAQ entries, matches and the FAQ tool's result

use serde::{Deserialize, Serialize};

/// Answer text when nothing matched
pub const FAQ_NOT_FOUND_TEXT: &str = "Sorry, I couldn't find an answer to your question.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub category: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    Semantic,
    Keyword,
}

/// A ranked FAQ hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqMatch {
    pub category: String,
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    pub source: MatchSource,
}

impl FaqMatch {
    pub fn semantic(entry: FaqEntry, similarity: f64) -> Self {
        Self {
            category: entry.category,
            question: entry.question,
            answer: entry.answer,
            similarity: Some(similarity),
            source: MatchSource::Semantic,
        }
    }

    pub fn keyword(entry: FaqEntry) -> Self {
        Self {
            category: entry.category,
            question: entry.question,
            answer: entry.answer,
            similarity: None,
            source: MatchSource::Keyword,
        }
    }

    fn key(&self) -> (&str, &str) {
        (self.category.as_str(), self.question.as_str())
    }
}

/// Result written to the `faq` slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqOutput {
    pub text: String,
    pub data: Vec<FaqMatch>,
}

impl FaqOutput {
    /// Best answer first; an empty list yields the not-found text
    pub fn from_matches(matches: Vec<FaqMatch>) -> Self {
        let text = matches
            .first()
            .map(|top| format!("Q: {}\nA: {}", top.question, top.answer))
            .unwrap_or_else(|| FAQ_NOT_FOUND_TEXT.to_string());
        Self {
            text,
            data: matches,
        }
    }
}

/// Combine semantic and keyword hits, deduplicated by `(category, question)`.
///
/// Semantic hits come first (in their ranked order) and win over keyword hits
/// for the same question.
pub fn combine_matches(semantic: Vec<FaqMatch>, keyword: Vec<FaqEntry>) -> Vec<FaqMatch> {
    let mut combined: Vec<FaqMatch> = Vec::with_capacity(semantic.len() + keyword.len());
    let candidates = semantic.into_iter().chain(keyword.into_iter().map(FaqMatch::keyword));
    for candidate in candidates {
        if !combined.iter().any(|m| m.key() == candidate.key()) {
            combined.push(candidate);
        }
    }
    combined
}

/// Case-insensitive substring search over questions
pub fn keyword_search(entries: &[FaqEntry], query: &str) -> Vec<FaqEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    entries
        .iter()
        .filter(|entry| entry.question.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
