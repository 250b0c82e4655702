//! FAQ knowledge base loaded from a directory of text files
//!
//! Each `*.txt` file is one category (its file stem). Entries are `Q:` and
//! `A:` lines, separated by blank lines.

use super::KnowledgeError;
use async_trait::async_trait;
use seeker_application::{CapabilityError, FaqSearchPort};
use seeker_domain::tool::faq::keyword_search;
use seeker_domain::{FaqEntry, FaqMatch};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

const QUESTION_PREFIX: &str = "Q:";
const ANSWER_PREFIX: &str = "A:";

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "can", "do", "does", "for", "how", "i", "in", "is", "it", "me", "my",
    "of", "on", "or", "the", "to", "what", "when", "where", "which", "with", "you", "your",
];

/// In-memory FAQ store with token-overlap semantic search
#[derive(Debug, Clone, Default)]
pub struct FaqKnowledgeBase {
    entries: Vec<FaqEntry>,
    question_tokens: Vec<HashSet<String>>,
}

impl FaqKnowledgeBase {
    pub fn from_entries(entries: Vec<FaqEntry>) -> Self {
        let question_tokens = entries.iter().map(|e| tokenize(&e.question)).collect();
        Self {
            entries,
            question_tokens,
        }
    }

    /// Load every `*.txt` file in `dir`.
    ///
    /// Unreadable files are skipped with a warning; a missing directory is an error.
    pub fn load(dir: &Path) -> Result<Self, KnowledgeError> {
        if !dir.is_dir() {
            return Err(KnowledgeError::NotFound(dir.to_path_buf()));
        }

        let pattern = dir.join("*.txt");
        let mut files: Vec<_> = glob::glob(&pattern.to_string_lossy())?
            .filter_map(Result::ok)
            .collect();
        files.sort();

        if files.is_empty() {
            warn!("No FAQ files found in directory: {}", dir.display());
        }

        let mut entries = Vec::new();
        for file in files {
            let category = file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            match std::fs::read_to_string(&file) {
                Ok(content) => {
                    let parsed = parse_faq_text(&category, &content);
                    debug!("Loaded FAQ file {} with {} entries", file.display(), parsed.len());
                    entries.extend(parsed);
                }
                Err(e) => warn!("Failed to load FAQ file {}: {}", file.display(), e),
            }
        }

        info!("FAQ knowledge base loaded: {} entries", entries.len());
        Ok(Self::from_entries(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    fn rank(&self, query: &str, top_k: usize, threshold: f64) -> Vec<FaqMatch> {
        let query_tokens = tokenize(query);
        if query_tokens.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f64)> = self
            .question_tokens
            .iter()
            .enumerate()
            .map(|(idx, tokens)| (idx, similarity(&query_tokens, tokens)))
            .filter(|(_, score)| *score >= threshold && *score > 0.0)
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(top_k);

        scored
            .into_iter()
            .map(|(idx, score)| FaqMatch::semantic(self.entries[idx].clone(), round3(score)))
            .collect()
    }
}

/// Parse `Q:` / `A:` pairs. A pair is closed by a blank line or end of input.
fn parse_faq_text(category: &str, content: &str) -> Vec<FaqEntry> {
    let mut entries = Vec::new();
    let mut question: Option<String> = None;
    let mut answer: Option<String> = None;

    let mut flush = |question: &mut Option<String>, answer: &mut Option<String>| {
        if let (Some(q), Some(a)) = (question.take(), answer.take())
            && !q.is_empty()
        {
            entries.push(FaqEntry {
                category: category.to_string(),
                question: q,
                answer: a,
            });
        }
    };

    for line in content.lines().map(str::trim) {
        if let Some(q) = line.strip_prefix(QUESTION_PREFIX) {
            question = Some(q.trim().to_string());
        } else if let Some(a) = line.strip_prefix(ANSWER_PREFIX) {
            answer = Some(a.trim().to_string());
        } else if line.is_empty() {
            flush(&mut question, &mut answer);
        }
    }
    flush(&mut question, &mut answer);
    entries
}

fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|t| !t.is_empty() && !STOPWORDS.contains(&t.as_str()))
        .collect()
}

/// Dice coefficient of two token sets
fn similarity(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let shared = a.intersection(b).count() as f64;
    2.0 * shared / (a.len() + b.len()) as f64
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[async_trait]
impl FaqSearchPort for FaqKnowledgeBase {
    async fn semantic_search(
        &self,
        query: &str,
        top_k: usize,
        threshold: f64,
    ) -> Result<Vec<FaqMatch>, CapabilityError> {
        Ok(self.rank(query, top_k, threshold))
    }

    async fn keyword_search(&self, query: &str) -> Result<Vec<FaqEntry>, CapabilityError> {
        Ok(keyword_search(&self.entries, query))
    }
}
