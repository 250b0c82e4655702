//! Recommendation explainer
//!
//! Asks the language model why each recommended book suits the reader.
//! Explanations are best effort: any failure falls back to a templated
//! justification, so this step never fails. An optional overall budget caps
//! the wall time across batches; batches past it get templated reasons.

use crate::ports::llm_gateway::{CompletionRequest, LlmGateway, invoke_with_timeout};
use regex::Regex;
use seeker_domain::tool::book::default_justification;
use seeker_domain::{BookRecommendation, BookRecord, BookSearchCriteria, PromptTemplate};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

static BOOK_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\[BOOK_ID:\s*(\d+)\](.*?)\[/BOOK_ID\]").expect("valid book block pattern")
});

static MARKDOWN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[*_`#]+").expect("valid markdown pattern"));

pub struct RecommendationExplainer<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    timeout: Duration,
    batch_size: usize,
    budget: Option<Duration>,
}

impl<G: LlmGateway + 'static> RecommendationExplainer<G> {
    pub fn new(gateway: Arc<G>, timeout: Duration, batch_size: usize) -> Self {
        Self {
            gateway,
            timeout,
            batch_size: batch_size.max(1),
            budget: None,
        }
    }

    /// Cap the total time spent on all batches
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Attach a reason to every book, keeping the input order.
    pub async fn explain(
        &self,
        books: Vec<BookRecord>,
        criteria: &BookSearchCriteria,
    ) -> Vec<BookRecommendation> {
        let mut reasons: HashMap<u32, String> = HashMap::new();
        let deadline = self.budget.map(|budget| Instant::now() + budget);
        for batch in books.chunks(self.batch_size) {
            let timeout = match deadline {
                Some(deadline) => {
                    let left = deadline.saturating_duration_since(Instant::now());
                    if left.is_zero() {
                        warn!("Explanation budget spent, using templated reasons");
                        break;
                    }
                    left.min(self.timeout)
                }
                None => self.timeout,
            };
            let request = CompletionRequest::text(PromptTemplate::explanation_prompt(batch, criteria));
            match invoke_with_timeout(self.gateway.as_ref(), &request, timeout).await {
                Ok(completion) => {
                    let parsed = parse_explanations(&completion.content);
                    debug!(batch = batch.len(), parsed = parsed.len(), "Explanations received");
                    reasons.extend(parsed);
                }
                Err(e) => warn!(error = %e, "Explanation batch failed, using templated reasons"),
            }
        }

        books
            .into_iter()
            .map(|book| {
                let reason = reasons
                    .remove(&book.id)
                    .unwrap_or_else(|| default_justification(&book, criteria));
                BookRecommendation { book, reason }
            })
            .collect()
    }
}

/// Extract `[BOOK_ID:n] ... [/BOOK_ID]` blocks, markdown stripped
pub fn parse_explanations(response: &str) -> HashMap<u32, String> {
    BOOK_BLOCK
        .captures_iter(response)
        .filter_map(|caps| {
            let id = caps.get(1)?.as_str().parse::<u32>().ok()?;
            let body = MARKDOWN.replace_all(caps.get(2)?.as_str(), "");
            let text = body
                .lines()
                .map(|line| line.trim().trim_start_matches("- ").trim())
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            (!text.is_empty()).then_some((id, text))
        })
        .collect()
}
