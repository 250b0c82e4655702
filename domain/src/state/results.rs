//! Per-tool result slots

use crate::tool::book::{BookDetailsOutput, RecommendationOutput};
use crate::tool::faq::FaqOutput;
use crate::tool::kind::ToolKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One optional slot per tool kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentResults {
    pub faq: Option<FaqOutput>,
    pub book_recommendation: Option<RecommendationOutput>,
    pub book_details: Option<BookDetailsOutput>,
}

impl AgentResults {
    pub fn is_empty(&self) -> bool {
        self.faq.is_none() && self.book_recommendation.is_none() && self.book_details.is_none()
    }

    pub fn has(&self, tool: ToolKind) -> bool {
        match tool {
            ToolKind::Faq => self.faq.is_some(),
            ToolKind::BookRecommendation => self.book_recommendation.is_some(),
            ToolKind::BookDetails => self.book_details.is_some(),
        }
    }

    /// Populated slots in display order, serialized for generic text lookup
    pub fn populated(&self) -> Vec<(ToolKind, Value)> {
        ToolKind::all()
            .into_iter()
            .filter_map(|tool| {
                let value = match tool {
                    ToolKind::Faq => self.faq.as_ref().map(serde_json::to_value),
                    ToolKind::BookRecommendation => {
                        self.book_recommendation.as_ref().map(serde_json::to_value)
                    }
                    ToolKind::BookDetails => self.book_details.as_ref().map(serde_json::to_value),
                }?;
                value.ok().map(|v| (tool, v))
            })
            .collect()
    }
}

/// Merge two result sets slot by slot.
///
/// The right side wins only where its slot is populated. Slots are typed, so
/// the merge is total and has no failure path to recover from.
pub fn merge_agent_results(left: &AgentResults, right: &AgentResults) -> AgentResults {
    AgentResults {
        faq: right.faq.clone().or_else(|| left.faq.clone()),
        book_recommendation: right
            .book_recommendation
            .clone()
            .or_else(|| left.book_recommendation.clone()),
        book_details: right.book_details.clone().or_else(|| left.book_details.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::book::BookLookup;
    use crate::tool::faq::{FaqMatch, MatchSource};

    fn faq(text: &str) -> FaqOutput {
        FaqOutput::from_matches(vec![FaqMatch {
            category: "shipping".to_string(),
            question: text.to_string(),
            answer: "Three days.".to_string(),
            similarity: Some(0.9),
            source: MatchSource::Semantic,
        }])
    }

    #[test]
    fn test_right_overwrites_only_populated_slots() {
        let left = AgentResults {
            faq: Some(faq("old")),
            book_details: Some(BookDetailsOutput::not_found(&BookLookup::default())),
            ..Default::default()
        };
        let right = AgentResults {
            faq: Some(faq("new")),
            ..Default::default()
        };

        let merged = merge_agent_results(&left, &right);
        assert_eq!(merged.faq, Some(faq("new")));
        assert_eq!(merged.book_details, left.book_details);
        assert!(merged.book_recommendation.is_none());
    }

    #[test]
    fn test_merge_is_idempotent_for_repeated_delta() {
        let base = AgentResults {
            faq: Some(faq("base")),
            ..Default::default()
        };
        let delta = AgentResults {
            book_details: Some(BookDetailsOutput::not_found(&BookLookup::default())),
            ..Default::default()
        };

        let once = merge_agent_results(&base, &delta);
        let twice = merge_agent_results(&once, &delta);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_order_independent_for_disjoint_slots() {
        let a = AgentResults {
            faq: Some(faq("a")),
            ..Default::default()
        };
        let b = AgentResults {
            book_details: Some(BookDetailsOutput::not_found(&BookLookup::default())),
            ..Default::default()
        };
        let empty = AgentResults::default();

        let ab = merge_agent_results(&merge_agent_results(&empty, &a), &b);
        let ba = merge_agent_results(&merge_agent_results(&empty, &b), &a);
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_populated_follows_display_order() {
        let results = AgentResults {
            book_details: Some(BookDetailsOutput::not_found(&BookLookup::default())),
            faq: Some(faq("q")),
            ..Default::default()
        };
        let tools: Vec<ToolKind> = results.populated().into_iter().map(|(t, _)| t).collect();
        assert_eq!(tools, vec![ToolKind::Faq, ToolKind::BookDetails]);
        assert!(results.has(ToolKind::Faq));
        assert!(!results.has(ToolKind::BookRecommendation));
    }
}
