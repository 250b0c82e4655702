//! Tool identifiers

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ToolKind {
    #[serde(rename = "faq_tool")]
    Faq,
    #[serde(rename = "book_recommendation_tool")]
    BookRecommendation,
    #[serde(rename = "book_details_tool")]
    BookDetails,
}

impl ToolKind {
    /// All tools, in result display order
    pub fn all() -> [ToolKind; 3] {
        [ToolKind::Faq, ToolKind::BookRecommendation, ToolKind::BookDetails]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::Faq => "faq_tool",
            ToolKind::BookRecommendation => "book_recommendation_tool",
            ToolKind::BookDetails => "book_details_tool",
        }
    }

    /// Human-facing label used in tool messages
    pub fn label(&self) -> &'static str {
        match self {
            ToolKind::Faq => "FAQ",
            ToolKind::BookRecommendation => "Book recommendation",
            ToolKind::BookDetails => "Book details",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolKind::Faq => "answers store policy and customer service questions",
            ToolKind::BookRecommendation => {
                "recommends books by age, genre, purpose and budget"
            }
            ToolKind::BookDetails => "looks up a specific book by title, author or ISBN",
        }
    }

    /// Name of the `AgentResults` slot this tool writes
    pub fn result_slot(&self) -> &'static str {
        match self {
            ToolKind::Faq => "faq",
            ToolKind::BookRecommendation => "book_recommendation",
            ToolKind::BookDetails => "book_details",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ToolKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        ToolKind::all()
            .into_iter()
            .find(|tool| tool.as_str() == name)
            .ok_or_else(|| DomainError::UnknownTool(s.to_string()))
    }
}
