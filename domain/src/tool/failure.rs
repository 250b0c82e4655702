//! Tool-local failures

use super::kind::ToolKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolFailureKind {
    /// The tool's input did not pass validation
    Validation,
    /// A backing capability failed or timed out
    Execution,
}

/// A failure confined to one tool branch.
///
/// Recorded in shared state and rendered after the successful results; it
/// never sends the workflow to the error node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolFailure {
    pub tool: ToolKind,
    pub kind: ToolFailureKind,
    pub detail: String,
}

impl ToolFailure {
    pub fn validation(tool: ToolKind, detail: impl Into<String>) -> Self {
        Self {
            tool,
            kind: ToolFailureKind::Validation,
            detail: detail.into(),
        }
    }

    pub fn execution(tool: ToolKind, detail: impl Into<String>) -> Self {
        Self {
            tool,
            kind: ToolFailureKind::Execution,
            detail: detail.into(),
        }
    }

    /// Renderable error fragment
    pub fn fragment(&self) -> String {
        match self.kind {
            ToolFailureKind::Validation => {
                format!("{} tool validation error: {}", self.tool.label(), self.detail)
            }
            ToolFailureKind::Execution => {
                format!("{} tool failed: {}", self.tool.label(), self.detail)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragments() {
        assert_eq!(
            ToolFailure::validation(ToolKind::Faq, "query must not be empty").fragment(),
            "FAQ tool validation error: query must not be empty"
        );
        assert_eq!(
            ToolFailure::execution(ToolKind::BookDetails, "timed out").fragment(),
            "Book details tool failed: timed out"
        );
    }
}
