use super::{ToolError, tool_command, with_timeout};
use crate::ports::tool_backend::FaqSearchPort;
use crate::workflow::node::WorkflowNode;
use async_trait::async_trait;
use seeker_domain::tool::faq::combine_matches;
use seeker_domain::{AgentResults, AgentState, Command, FaqOutput, NodeId, ToolKind};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// FAQ lookup: semantic and keyword search run concurrently and are combined
pub struct FaqToolNode {
    faq: Arc<dyn FaqSearchPort>,
    top_k: usize,
    threshold: f64,
    timeout: Duration,
}

impl FaqToolNode {
    pub fn new(faq: Arc<dyn FaqSearchPort>, top_k: usize, threshold: f64, timeout: Duration) -> Self {
        Self {
            faq,
            top_k,
            threshold,
            timeout,
        }
    }

    async fn lookup(&self, state: &AgentState) -> Result<(AgentResults, String), ToolError> {
        let query = state
            .shared_data
            .extracted_parameters
            .as_ref()
            .and_then(|p| p.faq_query.as_deref())
            .or_else(|| state.latest_user_message())
            .map(str::trim)
            .unwrap_or_default();
        if query.is_empty() {
            return Err(ToolError::Validation("query must not be empty".to_string()));
        }

        let (semantic, keyword) = tokio::join!(
            with_timeout(self.timeout, self.faq.semantic_search(query, self.top_k, self.threshold)),
            with_timeout(self.timeout, self.faq.keyword_search(query)),
        );

        let (semantic, keyword) = match (semantic, keyword) {
            (Err(e), Err(_)) => return Err(e.into()),
            (Ok(s), Err(e)) => {
                warn!(error = %e, "Keyword FAQ search failed");
                (s, Vec::new())
            }
            (Err(e), Ok(k)) => {
                warn!(error = %e, "Semantic FAQ search failed");
                (Vec::new(), k)
            }
            (Ok(s), Ok(k)) => (s, k),
        };

        let output = FaqOutput::from_matches(combine_matches(semantic, keyword));
        debug!(matches = output.data.len(), "FAQ lookup done");
        let text = output.text.clone();
        Ok((
            AgentResults {
                faq: Some(output),
                ..Default::default()
            },
            text,
        ))
    }
}

#[async_trait]
impl WorkflowNode for FaqToolNode {
    fn id(&self) -> NodeId {
        NodeId::Tool(ToolKind::Faq)
    }

    async fn run(&self, state: &AgentState) -> Command {
        tool_command(ToolKind::Faq, self.lookup(state).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::nodes::test_support::FakeFaq;
    use seeker_domain::{FaqEntry, FaqMatch, MessageKind};

    fn entry(question: &str, answer: &str) -> FaqEntry {
        FaqEntry {
            category: "store".to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
        }
    }

    fn node(faq: FakeFaq) -> FaqToolNode {
        FaqToolNode::new(Arc::new(faq), 3, 0.3, Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_semantic_match_wins_over_keyword() {
        let hours = entry("What are your opening hours?", "9 to 6 every day.");
        let faq = FakeFaq {
            semantic: vec![FaqMatch::semantic(hours.clone(), 0.92)],
            keyword: vec![hours, entry("Are you open on holidays?", "Yes.")],
            fail: false,
        };
        let state = AgentState::initial("s-1", "chat", "opening hours").unwrap();

        let command = node(faq).run(&state).await;
        let output = command.agent_results.unwrap().faq.unwrap();
        assert_eq!(output.text, "Q: What are your opening hours?\nA: 9 to 6 every day.");
        assert_eq!(output.data.len(), 2);
        assert_eq!(command.messages[0].content, "faq_tool executed successfully");
    }

    #[tokio::test]
    async fn test_backend_failure_is_tool_local() {
        let state = AgentState::initial("s-1", "chat", "opening hours").unwrap();
        let command = node(FakeFaq {
            fail: true,
            ..Default::default()
        })
        .run(&state)
        .await;

        assert!(command.agent_results.is_none());
        assert_eq!(command.messages[0].kind, MessageKind::ToolError);
        let shared = command.shared_data.unwrap();
        assert!(shared.node_faults.is_empty());
        assert!(shared.tool_failures[0].fragment().starts_with("FAQ tool failed:"));
    }

    #[tokio::test]
    async fn test_blank_query_is_validation_error() {
        let state = AgentState::initial("s-1", "chat", "   ").unwrap();
        let command = node(FakeFaq::default()).run(&state).await;
        let shared = command.shared_data.unwrap();
        assert_eq!(
            shared.tool_failures[0].fragment(),
            "FAQ tool validation error: query must not be empty"
        );
    }
}
