use super::{ToolError, tool_command, with_timeout};
use crate::ports::tool_backend::BookCatalogPort;
use crate::workflow::node::WorkflowNode;
use async_trait::async_trait;
use seeker_domain::{
    AgentResults, AgentState, BookDetailsOutput, BookLookup, Command, NodeId, ToolKind,
};
use std::sync::Arc;
use std::time::Duration;

/// Single-book lookup by ISBN, title or author
pub struct BookDetailsToolNode {
    catalog: Arc<dyn BookCatalogPort>,
    timeout: Duration,
}

impl BookDetailsToolNode {
    pub fn new(catalog: Arc<dyn BookCatalogPort>, timeout: Duration) -> Self {
        Self { catalog, timeout }
    }

    async fn lookup(&self, state: &AgentState) -> Result<(AgentResults, String), ToolError> {
        let lookup = state
            .shared_data
            .extracted_parameters
            .as_ref()
            .map(BookLookup::from_parameters)
            .unwrap_or_default();
        if lookup.is_empty() {
            return Err(ToolError::Validation(
                "a title, author or ISBN is required".to_string(),
            ));
        }

        let output = match with_timeout(self.timeout, self.catalog.find_book(&lookup)).await? {
            Some(book) => BookDetailsOutput::found(book),
            None => BookDetailsOutput::not_found(&lookup),
        };
        let text = output.text.clone();
        Ok((
            AgentResults {
                book_details: Some(output),
                ..Default::default()
            },
            text,
        ))
    }
}

#[async_trait]
impl WorkflowNode for BookDetailsToolNode {
    fn id(&self) -> NodeId {
        NodeId::Tool(ToolKind::BookDetails)
    }

    async fn run(&self, state: &AgentState) -> Command {
        tool_command(ToolKind::BookDetails, self.lookup(state).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::nodes::test_support::{FakeCatalog, book};
    use seeker_domain::{ExtractedParameters, SharedData};

    fn state_with(params: ExtractedParameters) -> AgentState {
        let mut state = AgentState::initial("s-1", "chat", "tell me about it").unwrap();
        state.apply(Command::new().with_shared_data(SharedData {
            extracted_parameters: Some(params),
            ..Default::default()
        }));
        state
    }

    fn node() -> BookDetailsToolNode {
        BookDetailsToolNode::new(
            Arc::new(FakeCatalog {
                books: vec![book(1, "Dragon Rider", 8, 12)],
                ..Default::default()
            }),
            Duration::from_secs(1),
        )
    }

    #[tokio::test]
    async fn test_found_by_title() {
        let command = node()
            .run(&state_with(ExtractedParameters {
                title: Some("dragon rider".to_string()),
                ..Default::default()
            }))
            .await;
        let details = command.agent_results.unwrap().book_details.unwrap();
        assert_eq!(details.data.len(), 1);
        assert!(details.text.contains("3 in stock"));
    }

    #[tokio::test]
    async fn test_not_found_is_business_result() {
        let command = node()
            .run(&state_with(ExtractedParameters {
                isbn: Some("9999999999".to_string()),
                ..Default::default()
            }))
            .await;
        let details = command.agent_results.unwrap().book_details.unwrap();
        assert_eq!(details.text, "I couldn't find a book matching ISBN 9999999999.");
    }

    #[tokio::test]
    async fn test_missing_identifier_is_validation_error() {
        let command = node().run(&state_with(ExtractedParameters::default())).await;
        let failure = &command.shared_data.unwrap().tool_failures[0];
        assert_eq!(
            failure.fragment(),
            "Book details tool validation error: a title, author or ISBN is required"
        );
    }
}
