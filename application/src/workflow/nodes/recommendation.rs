use super::{ToolError, tool_command, with_timeout};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::tool_backend::BookCatalogPort;
use crate::use_cases::explainer::RecommendationExplainer;
use crate::workflow::node::WorkflowNode;
use async_trait::async_trait;
use seeker_domain::{
    AgentResults, AgentState, BookSearchCriteria, Command, ExtractedParameters, NodeId,
    RecommendationOutput, ToolKind,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Book recommendation: catalog search, then one justification per book
pub struct RecommendationToolNode<G: LlmGateway + 'static> {
    catalog: Arc<dyn BookCatalogPort>,
    explainer: RecommendationExplainer<G>,
    max_results: usize,
    timeout: Duration,
}

impl<G: LlmGateway + 'static> RecommendationToolNode<G> {
    pub fn new(
        catalog: Arc<dyn BookCatalogPort>,
        explainer: RecommendationExplainer<G>,
        max_results: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            explainer,
            max_results,
            timeout,
        }
    }

    async fn recommend(&self, state: &AgentState) -> Result<(AgentResults, String), ToolError> {
        let default_params = ExtractedParameters::default();
        let params = state
            .shared_data
            .extracted_parameters
            .as_ref()
            .unwrap_or(&default_params);
        let criteria =
            BookSearchCriteria::from_parameters(params, state.latest_user_message(), self.max_results);
        if criteria.budget.is_some_and(|b| !b.is_finite() || b < 0.0) {
            return Err(ToolError::Validation("budget must not be negative".to_string()));
        }

        let mut books = with_timeout(self.timeout, self.catalog.search_books(&criteria)).await?;
        if criteria.limit > 0 {
            books.truncate(criteria.limit);
        }
        debug!(count = books.len(), "Catalog search done");

        let recommendations = if books.is_empty() {
            Vec::new()
        } else {
            self.explainer.explain(books, &criteria).await
        };
        let output = RecommendationOutput::from_recommendations(recommendations);
        let text = output.text.clone();
        Ok((
            AgentResults {
                book_recommendation: Some(output),
                ..Default::default()
            },
            text,
        ))
    }
}

#[async_trait]
impl<G: LlmGateway + 'static> WorkflowNode for RecommendationToolNode<G> {
    fn id(&self) -> NodeId {
        NodeId::Tool(ToolKind::BookRecommendation)
    }

    async fn run(&self, state: &AgentState) -> Command {
        tool_command(ToolKind::BookRecommendation, self.recommend(state).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::nodes::test_support::{FakeCatalog, ScriptedGateway, book};
    use seeker_domain::tool::book::NO_BOOKS_TEXT;
    use seeker_domain::SharedData;

    fn node(books: Vec<seeker_domain::BookRecord>, replies: &[&str]) -> RecommendationToolNode<ScriptedGateway> {
        let explainer = RecommendationExplainer::new(
            Arc::new(ScriptedGateway::ok(replies)),
            Duration::from_secs(1),
            5,
        );
        RecommendationToolNode::new(
            Arc::new(FakeCatalog {
                books,
                ..Default::default()
            }),
            explainer,
            3,
            Duration::from_secs(1),
        )
    }

    fn state_with(params: ExtractedParameters) -> AgentState {
        let mut state = AgentState::initial("s-1", "voice", "a book for my kid").unwrap();
        state.apply(Command::new().with_shared_data(SharedData {
            extracted_parameters: Some(params),
            ..Default::default()
        }));
        state
    }

    fn state_for_age(age: u8) -> AgentState {
        state_with(ExtractedParameters {
            age: Some(age),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_single_book_text() {
        let command = node(
            vec![book(1, "Dragon Rider", 8, 12), book(2, "Tiny Bear", 2, 4)],
            &["[BOOK_ID:1]\nan exciting dragon adventure.\n[/BOOK_ID]"],
        )
        .run(&state_for_age(9))
        .await;

        let output = command.agent_results.unwrap().book_recommendation.unwrap();
        assert_eq!(output.data.len(), 1);
        assert_eq!(
            output.text,
            "I found a great book for you! \"Dragon Rider\" by A. Writer is an exciting dragon adventure. Priced at $12.50."
        );
    }

    #[tokio::test]
    async fn test_no_match_is_business_result() {
        let command = node(vec![book(2, "Tiny Bear", 2, 4)], &[])
            .run(&state_for_age(15))
            .await;
        let output = command.agent_results.unwrap().book_recommendation.unwrap();
        assert_eq!(output.text, NO_BOOKS_TEXT);
        assert!(command.shared_data.is_none());
    }

    #[tokio::test]
    async fn test_results_capped() {
        let books = (1..=5).map(|i| book(i, &format!("Book {i}"), 5, 10)).collect();
        let command = node(books, &[]).run(&state_for_age(7)).await;
        let output = command.agent_results.unwrap().book_recommendation.unwrap();
        assert_eq!(output.data.len(), 3);
    }
    #[tokio::test]
    async fn test_zero_budget_still_searches() {
        let params = ExtractedParameters::from_json(
            serde_json::json!({"age": 9, "budget": 0}).as_object().unwrap(),
        );
        assert_eq!(params.budget, Some(0.0));

        let command = node(vec![book(1, "Dragon Rider", 8, 12)], &[])
            .run(&state_with(params))
            .await;
        let output = command.agent_results.unwrap().book_recommendation.unwrap();
        assert_eq!(output.data.len(), 1);
        assert!(command.shared_data.is_none());
    }

    #[tokio::test]
    async fn test_negative_budget_is_validation_failure() {
        let command = node(vec![book(1, "Dragon Rider", 8, 12)], &[])
            .run(&state_with(ExtractedParameters {
                budget: Some(-5.0),
                ..Default::default()
            }))
            .await;
        assert!(command.agent_results.is_none());
        let failures = command.shared_data.unwrap().tool_failures;
        assert_eq!(
            failures[0].fragment(),
            "Book recommendation tool validation error: budget must not be negative"
        );
    }
}
