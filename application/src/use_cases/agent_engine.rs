//! Agent role engine
//!
//! Runs one agent's tool-selection step: builds the agent's analysis prompt,
//! makes one structured model call and validates the reply against the
//! agent's declared tools.

use super::shared::AnalysisError;
use crate::ports::llm_gateway::{CompletionRequest, LlmGateway, invoke_with_timeout};
use seeker_domain::{AgentDecision, AgentKind, AgentState, RouterContext, StateError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Result of an agent's analysis
#[derive(Debug, Clone, PartialEq)]
pub enum AgentOutcome {
    /// At least one declared tool was selected
    Selected(AgentDecision),
    /// No tool applies: the reply was rejected or selected nothing.
    /// The branch ends here and never enters a tool node.
    NoSuitableTool(Option<String>),
}

pub struct AgentEngine<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    timeout: Duration,
}

impl<G: LlmGateway + 'static> AgentEngine<G> {
    pub fn new(gateway: Arc<G>, timeout: Duration) -> Self {
        Self { gateway, timeout }
    }

    /// Let `agent` pick tools for the latest user message in `state`.
    ///
    /// Errors are reserved for an invalid state or a failed model call.
    /// A reply that fails validation is not an error; it is reported as
    /// [`AgentOutcome::NoSuitableTool`] with the rejection reason.
    pub async fn handle(
        &self,
        agent: AgentKind,
        state: &AgentState,
    ) -> Result<AgentOutcome, AnalysisError> {
        state.validate()?;
        let query = state
            .latest_user_message()
            .ok_or(StateError::NoUserMessage)?;

        let context = RouterContext::from_analysis(state.shared_data.routing_analysis.as_ref());
        let prompt = agent.build_prompt(query, &context);

        let completion = invoke_with_timeout(
            self.gateway.as_ref(),
            &CompletionRequest::structured(prompt),
            self.timeout,
        )
        .await?;

        match AgentDecision::parse(&completion.content, agent) {
            Ok(decision) if decision.selected_tools.is_empty() => {
                debug!(agent = %agent, "Agent selected no tools");
                Ok(AgentOutcome::NoSuitableTool(None))
            }
            Ok(decision) => {
                debug!(agent = %agent, tools = ?decision.selected_tools, "Agent selected tools");
                Ok(AgentOutcome::Selected(decision))
            }
            Err(e) => {
                warn!(agent = %agent, error = %e, "Agent response rejected");
                Ok(AgentOutcome::NoSuitableTool(Some(e.to_string())))
            }
        }
    }
}
