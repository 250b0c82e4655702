//! Query router
//!
//! Asks the language model which agent(s) should handle a query and turns
//! the reply into a validated [`RoutingAnalysis`].

use super::shared::AnalysisError;
use crate::ports::llm_gateway::{CompletionRequest, LlmGateway, invoke_with_timeout};
use seeker_domain::util::extract_json_object;
use seeker_domain::{AgentKind, Interface, PromptTemplate, RoutingAnalysis, RoutingError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub struct QueryRouter<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    enabled_agents: Vec<AgentKind>,
    timeout: Duration,
}

impl<G: LlmGateway + 'static> QueryRouter<G> {
    pub fn new(gateway: Arc<G>, enabled_agents: Vec<AgentKind>, timeout: Duration) -> Self {
        Self {
            gateway,
            enabled_agents,
            timeout,
        }
    }

    /// Route `query` for `interface`.
    ///
    /// There is no default route: an empty or unparseable reply, a missing
    /// `next_node` or a transport failure is returned as an error.
    pub async fn analyze(
        &self,
        query: &str,
        interface: Interface,
    ) -> Result<RoutingAnalysis, AnalysisError> {
        let prompt = PromptTemplate::router_prompt(query, interface, &self.enabled_agents);
        debug!(model = self.gateway.model_name(), "Routing query");

        let completion = invoke_with_timeout(
            self.gateway.as_ref(),
            &CompletionRequest::structured(prompt),
            self.timeout,
        )
        .await?;

        let map = extract_json_object(&completion.content).map_err(RoutingError::from)?;
        let analysis = RoutingAnalysis::from_json(&map)?
            .resolve_for_interface(interface, &self.enabled_agents)?;

        info!(
            next_node = %analysis.next_node,
            agents = ?analysis.participating_agents,
            agent_count = analysis.agent_count(),
            coordinated = analysis.requires_coordination(),
            confidence = analysis.confidence,
            "Routing decided"
        );
        Ok(analysis)
    }
}
