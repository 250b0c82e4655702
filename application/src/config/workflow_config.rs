//! Workflow runtime parameters.

use seeker_domain::AgentKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Runtime parameters of the workflow engine.
///
/// Every external call made by a node is bounded by one of the timeouts
/// below; nothing inside the engine retries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Timeout for each language model call (router, extractor, agents, explainer).
    pub llm_timeout: Duration,
    /// Timeout for each FAQ or catalog call.
    pub tool_timeout: Duration,
    /// Maximum number of supersteps before the run is forced into `error`.
    pub max_steps: usize,
    /// Agents the router may select.
    pub enabled_agents: Vec<AgentKind>,
    /// Maximum number of recommended books per turn.
    pub max_recommendations: usize,
    /// Books per justification request.
    pub explanation_batch_size: usize,
    /// Number of semantic FAQ matches requested.
    pub faq_top_k: usize,
    /// Minimum similarity for a semantic FAQ match.
    pub faq_similarity_threshold: f64,
    /// Age after which cached request states are swept.
    pub state_ttl: Duration,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            llm_timeout: Duration::from_secs(30),
            tool_timeout: Duration::from_secs(10),
            max_steps: 12,
            enabled_agents: AgentKind::default_enabled(),
            max_recommendations: 3,
            explanation_batch_size: 5,
            faq_top_k: 3,
            faq_similarity_threshold: 0.3,
            state_ttl: Duration::from_secs(3600),
        }
    }
}

impl WorkflowConfig {
    /// Supersteps on the longest path: router, parameter extraction,
    /// coordinator, agent, tool, merge, format.
    pub const MIN_STEPS: usize = 7;

    // ==================== Builder Methods ====================

    pub fn with_llm_timeout(mut self, timeout: Duration) -> Self {
        self.llm_timeout = timeout;
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.max_steps = max;
        self
    }

    pub fn with_enabled_agents(mut self, agents: Vec<AgentKind>) -> Self {
        self.enabled_agents = agents;
        self
    }

    pub fn with_max_recommendations(mut self, max: usize) -> Self {
        self.max_recommendations = max;
        self
    }

    pub fn with_explanation_batch_size(mut self, size: usize) -> Self {
        self.explanation_batch_size = size.max(1);
        self
    }

    pub fn with_faq_search(mut self, top_k: usize, threshold: f64) -> Self {
        self.faq_top_k = top_k;
        self.faq_similarity_threshold = threshold;
        self
    }

    pub fn with_state_ttl(mut self, ttl: Duration) -> Self {
        self.state_ttl = ttl;
        self
    }

    pub fn is_enabled(&self, agent: AgentKind) -> bool {
        self.enabled_agents.contains(&agent)
    }
}
