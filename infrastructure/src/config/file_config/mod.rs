//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.

mod knowledge;
mod llm;
mod logging;
mod recommendation;
mod session;
mod workflow;

pub use knowledge::FileKnowledgeConfig;
pub use llm::FileLlmConfig;
pub use logging::FileLoggingConfig;
pub use recommendation::FileRecommendationConfig;
pub use session::FileSessionConfig;
pub use workflow::FileWorkflowConfig;

use seeker_application::WorkflowConfig;
use seeker_domain::AgentKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// A problem found by [`FileConfig::validate`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    #[error("{field}: value cannot be empty")]
    Empty { field: &'static str },

    #[error("{field}: must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field}: {value} is outside {expected}")]
    OutOfRange {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("workflow.enabled_agents: unknown agent '{0}'")]
    UnknownAgent(String),

    #[error("workflow.default_interface: unknown interface '{0}' (expected chat or voice)")]
    UnknownInterface(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Language model endpoint
    pub llm: FileLlmConfig,
    /// Engine limits and agent selection
    pub workflow: FileWorkflowConfig,
    /// FAQ files and book catalog
    pub knowledge: FileKnowledgeConfig,
    pub recommendation: FileRecommendationConfig,
    pub session: FileSessionConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        issues.extend(self.llm.validate());
        issues.extend(self.workflow.validate());
        issues.extend(self.knowledge.validate());
        issues.extend(self.recommendation.validate());
        issues.extend(self.session.validate());
        issues
    }

    /// Runtime parameters for the workflow engine.
    ///
    /// Unknown agent names are skipped here; [`Self::validate`] reports them.
    pub fn to_workflow_config(&self) -> WorkflowConfig {
        let agents: Vec<AgentKind> = self.workflow.parse_agents().0;
        WorkflowConfig::default()
            .with_llm_timeout(Duration::from_secs(self.llm.timeout_seconds))
            .with_tool_timeout(Duration::from_secs(self.workflow.tool_timeout_seconds))
            .with_max_steps(self.workflow.max_steps)
            .with_enabled_agents(agents)
            .with_max_recommendations(self.recommendation.max_results)
            .with_explanation_batch_size(self.recommendation.explanation_batch_size)
            .with_faq_search(self.knowledge.semantic_top_k, self.knowledge.semantic_threshold)
            .with_state_ttl(Duration::from_secs(self.session.state_ttl_seconds))
    }
}

/// Expand a leading `~/` to the home directory
pub(crate) fn expand_path(raw: &str) -> PathBuf {
    match raw.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(raw)),
        None => PathBuf::from(raw),
    }
}
