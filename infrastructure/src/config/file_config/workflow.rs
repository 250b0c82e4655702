//! Workflow configuration from TOML (`[workflow]` section)

use super::ConfigValidationError;
use seeker_application::WorkflowConfig;
use seeker_domain::{AgentKind, Interface};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWorkflowConfig {
    /// Superstep guard
    pub max_steps: usize,
    /// Bound on every FAQ or catalog call
    pub tool_timeout_seconds: u64,
    /// Agents the router may pick (`sales_agent` is opt-in)
    pub enabled_agents: Vec<String>,
    /// Interface used when the CLI does not specify one
    pub default_interface: String,
}

impl Default for FileWorkflowConfig {
    fn default() -> Self {
        Self {
            max_steps: 12,
            tool_timeout_seconds: 10,
            enabled_agents: AgentKind::default_enabled()
                .iter()
                .map(|a| a.as_str().to_string())
                .collect(),
            default_interface: Interface::Chat.as_str().to_string(),
        }
    }
}

impl FileWorkflowConfig {
    /// Parsed agents plus an issue for every unknown name
    pub fn parse_agents(&self) -> (Vec<AgentKind>, Vec<ConfigValidationError>) {
        let mut agents = Vec::new();
        let mut issues = Vec::new();
        for name in &self.enabled_agents {
            match name.parse::<AgentKind>() {
                Ok(agent) if !agents.contains(&agent) => agents.push(agent),
                Ok(_) => {}
                Err(_) => issues.push(ConfigValidationError::UnknownAgent(name.clone())),
            }
        }
        (agents, issues)
    }

    pub(super) fn validate(&self) -> Vec<ConfigValidationError> {
        let (agents, mut issues) = self.parse_agents();
        if agents.is_empty() && issues.is_empty() {
            issues.push(ConfigValidationError::Empty {
                field: "workflow.enabled_agents",
            });
        }
        if self.max_steps < WorkflowConfig::MIN_STEPS {
            issues.push(ConfigValidationError::OutOfRange {
                field: "workflow.max_steps",
                value: self.max_steps.to_string(),
                expected: "at least 7 supersteps",
            });
        }
        if self.tool_timeout_seconds == 0 {
            issues.push(ConfigValidationError::Zero {
                field: "workflow.tool_timeout_seconds",
            });
        }
        if self.default_interface.parse::<Interface>().is_err() {
            issues.push(ConfigValidationError::UnknownInterface(
                self.default_interface.clone(),
            ));
        }
        issues
    }
}
