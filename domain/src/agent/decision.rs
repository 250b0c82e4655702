//! Parsing and validation of an agent's tool selection

use super::role::AgentKind;
use crate::tool::kind::ToolKind;
use crate::util::{JsonPayloadError, extract_json_object};
use thiserror::Error;

/// Why an agent's structured reply was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentResponseError {
    #[error("agent response was empty")]
    Empty,

    #[error("agent response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("agent response is missing `{0}`")]
    MissingField(&'static str),

    #[error("agent response field `{0}` has the wrong type")]
    InvalidField(&'static str),

    #[error("confidence {0} is outside [0, 1]")]
    ConfidenceOutOfRange(f64),

    #[error("{agent} cannot use tool `{tool}`")]
    UndeclaredTool { agent: AgentKind, tool: String },
}

impl From<JsonPayloadError> for AgentResponseError {
    fn from(err: JsonPayloadError) -> Self {
        match err {
            JsonPayloadError::Empty => AgentResponseError::Empty,
            other => AgentResponseError::InvalidJson(other.to_string()),
        }
    }
}

/// A validated tool selection
#[derive(Debug, Clone, PartialEq)]
pub struct AgentDecision {
    pub selected_tools: Vec<ToolKind>,
    pub reasoning: String,
    pub confidence: f64,
}

impl AgentDecision {
    /// Parse `{selected_tools, reasoning, confidence}` and check it against `agent`.
    ///
    /// Confidence is not clamped here: a value outside [0, 1] rejects the reply,
    /// as does any tool the agent has not declared.
    pub fn parse(response: &str, agent: AgentKind) -> Result<Self, AgentResponseError> {
        let map = extract_json_object(response)?;

        let tools = map
            .get("selected_tools")
            .ok_or(AgentResponseError::MissingField("selected_tools"))?
            .as_array()
            .ok_or(AgentResponseError::InvalidField("selected_tools"))?;
        let reasoning = map
            .get("reasoning")
            .ok_or(AgentResponseError::MissingField("reasoning"))?
            .as_str()
            .ok_or(AgentResponseError::InvalidField("reasoning"))?;
        let confidence = map
            .get("confidence")
            .ok_or(AgentResponseError::MissingField("confidence"))?
            .as_f64()
            .ok_or(AgentResponseError::InvalidField("confidence"))?;

        if !(0.0..=1.0).contains(&confidence) {
            return Err(AgentResponseError::ConfidenceOutOfRange(confidence));
        }

        let mut selected_tools = Vec::with_capacity(tools.len());
        for tool in tools {
            let name = tool.as_str().ok_or(AgentResponseError::InvalidField("selected_tools"))?;
            let kind = name
                .parse::<ToolKind>()
                .ok()
                .filter(|kind| agent.available_tools().contains(kind))
                .ok_or_else(|| AgentResponseError::UndeclaredTool {
                    agent,
                    tool: name.to_string(),
                })?;
            if !selected_tools.contains(&kind) {
                selected_tools.push(kind);
            }
        }

        Ok(Self {
            selected_tools,
            reasoning: reasoning.trim().to_string(),
            confidence,
        })
    }
}
