//! Workflow state entities

use super::command::Command;
use super::results::{AgentResults, merge_agent_results};
use super::shared::{SharedData, merge_shared_data};
use crate::core::error::DomainError;
use crate::routing::node::NodeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Name of the node every request starts at
pub const INITIAL_AGENT: &str = "router";

/// Channel the request arrived on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interface {
    #[default]
    Chat,
    Voice,
}

impl Interface {
    pub fn all() -> [Interface; 2] {
        [Interface::Chat, Interface::Voice]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Interface::Chat => "chat",
            Interface::Voice => "voice",
        }
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Interface {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chat" => Ok(Interface::Chat),
            "voice" => Ok(Interface::Voice),
            _ => Err(DomainError::UnknownInterface(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    Human,
    Ai,
    System,
    Tool,
}

/// What a message in the log represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    UserInput,
    Routing,
    Parameters,
    Coordination,
    AgentAnalysis,
    AgentNotice,
    ToolResult,
    ToolError,
    Merge,
    FinalResponse,
    Error,
}

/// One entry of the append-only message log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl Message {
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Human,
            content: content.into(),
            kind: MessageKind::UserInput,
            node: None,
            metadata: Map::new(),
        }
    }

    pub fn ai(node: NodeId, kind: MessageKind, content: impl Into<String>) -> Self {
        Self::from_node(MessageRole::Ai, node, kind, content)
    }

    pub fn system(node: NodeId, kind: MessageKind, content: impl Into<String>) -> Self {
        Self::from_node(MessageRole::System, node, kind, content)
    }

    pub fn tool(node: NodeId, content: impl Into<String>) -> Self {
        Self::from_node(MessageRole::Tool, node, MessageKind::ToolResult, content)
    }

    fn from_node(role: MessageRole, node: NodeId, kind: MessageKind, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            kind,
            node: Some(node),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

/// Structural problems with an [`AgentState`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("session_id must not be empty")]
    EmptySessionId,

    #[error("current_agent must not be empty")]
    EmptyCurrentAgent,

    #[error(transparent)]
    Interface(#[from] DomainError),

    #[error("no user message in state")]
    NoUserMessage,
}

/// Per-request root state threaded through every workflow node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub session_id: String,
    pub interface: Interface,
    pub current_agent: String,
    pub messages: Vec<Message>,
    pub shared_data: SharedData,
    pub agent_results: AgentResults,
    pub created_at: DateTime<Utc>,
}

impl AgentState {
    /// Create the initial state for a request.
    ///
    /// Fails when `interface` is not one of `chat` / `voice` or the session id is blank.
    pub fn initial(session_id: &str, interface: &str, message: &str) -> Result<Self, StateError> {
        let interface = interface.parse::<Interface>()?;
        let state = Self {
            session_id: session_id.trim().to_string(),
            interface,
            current_agent: INITIAL_AGENT.to_string(),
            messages: vec![Message::human(message)],
            shared_data: SharedData::default(),
            agent_results: AgentResults::default(),
            created_at: Utc::now(),
        };
        state.validate()?;
        Ok(state)
    }

    /// Check the structural invariants of the state.
    ///
    /// Interface and sub-object types are enforced by construction, so only
    /// the string fields need checking here.
    pub fn validate(&self) -> Result<(), StateError> {
        if self.session_id.trim().is_empty() {
            return Err(StateError::EmptySessionId);
        }
        if self.current_agent.trim().is_empty() {
            return Err(StateError::EmptyCurrentAgent);
        }
        Ok(())
    }

    /// Content of the most recent human message
    pub fn latest_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::Human)
            .map(|m| m.content.as_str())
    }

    /// Fold a node's delta into the state through the declared reducers.
    pub fn apply(&mut self, command: Command) {
        let Command {
            messages,
            shared_data,
            agent_results,
            current_agent,
        } = command;

        self.messages.extend(messages);
        if let Some(delta) = shared_data {
            self.shared_data = merge_shared_data(&self.shared_data, &delta);
        }
        if let Some(delta) = agent_results {
            self.agent_results = merge_agent_results(&self.agent_results, &delta);
        }
        if let Some(agent) = current_agent {
            self.current_agent = agent;
        }
    }

    /// Whether a fatal fault has been recorded for `node`
    pub fn has_fault(&self, node: NodeId) -> bool {
        self.shared_data.node_faults.iter().any(|f| f.node == node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::insight::AgentInsight;
    use crate::tool::faq::FaqOutput;
    use crate::tool::kind::ToolKind;

    #[test]
    fn test_initial_state_is_valid_for_every_interface() {
        for interface in Interface::all() {
            let state = AgentState::initial("session-1", interface.as_str(), "hello").unwrap();
            assert!(state.validate().is_ok());
            assert_eq!(state.interface, interface);
            assert_eq!(state.current_agent, INITIAL_AGENT);
            assert_eq!(state.latest_user_message(), Some("hello"));
        }
    }

    #[test]
    fn test_initial_state_rejects_unknown_interface() {
        let err = AgentState::initial("s", "fax", "hi").unwrap_err();
        assert_eq!(
            err,
            StateError::Interface(DomainError::UnknownInterface("fax".to_string()))
        );
    }

    #[test]
    fn test_initial_state_rejects_blank_session() {
        assert_eq!(
            AgentState::initial("  ", "chat", "hi").unwrap_err(),
            StateError::EmptySessionId
        );
    }

    #[test]
    fn test_interface_parse_is_case_insensitive() {
        assert_eq!(" Voice ".parse::<Interface>().unwrap(), Interface::Voice);
    }

    #[test]
    fn test_apply_appends_messages_and_merges() {
        let mut state = AgentState::initial("s", "chat", "hi").unwrap();
        let insight = AgentInsight {
            agent_name: "general_agent".to_string(),
            role: "General Query Handler".to_string(),
            query_analysis: "Query requires faq_tool".to_string(),
            selected_tools: vec![ToolKind::Faq],
            reasoning: "policy question".to_string(),
            confidence: 0.9,
        };

        state.apply(
            Command::new()
                .with_message(Message::ai(NodeId::Router, MessageKind::Routing, "routed"))
                .with_shared_data(SharedData {
                    agent_insights: vec![insight],
                    ..Default::default()
                })
                .with_agent_results(AgentResults {
                    faq: Some(FaqOutput::from_matches(Vec::new())),
                    ..Default::default()
                })
                .with_current_agent("general_agent"),
        );

        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.shared_data.agent_insights.len(), 1);
        assert!(state.agent_results.faq.is_some());
        assert_eq!(state.current_agent, "general_agent");
    }

    #[test]
    fn test_apply_does_not_deduplicate_messages() {
        let mut state = AgentState::initial("s", "chat", "hi").unwrap();
        let message = Message::ai(NodeId::MergeTools, MessageKind::Merge, "merged");
        state.apply(Command::new().with_message(message.clone()));
        state.apply(Command::new().with_message(message));
        assert_eq!(state.messages.len(), 3);
    }
}
