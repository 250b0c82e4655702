//! Workflow node identifiers

use crate::agent::role::AgentKind;
use crate::core::error::DomainError;
use crate::tool::kind::ToolKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every node the workflow graph can contain.
///
/// The string forms are stable: they appear in routing decisions returned by
/// the language model, in message logs and in event logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NodeId {
    Router,
    ParameterExtraction,
    AgentCoordinator,
    Agent(AgentKind),
    Tool(ToolKind),
    MergeTools,
    FormatResponse,
    Error,
}

impl NodeId {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeId::Router => "router_node",
            NodeId::ParameterExtraction => "parameter_extraction",
            NodeId::AgentCoordinator => "agent_coordinator",
            NodeId::Agent(agent) => agent.as_str(),
            NodeId::Tool(tool) => tool.as_str(),
            NodeId::MergeTools => "merge_tools",
            NodeId::FormatResponse => "format_response",
            NodeId::Error => "error",
        }
    }

    /// Nodes after which the workflow ends
    pub fn is_terminal(&self) -> bool {
        matches!(self, NodeId::FormatResponse | NodeId::Error)
    }

    pub fn is_tool(&self) -> bool {
        matches!(self, NodeId::Tool(_))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NodeId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if let Ok(agent) = name.parse::<AgentKind>() {
            return Ok(NodeId::Agent(agent));
        }
        if let Ok(tool) = name.parse::<ToolKind>() {
            return Ok(NodeId::Tool(tool));
        }
        match name {
            "router_node" => Ok(NodeId::Router),
            "parameter_extraction" => Ok(NodeId::ParameterExtraction),
            "agent_coordinator" => Ok(NodeId::AgentCoordinator),
            "merge_tools" => Ok(NodeId::MergeTools),
            "format_response" => Ok(NodeId::FormatResponse),
            "error" => Ok(NodeId::Error),
            _ => Err(DomainError::UnknownNode(s.to_string())),
        }
    }
}

impl TryFrom<String> for NodeId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, DomainError> {
        value.parse()
    }
}

impl From<NodeId> for String {
    fn from(node: NodeId) -> Self {
        node.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        let nodes = [
            NodeId::Router,
            NodeId::ParameterExtraction,
            NodeId::AgentCoordinator,
            NodeId::Agent(AgentKind::General),
            NodeId::Agent(AgentKind::GeneralVoice),
            NodeId::Agent(AgentKind::Sales),
            NodeId::Tool(ToolKind::Faq),
            NodeId::Tool(ToolKind::BookRecommendation),
            NodeId::Tool(ToolKind::BookDetails),
            NodeId::MergeTools,
            NodeId::FormatResponse,
            NodeId::Error,
        ];
        for node in nodes {
            assert_eq!(node.as_str().parse::<NodeId>().unwrap(), node);
        }
    }

    #[test]
    fn test_unknown_node() {
        assert_eq!(
            "librarian".parse::<NodeId>(),
            Err(DomainError::UnknownNode("librarian".to_string()))
        );
    }

    #[test]
    fn test_terminal_nodes() {
        assert!(NodeId::FormatResponse.is_terminal());
        assert!(NodeId::Error.is_terminal());
        assert!(!NodeId::MergeTools.is_terminal());
    }

    #[test]
    fn test_serde_uses_string_form() {
        let json = serde_json::to_string(&NodeId::Tool(ToolKind::Faq)).unwrap();
        assert_eq!(json, "\"faq_tool\"");
        let node: NodeId = serde_json::from_str("\"agent_coordinator\"").unwrap();
        assert_eq!(node, NodeId::AgentCoordinator);
    }
    #[test]
    fn test_try_from_string() {
        assert_eq!(NodeId::try_from("error".to_string()), Ok(NodeId::Error));
        assert_eq!(
            NodeId::try_from("archive".to_string()),
            Err(DomainError::UnknownNode("archive".to_string()))
        );
    }
}
