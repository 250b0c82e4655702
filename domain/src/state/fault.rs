//! Fatal node failures recorded in state

use crate::routing::node::NodeId;
use serde::{Deserialize, Serialize};

/// Error taxonomy for failures that end a branch in `error`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// Malformed state or schema
    Validation,
    /// Language model or capability transport failure
    ExternalCall,
    /// Unroutable decision
    Routing,
    /// A node task panicked or the step budget ran out
    Internal,
}

impl FaultKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultKind::Validation => "validation",
            FaultKind::ExternalCall => "external_call",
            FaultKind::Routing => "routing",
            FaultKind::Internal => "internal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFault {
    pub node: NodeId,
    pub kind: FaultKind,
    pub detail: String,
}

impl NodeFault {
    pub fn new(node: NodeId, kind: FaultKind, detail: impl Into<String>) -> Self {
        Self {
            node,
            kind,
            detail: detail.into(),
        }
    }

    pub fn describe(&self) -> String {
        format!("{} failed ({}): {}", self.node, self.kind.as_str(), self.detail)
    }
}
