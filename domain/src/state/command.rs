//! Declarative state deltas emitted by workflow nodes

use super::entities::{Message, MessageKind};
use super::fault::{FaultKind, NodeFault};
use super::results::AgentResults;
use super::shared::SharedData;
use crate::routing::node::NodeId;

/// A state delta produced by one node execution.
///
/// Every field is optional; absent fields leave the corresponding part of
/// the state untouched when the command is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Command {
    pub messages: Vec<Message>,
    pub shared_data: Option<SharedData>,
    pub agent_results: Option<AgentResults>,
    pub current_agent: Option<String>,
}

impl Command {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_shared_data(mut self, shared_data: SharedData) -> Self {
        self.shared_data = Some(shared_data);
        self
    }

    pub fn with_agent_results(mut self, agent_results: AgentResults) -> Self {
        self.agent_results = Some(agent_results);
        self
    }

    pub fn with_current_agent(mut self, agent: impl Into<String>) -> Self {
        self.current_agent = Some(agent.into());
        self
    }

    /// A delta recording a fatal failure of `node`.
    ///
    /// The node's routing function sees the fault and sends the branch to `error`.
    pub fn fault(node: NodeId, kind: FaultKind, detail: impl Into<String>) -> Self {
        let fault = NodeFault::new(node, kind, detail);
        let message = Message::system(node, MessageKind::Error, fault.describe())
            .with_metadata("error_type", kind.as_str());
        Self::new().with_message(message).with_shared_data(SharedData {
            node_faults: vec![fault],
            ..Default::default()
        })
    }

    /// Whether applying this command changes nothing
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
            && self.shared_data.is_none()
            && self.agent_results.is_none()
            && self.current_agent.is_none()
    }
}
