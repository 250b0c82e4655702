//! Workflow node abstraction

use async_trait::async_trait;
use seeker_domain::{AgentState, Command, NodeId};

/// One step of the workflow.
///
/// A node reads an immutable snapshot of the state and returns the delta it
/// produced. Failures are never returned: a node records them in its
/// [`Command`] (a node fault or a tool failure fragment) and its outgoing
/// edge decides where the branch goes.
#[async_trait]
pub trait WorkflowNode: Send + Sync {
    fn id(&self) -> NodeId;

    async fn run(&self, state: &AgentState) -> Command;
}
