use crate::workflow::node::WorkflowNode;
use async_trait::async_trait;
use seeker_domain::{AgentState, Command, Message, MessageKind, NodeId, ToolKind};
use tracing::info;

/// Join point of all tool and agent branches.
///
/// Results are already folded into state by the reducers as each branch
/// finishes; this node records what arrived.
pub struct MergeNode;

#[async_trait]
impl WorkflowNode for MergeNode {
    fn id(&self) -> NodeId {
        NodeId::MergeTools
    }

    async fn run(&self, state: &AgentState) -> Command {
        let results: Vec<&str> = ToolKind::all()
            .iter()
            .filter(|tool| state.agent_results.has(**tool))
            .map(ToolKind::as_str)
            .collect();
        let failures = state.shared_data.tool_failures.len();
        let notices = state.shared_data.agent_notices.len();
        info!(results = results.len(), failures, notices, "Merging tool results");

        Command::new()
            .with_message(
                Message::system(
                    NodeId::MergeTools,
                    MessageKind::Merge,
                    format!(
                        "Merged {} tool result(s), {} failure(s), {} notice(s)",
                        results.len(),
                        failures,
                        notices
                    ),
                )
                .with_metadata("results", results),
            )
            .with_current_agent(NodeId::MergeTools.as_str())
    }
}
