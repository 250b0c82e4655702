use crate::workflow::node::WorkflowNode;
use async_trait::async_trait;
use seeker_domain::{
    AgentState, Command, Message, MessageKind, NodeId, format_final_response,
};

/// Renders the merged results into the reply text
pub struct FormatResponseNode;

#[async_trait]
impl WorkflowNode for FormatResponseNode {
    fn id(&self) -> NodeId {
        NodeId::FormatResponse
    }

    async fn run(&self, state: &AgentState) -> Command {
        let formatted = format_final_response(
            &state.agent_results,
            &state.shared_data.tool_failures,
            &state.shared_data.agent_notices,
        );
        let message = Message::ai(NodeId::FormatResponse, MessageKind::FinalResponse, formatted.text.clone())
            .with_metadata("formatted", serde_json::to_value(&formatted).unwrap_or_default());
        Command::new()
            .with_message(message)
            .with_current_agent(NodeId::FormatResponse.as_str())
    }
}
