use crate::workflow::node::WorkflowNode;
use async_trait::async_trait;
use seeker_domain::{
    AgentState, Command, FALLBACK_APOLOGY, FaultKind, Message, MessageKind, NodeId,
};
use serde_json::json;
use tracing::error;

/// Absorbing failure sink: apology plus a structured diagnostic
pub struct ErrorNode;

#[async_trait]
impl WorkflowNode for ErrorNode {
    fn id(&self) -> NodeId {
        NodeId::Error
    }

    async fn run(&self, state: &AgentState) -> Command {
        let faults = &state.shared_data.node_faults;
        let error_type = faults
            .first()
            .map(|f| f.kind)
            .unwrap_or(FaultKind::Routing)
            .as_str();
        error!(
            session_id = %state.session_id,
            error_type,
            faults = faults.len(),
            "Workflow branch ended in error"
        );

        let diagnostic = json!({
            "error_type": error_type,
            "faults": faults.iter().map(|f| f.describe()).collect::<Vec<_>>(),
            "current_agent": state.current_agent,
        });
        Command::new()
            .with_message(
                Message::ai(NodeId::Error, MessageKind::Error, FALLBACK_APOLOGY)
                    .with_metadata("diagnostic", diagnostic),
            )
            .with_current_agent(NodeId::Error.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_apology_with_diagnostic() {
        let mut state = AgentState::initial("s-1", "chat", "hi").unwrap();
        state.apply(Command::fault(NodeId::Router, FaultKind::Routing, "missing next_node"));

        let command = ErrorNode.run(&state).await;
        let message = &command.messages[0];
        assert_eq!(message.content, FALLBACK_APOLOGY);
        assert_eq!(message.metadata["diagnostic"]["error_type"], "routing");
        assert_eq!(message.metadata["diagnostic"]["faults"].as_array().unwrap().len(), 1);
    }
}
