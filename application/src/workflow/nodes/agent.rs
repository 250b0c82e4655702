use crate::ports::llm_gateway::LlmGateway;
use crate::use_cases::agent_engine::{AgentEngine, AgentOutcome};
use crate::workflow::node::WorkflowNode;
use async_trait::async_trait;
use seeker_domain::{
    AgentInsight, AgentKind, AgentNotice, AgentState, Command, Message, MessageKind, NodeId,
    SharedData, ToolKind,
};
use std::sync::Arc;

/// One agent of the closed agent set, backed by the shared engine
pub struct AgentNode<G: LlmGateway + 'static> {
    agent: AgentKind,
    engine: Arc<AgentEngine<G>>,
}

impl<G: LlmGateway + 'static> AgentNode<G> {
    pub fn new(agent: AgentKind, engine: Arc<AgentEngine<G>>) -> Self {
        Self { agent, engine }
    }
}

#[async_trait]
impl<G: LlmGateway + 'static> WorkflowNode for AgentNode<G> {
    fn id(&self) -> NodeId {
        NodeId::Agent(self.agent)
    }

    async fn run(&self, state: &AgentState) -> Command {
        let node = self.id();
        let role = self.agent.define_role().role;

        match self.engine.handle(self.agent, state).await {
            Ok(AgentOutcome::Selected(decision)) => {
                let tools: Vec<&str> = decision.selected_tools.iter().map(ToolKind::as_str).collect();
                let message = Message::ai(
                    node,
                    MessageKind::AgentAnalysis,
                    format!("{role}: Selected tools: {}", tools.join(", ")),
                )
                .with_metadata("confidence", decision.confidence);

                Command::new()
                    .with_message(message)
                    .with_shared_data(SharedData {
                        current_agent_role: Some(self.agent),
                        agent_insights: vec![AgentInsight::from_decision(self.agent, &decision)],
                        selected_tools_for_parallel: Some(decision.selected_tools),
                        ..Default::default()
                    })
                    .with_current_agent(self.agent.as_str())
            }
            Ok(AgentOutcome::NoSuitableTool(detail)) => {
                let notice = AgentNotice::no_suitable_tool(self.agent, detail);
                let mut message = Message::ai(node, MessageKind::AgentNotice, notice.message.clone());
                if let Some(detail) = &notice.detail {
                    message = message.with_metadata("detail", detail.clone());
                }
                Command::new()
                    .with_message(message)
                    .with_shared_data(SharedData {
                        current_agent_role: Some(self.agent),
                        agent_notices: vec![notice],
                        ..Default::default()
                    })
                    .with_current_agent(self.agent.as_str())
            }
            Err(e) => Command::fault(node, e.fault_kind(), e.to_string()),
        }
    }
}
