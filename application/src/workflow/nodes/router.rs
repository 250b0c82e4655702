use crate::ports::llm_gateway::LlmGateway;
use crate::use_cases::router::QueryRouter;
use crate::workflow::node::WorkflowNode;
use async_trait::async_trait;
use seeker_domain::{AgentState, Command, FaultKind, Message, MessageKind, NodeId, SharedData};

pub struct RouterNode<G: LlmGateway + 'static> {
    router: QueryRouter<G>,
}

impl<G: LlmGateway + 'static> RouterNode<G> {
    pub fn new(router: QueryRouter<G>) -> Self {
        Self { router }
    }
}

#[async_trait]
impl<G: LlmGateway + 'static> WorkflowNode for RouterNode<G> {
    fn id(&self) -> NodeId {
        NodeId::Router
    }

    async fn run(&self, state: &AgentState) -> Command {
        let Some(query) = state.latest_user_message() else {
            return Command::fault(NodeId::Router, FaultKind::Validation, "no user message in state");
        };

        match self.router.analyze(query, state.interface).await {
            Ok(analysis) => {
                let message = Message::ai(
                    NodeId::Router,
                    MessageKind::Routing,
                    format!("Routing to {}", analysis.next_node),
                )
                .with_metadata("participating_agents", analysis.participating_agents.clone())
                .with_metadata("confidence", analysis.confidence);
                Command::new()
                    .with_message(message)
                    .with_shared_data(SharedData {
                        routing_analysis: Some(analysis),
                        ..Default::default()
                    })
                    .with_current_agent(NodeId::Router.as_str())
            }
            Err(e) => Command::fault(NodeId::Router, e.fault_kind(), e.to_string()),
        }
    }
}
