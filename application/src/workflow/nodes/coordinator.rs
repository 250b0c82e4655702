use crate::workflow::node::WorkflowNode;
use async_trait::async_trait;
use seeker_domain::{
    AgentKind, AgentState, Command, FaultKind, Message, MessageKind, NodeId, RoutingError,
    SharedData,
};
use tracing::{info, warn};

/// Fans a multi-agent request out to its participating agents
pub struct CoordinatorNode {
    enabled_agents: Vec<AgentKind>,
}

impl CoordinatorNode {
    pub fn new(enabled_agents: Vec<AgentKind>) -> Self {
        Self { enabled_agents }
    }
}

#[async_trait]
impl WorkflowNode for CoordinatorNode {
    fn id(&self) -> NodeId {
        NodeId::AgentCoordinator
    }

    async fn run(&self, state: &AgentState) -> Command {
        let node = NodeId::AgentCoordinator;
        let Some(analysis) = state.shared_data.routing_analysis.as_ref() else {
            return Command::fault(node, FaultKind::Routing, RoutingError::MissingAnalysis.to_string());
        };

        let mut agents: Vec<AgentKind> = Vec::new();
        for name in &analysis.participating_agents {
            match name.parse::<AgentKind>() {
                Ok(agent) if self.enabled_agents.contains(&agent) => {
                    if !agents.contains(&agent) {
                        agents.push(agent);
                    }
                }
                _ => warn!(agent = %name, "Skipping unknown or disabled participant"),
            }
        }

        if agents.is_empty() {
            return Command::fault(node, FaultKind::Routing, RoutingError::NoParticipants.to_string());
        }

        let names: Vec<&str> = agents.iter().map(AgentKind::as_str).collect();
        info!(agents = ?names, "Coordinating agents");
        Command::new()
            .with_message(Message::ai(
                node,
                MessageKind::Coordination,
                format!("Coordinating agents: {}", names.join(", ")),
            ))
            .with_shared_data(SharedData {
                participating_agents_for_parallel: Some(agents),
                ..Default::default()
            })
            .with_current_agent(node.as_str())
    }
}
