use crate::ports::llm_gateway::LlmGateway;
use crate::use_cases::parameter_extractor::ParameterExtractor;
use crate::workflow::node::WorkflowNode;
use async_trait::async_trait;
use seeker_domain::{AgentState, Command, FaultKind, Message, MessageKind, NodeId, SharedData};

pub struct ParameterNode<G: LlmGateway + 'static> {
    extractor: ParameterExtractor<G>,
}

impl<G: LlmGateway + 'static> ParameterNode<G> {
    pub fn new(extractor: ParameterExtractor<G>) -> Self {
        Self { extractor }
    }
}

#[async_trait]
impl<G: LlmGateway + 'static> WorkflowNode for ParameterNode<G> {
    fn id(&self) -> NodeId {
        NodeId::ParameterExtraction
    }

    async fn run(&self, state: &AgentState) -> Command {
        let node = NodeId::ParameterExtraction;
        let Some(message) = state.latest_user_message() else {
            return Command::fault(node, FaultKind::Validation, "no user message in state");
        };

        match self.extractor.extract(message).await {
            Ok(params) => {
                let summary = Message::ai(node, MessageKind::Parameters, "Parameters extracted")
                    .with_metadata(
                        "parameters",
                        serde_json::to_value(&params).unwrap_or_default(),
                    );
                Command::new()
                    .with_message(summary)
                    .with_shared_data(SharedData {
                        extracted_parameters: Some(params),
                        ..Default::default()
                    })
                    .with_current_agent(node.as_str())
            }
            Err(e) => Command::fault(node, e.fault_kind(), e.to_string()),
        }
    }
}
