//! Wires nodes and edges into the book-seeker workflow.

use super::executor::WorkflowExecutor;
use super::graph::{GraphBuilder, WorkflowError};
use super::nodes::agent::AgentNode;
use super::nodes::book_details::BookDetailsToolNode;
use super::nodes::coordinator::CoordinatorNode;
use super::nodes::error::ErrorNode;
use super::nodes::faq::FaqToolNode;
use super::nodes::format::FormatResponseNode;
use super::nodes::merge::MergeNode;
use super::nodes::parameters::ParameterNode;
use super::nodes::recommendation::RecommendationToolNode;
use super::nodes::router::RouterNode;
use super::routing::{
    route_after_agent, route_after_coordinator, route_after_parameters, route_after_router,
};
use crate::config::WorkflowConfig;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::tool_backend::{BookCatalogPort, FaqSearchPort};
use crate::use_cases::agent_engine::AgentEngine;
use crate::use_cases::explainer::RecommendationExplainer;
use crate::use_cases::parameter_extractor::ParameterExtractor;
use crate::use_cases::router::QueryRouter;
use seeker_domain::{NodeId, ToolKind};
use std::sync::Arc;
use tracing::debug;

/// External capabilities the workflow depends on
pub struct WorkflowDeps<G: LlmGateway + 'static> {
    pub gateway: Arc<G>,
    pub faq: Arc<dyn FaqSearchPort>,
    pub catalog: Arc<dyn BookCatalogPort>,
}

impl<G: LlmGateway + 'static> Clone for WorkflowDeps<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            faq: Arc::clone(&self.faq),
            catalog: Arc::clone(&self.catalog),
        }
    }
}

/// Build the executor for `config`.
///
/// Only enabled agents get a node; tool nodes are registered for every tool
/// an enabled agent may select.
pub fn build_workflow<G: LlmGateway + 'static>(
    deps: WorkflowDeps<G>,
    config: &WorkflowConfig,
) -> Result<WorkflowExecutor, WorkflowError> {
    let agents = config.enabled_agents.clone();
    let mut tools: Vec<ToolKind> = Vec::new();
    for tool in agents.iter().flat_map(|a| a.available_tools()) {
        if !tools.contains(tool) {
            tools.push(*tool);
        }
    }
    debug!(agents = ?agents, tools = ?tools, "Assembling workflow");

    let router = QueryRouter::new(Arc::clone(&deps.gateway), agents.clone(), config.llm_timeout);
    let extractor = ParameterExtractor::new(Arc::clone(&deps.gateway), config.llm_timeout);
    let engine = Arc::new(AgentEngine::new(Arc::clone(&deps.gateway), config.llm_timeout));

    let mut builder = GraphBuilder::new()
        .set_entry(NodeId::Router)
        .add_node(Arc::new(RouterNode::new(router)))
        .add_node(Arc::new(ParameterNode::new(extractor)))
        .add_node(Arc::new(CoordinatorNode::new(agents.clone())))
        .add_node(Arc::new(MergeNode))
        .add_node(Arc::new(FormatResponseNode))
        .add_node(Arc::new(ErrorNode))
        .add_conditional_edges(
            NodeId::Router,
            vec![NodeId::ParameterExtraction, NodeId::Error],
            route_after_router,
        );

    let mut dispatch: Vec<NodeId> = agents.iter().map(|a| NodeId::Agent(*a)).collect();
    let coordinated = dispatch.clone();
    dispatch.extend([NodeId::AgentCoordinator, NodeId::Error]);
    builder = builder
        .add_conditional_edges(NodeId::ParameterExtraction, dispatch, route_after_parameters)
        .add_conditional_edges(
            NodeId::AgentCoordinator,
            coordinated.into_iter().chain([NodeId::Error]).collect(),
            route_after_coordinator,
        );

    for agent in &agents {
        let mut targets: Vec<NodeId> = agent
            .available_tools()
            .iter()
            .map(|t| NodeId::Tool(*t))
            .collect();
        targets.extend([NodeId::MergeTools, NodeId::Error]);
        builder = builder
            .add_node(Arc::new(AgentNode::new(*agent, Arc::clone(&engine))))
            .add_conditional_edges(NodeId::Agent(*agent), targets, route_after_agent(*agent));
    }

    for tool in &tools {
        builder = match tool {
            ToolKind::Faq => builder.add_node(Arc::new(FaqToolNode::new(
                Arc::clone(&deps.faq),
                config.faq_top_k,
                config.faq_similarity_threshold,
                config.tool_timeout,
            ))),
            ToolKind::BookRecommendation => builder.add_node(Arc::new(RecommendationToolNode::new(
                Arc::clone(&deps.catalog),
                RecommendationExplainer::new(
                    Arc::clone(&deps.gateway),
                    config.llm_timeout,
                    config.explanation_batch_size,
                )
                .with_budget(config.tool_timeout),
                config.max_recommendations,
                config.tool_timeout,
            ))),
            ToolKind::BookDetails => builder.add_node(Arc::new(BookDetailsToolNode::new(
                Arc::clone(&deps.catalog),
                config.tool_timeout,
            ))),
        };
        builder = builder.add_edge(NodeId::Tool(*tool), NodeId::MergeTools);
    }

    let graph = builder
        .add_edge(NodeId::MergeTools, NodeId::FormatResponse)
        .add_end(NodeId::FormatResponse)
        .add_end(NodeId::Error)
        .compile()?;
    Ok(WorkflowExecutor::new(graph, config.max_steps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::observer::{NoObserver, RunStatus};
    use crate::workflow::nodes::test_support::{
        FakeCatalog, FakeFaq, KeyedGateway, ScriptedGateway, book,
    };
    use seeker_domain::{
        AgentKind, AgentState, FALLBACK_APOLOGY, FaqEntry, FaqMatch, Interface, MessageKind,
    };

    fn deps<G: LlmGateway + 'static>(gateway: G, faq: FakeFaq) -> WorkflowDeps<G> {
        deps_with_catalog(
            gateway,
            faq,
            FakeCatalog {
                books: vec![book(1, "Dragon Rider", 8, 12)],
                ..Default::default()
            },
        )
    }

    fn deps_with_catalog<G: LlmGateway + 'static>(
        gateway: G,
        faq: FakeFaq,
        catalog: FakeCatalog,
    ) -> WorkflowDeps<G> {
        WorkflowDeps {
            gateway: Arc::new(gateway),
            faq: Arc::new(faq),
            catalog: Arc::new(catalog),
        }
    }

    fn hours_faq() -> FakeFaq {
        FakeFaq {
            semantic: vec![FaqMatch::semantic(
                FaqEntry {
                    category: "store".to_string(),
                    question: "What are your opening hours?".to_string(),
                    answer: "9 to 6 every day.".to_string(),
                },
                0.9,
            )],
            ..Default::default()
        }
    }

    #[test]
    fn test_graph_only_registers_enabled_agents() {
        let executor = build_workflow(
            deps(ScriptedGateway::ok(&[]), FakeFaq::default()),
            &WorkflowConfig::default(),
        )
        .unwrap();
        let graph = executor.graph();
        assert!(graph.contains(NodeId::Agent(AgentKind::General)));
        assert!(!graph.contains(NodeId::Agent(AgentKind::Sales)));
        assert!(!graph.contains(NodeId::Tool(ToolKind::BookDetails)));
        assert!(graph.contains(NodeId::Tool(ToolKind::Faq)));
    }

    #[tokio::test]
    async fn test_missing_next_node_ends_in_apology() {
        let gateway = ScriptedGateway::ok(&[r#"{"participating_agents": ["general_agent"]}"#]);
        let executor =
            build_workflow(deps(gateway, FakeFaq::default()), &WorkflowConfig::default()).unwrap();

        let state = AgentState::initial("s-1", "chat", "hello").unwrap();
        let run = executor.run(state, &NoObserver).await;

        assert_eq!(run.status, RunStatus::Failed);
        assert_eq!(run.response, FALLBACK_APOLOGY);
        assert_eq!(run.visited, vec![NodeId::Router, NodeId::Error]);
        assert_eq!(run.error_type.as_deref(), Some("routing"));
    }

    #[tokio::test]
    async fn test_one_tool_fails_other_succeeds() {
        let gateway = ScriptedGateway::ok(&[
            r#"{"next_node": "general_agent", "participating_agents": ["general_agent"], "confidence": 0.9}"#,
            r#"{"faq_query": "opening hours", "age": 9}"#,
            r#"{"selected_tools": ["faq_tool", "book_recommendation_tool"], "reasoning": "two needs", "confidence": 0.8}"#,
        ]);
        let offline = FakeCatalog {
            fail: true,
            ..Default::default()
        };
        let executor = build_workflow(
            deps_with_catalog(gateway, hours_faq(), offline),
            &WorkflowConfig::default(),
        )
        .unwrap();

        let state = AgentState::initial("s-1", "chat", "opening hours, and a book for my 9 year old?").unwrap();
        let run = executor.run(state, &NoObserver).await;

        assert_eq!(run.status, RunStatus::Completed);
        assert!(!run.visited.contains(&NodeId::Error));
        assert_eq!(
            run.response,
            "Q: What are your opening hours?\nA: 9 to 6 every day.\n\nBook recommendation tool failed: Capability unavailable: catalog offline"
        );
    }

    #[tokio::test]
    async fn test_coordinator_fans_out_to_both_agents() {
        let gateway = KeyedGateway::new(&[
            (
                "You route customer requests",
                r#"{"next_node": "agent_coordinator", "participating_agents": ["general_agent", "sales_agent"], "is_multi_agent": true, "confidence": 0.85}"#,
            ),
            (
                "Extract tool parameters",
                r#"{"faq_query": "opening hours", "title": "Dragon Rider"}"#,
            ),
            (
                "You are a General Query Handler",
                r#"{"selected_tools": ["faq_tool"], "reasoning": "store hours", "confidence": 0.9}"#,
            ),
            (
                "You are a Sales Specialist",
                r#"{"selected_tools": ["book_details_tool"], "reasoning": "price and stock", "confidence": 0.9}"#,
            ),
        ]);
        let config = WorkflowConfig::default()
            .with_enabled_agents(vec![AgentKind::General, AgentKind::Sales])
            .with_max_steps(WorkflowConfig::MIN_STEPS);
        let executor = build_workflow(deps(gateway, hours_faq()), &config).unwrap();
        assert!(executor.graph().contains(NodeId::Tool(ToolKind::BookDetails)));

        let state = AgentState::initial(
            "s-1",
            "chat",
            "When are you open, and is Dragon Rider in stock?",
        )
        .unwrap();
        let run = executor.run(state, &NoObserver).await;

        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.steps, WorkflowConfig::MIN_STEPS);
        assert!(run.visited.contains(&NodeId::AgentCoordinator));
        assert!(run.visited.contains(&NodeId::Agent(AgentKind::General)));
        assert!(run.visited.contains(&NodeId::Agent(AgentKind::Sales)));
        assert_eq!(
            run.visited
                .iter()
                .filter(|n| **n == NodeId::FormatResponse)
                .count(),
            1
        );
        assert!(run.response.contains("A: 9 to 6 every day."));
        assert!(run.response.contains("Dragon Rider"));
        assert!(run.response.contains("3 in stock"));

        let results = &run.state.agent_results;
        assert!(results.faq.is_some());
        assert!(results.book_details.is_some());
    }

    #[tokio::test]
    async fn test_undeclared_tool_ends_on_notice_path() {
        let gateway = ScriptedGateway::ok(&[
            r#"{"next_node": "general_agent", "confidence": 0.9}"#,
            r#"{"title": "Matilda"}"#,
            r#"{"selected_tools": ["book_details_tool"], "reasoning": "price question", "confidence": 0.9}"#,
        ]);
        let executor =
            build_workflow(deps(gateway, FakeFaq::default()), &WorkflowConfig::default()).unwrap();

        let state = AgentState::initial("s-1", "chat", "how much is Matilda?").unwrap();
        let run = executor.run(state, &NoObserver).await;

        assert_eq!(run.status, RunStatus::Completed);
        assert!(!run.visited.contains(&NodeId::Error));
        assert!(!run.visited.iter().any(NodeId::is_tool));
        assert_eq!(
            run.response,
            "General Query Handler: No suitable tools found for this query"
        );
    }

    #[tokio::test]
    async fn test_voice_request_reaches_voice_agent_only() {
        let gateway = ScriptedGateway::ok(&[
            r#"{"next_node": "general_voice_agent", "participating_agents": ["general_voice_agent", "general_agent"], "is_multi_agent": true, "confidence": 0.8}"#,
            r#"{"age": 9}"#,
            r#"{"selected_tools": ["book_recommendation_tool"], "reasoning": "wants a book", "confidence": 0.9}"#,
            "[BOOK_ID:1]\na soaring dragon adventure.\n[/BOOK_ID]",
        ]);
        let executor =
            build_workflow(deps(gateway, FakeFaq::default()), &WorkflowConfig::default()).unwrap();

        let state = AgentState::initial("s-1", Interface::Voice.as_str(), "a book for my 9 year old").unwrap();
        let run = executor.run(state, &NoObserver).await;

        let analysis = run.state.shared_data.routing_analysis.as_ref().unwrap();
        assert_eq!(analysis.participating_agents, vec!["general_voice_agent"]);
        assert!(!run.visited.contains(&NodeId::Agent(AgentKind::General)));
        assert_eq!(run.status, RunStatus::Completed);
        assert!(run.response.contains("Dragon Rider"));
        assert!(
            run.state
                .messages
                .iter()
                .any(|m| m.kind == MessageKind::ToolResult)
        );
    }
}
