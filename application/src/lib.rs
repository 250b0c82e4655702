//! Application layer for book-seeker
//!
//! This crate contains the workflow engine, the use cases built on it, port
//! definitions, and runtime configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;
pub mod workflow;

// Re-export commonly used types
pub use config::WorkflowConfig;
pub use ports::{
    llm_gateway::{Completion, CompletionRequest, GatewayError, LlmGateway, invoke_with_timeout},
    observer::{CompositeObserver, NoObserver, RunStatus, TurnSummary, WorkflowObserver},
    session_store::{ConversationTurn, SessionError, SessionRecord, SessionStore},
    tool_backend::{BookCatalogPort, CapabilityError, FaqSearchPort},
};
pub use use_cases::agent_engine::{AgentEngine, AgentOutcome};
pub use use_cases::chat_turn::{
    ChatResponse, ChatTurnInput, ChatTurnOutput, ChatTurnUseCase, ChunkKind, TurnChunk,
};
pub use use_cases::explainer::RecommendationExplainer;
pub use use_cases::parameter_extractor::ParameterExtractor;
pub use use_cases::router::QueryRouter;
pub use use_cases::shared::AnalysisError;
pub use use_cases::state_manager::{StateManager, StateSummary};
pub use workflow::assembly::{WorkflowDeps, build_workflow};
pub use workflow::executor::{WorkflowExecutor, WorkflowRun};
pub use workflow::graph::{Edge, GraphBuilder, WorkflowError, WorkflowGraph};
pub use workflow::node::WorkflowNode;
pub use workflow::nodes::ToolError;
