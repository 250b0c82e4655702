//! Domain layer for book-seeker
//!
//! This crate contains the workflow state model, its merge reducers and the
//! pure decision rules the workflow engine is built from. It has no
//! dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Workflow state
//!
//! A request is carried by a single [`AgentState`]. Nodes never mutate it in
//! place: each node emits a [`Command`] (a delta) which the executor folds into
//! the state through the reducers in [`state`].
//!
//! ## Routing
//!
//! - **Router**: decides which agent(s) handle a query ([`RoutingAnalysis`])
//! - **Agents**: a closed set of roles ([`AgentKind`]) that select tools
//! - **Tools**: business units whose typed results land in [`AgentResults`]

pub mod agent;
pub mod core;
pub mod params;
pub mod prompt;
pub mod response;
pub mod routing;
pub mod state;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use agent::{
    decision::{AgentDecision, AgentResponseError},
    insight::{AgentInsight, AgentNotice},
    role::{AgentKind, AgentProfile, AgentRole, RouterContext},
};
pub use core::error::DomainError;
pub use params::extraction::{ExtractedParameters, ExtractionError};
pub use prompt::{AgentGuidance, PromptTemplate};
pub use response::formatter::{
    FALLBACK_APOLOGY, FormattedResponse, NO_RESULTS_TEXT, extract_display_text,
    format_final_response,
};
pub use routing::{
    analysis::{QueryIntents, RoutingAnalysis},
    error::RoutingError,
    node::NodeId,
};
pub use state::{
    command::Command,
    entities::{AgentState, Interface, Message, MessageKind, MessageRole, StateError},
    fault::{FaultKind, NodeFault},
    results::{AgentResults, merge_agent_results},
    shared::{NodeMetrics, SharedData, merge_shared_data},
};
pub use tool::{
    book::{
        BookDetailsOutput, BookLookup, BookRecommendation, BookRecord, BookSearchCriteria,
        RecommendationOutput,
    },
    failure::{ToolFailure, ToolFailureKind},
    faq::{FaqEntry, FaqMatch, FaqOutput, MatchSource},
    kind::ToolKind,
};
