//! Use cases (application business logic)
//!
//! The analysis steps (router, parameter extractor, agent engine, explainer)
//! each make exactly one bounded language model call per invocation. The
//! chat turn drives a whole request through the workflow graph.

pub mod agent_engine;
pub mod chat_turn;
pub mod explainer;
pub mod parameter_extractor;
pub mod router;
pub mod shared;
pub mod state_manager;
