//! Prompt domain
//!
//! Templates for the router, the parameter extractor, the recommendation
//! explainer and the agent analysis prompts.

pub mod guidance;
mod template;

pub use guidance::AgentGuidance;
pub use template::PromptTemplate;
