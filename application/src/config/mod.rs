//! Application-level configuration.
//!
//! - [`WorkflowConfig`]: timeouts, step budget, enabled agents and tool
//!   limits, built once and passed by reference into the workflow builder

pub mod workflow_config;

pub use workflow_config::WorkflowConfig;
