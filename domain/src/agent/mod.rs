//! Agent domain module
//!
//! Agents are a closed set of roles. Each [`AgentKind`](role::AgentKind)
//! maps to a static [`AgentProfile`](role::AgentProfile) holding its role
//! metadata, declared tools, supported interfaces and prompt builder.

pub mod decision;
pub mod insight;
pub mod role;
