//! Workflow graph engine
//!
//! Nodes ([`node::WorkflowNode`]) emit [`seeker_domain::Command`] deltas;
//! edges ([`graph::Edge`]) decide where a branch goes next; the
//! [`executor::WorkflowExecutor`] runs the graph in supersteps and folds
//! every delta into the request state.

pub mod assembly;
pub mod executor;
pub mod graph;
pub mod node;
pub mod nodes;
pub mod routing;
