//! Port definitions (interfaces for external systems)
//!
//! Ports define the boundaries between the application and the outside world.
//! Adapters implementing them live in the infrastructure layer.

pub mod llm_gateway;
pub mod observer;
pub mod session_store;
pub mod tool_backend;
