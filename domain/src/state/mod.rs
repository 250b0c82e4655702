//! Workflow state and its reducers
//!
//! [`AgentState`](entities::AgentState) is the only shared resource of a
//! request. It changes exclusively through [`Command`](command::Command)s,
//! folded in by [`AgentState::apply`](entities::AgentState::apply):
//!
//! | Field | Reducer |
//! |-------|---------|
//! | `messages` | append |
//! | `shared_data` | [`merge_shared_data`](shared::merge_shared_data) |
//! | `agent_results` | [`merge_agent_results`](results::merge_agent_results) |
//! | `current_agent` | latest wins |

pub mod command;
pub mod entities;
pub mod fault;
pub mod results;
pub mod shared;
