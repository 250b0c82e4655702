//! Routing errors

use crate::state::entities::Interface;
use crate::util::JsonPayloadError;
use thiserror::Error;

/// An unroutable decision, either from the router itself or from a
/// conditional edge inspecting state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoutingError {
    #[error("routing response was empty")]
    EmptyResponse,

    #[error("routing response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("routing response is missing required field `next_node`")]
    MissingNextNode,

    #[error("agent `{agent}` cannot serve the {interface} interface")]
    IncompatibleAgent { agent: String, interface: Interface },

    #[error("agent `{0}` is not enabled")]
    DisabledAgent(String),

    #[error("no routing analysis in state")]
    MissingAnalysis,

    #[error("unknown routing target `{0}`")]
    UnknownTarget(String),

    #[error("no participating agents to coordinate")]
    NoParticipants,

    #[error("{0} has no executable tools")]
    NoExecutableTools(String),

    #[error("routing function panicked: {0}")]
    Panicked(String),
}

impl From<JsonPayloadError> for RoutingError {
    fn from(err: JsonPayloadError) -> Self {
        match err {
            JsonPayloadError::Empty => RoutingError::EmptyResponse,
            other => RoutingError::InvalidJson(other.to_string()),
        }
    }
}
