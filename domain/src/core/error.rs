//! Domain error types

use thiserror::Error;

/// Domain-level errors raised when parsing closed vocabularies
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown interface: {0}")]
    UnknownInterface(String),

    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

impl DomainError {
    /// The raw value that failed to parse
    pub fn value(&self) -> &str {
        match self {
            DomainError::UnknownInterface(v)
            | DomainError::UnknownNode(v)
            | DomainError::UnknownAgent(v)
            | DomainError::UnknownTool(v) => v,
        }
    }
}
