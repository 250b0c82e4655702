//! Shared types for the analysis use cases

use crate::ports::llm_gateway::GatewayError;
use seeker_domain::{ExtractionError, FaultKind, RoutingError, StateError};
use thiserror::Error;

/// Fatal failure of an analysis step
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid state: {0}")]
    State(#[from] StateError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Routing error: {0}")]
    Routing(#[from] RoutingError),

    #[error("Parameter extraction error: {0}")]
    Extraction(#[from] ExtractionError),
}

impl AnalysisError {
    /// Taxonomy bucket recorded with the node fault
    pub fn fault_kind(&self) -> FaultKind {
        match self {
            AnalysisError::State(_) | AnalysisError::Extraction(_) => FaultKind::Validation,
            AnalysisError::Gateway(_) => FaultKind::ExternalCall,
            AnalysisError::Routing(_) => FaultKind::Routing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_kinds() {
        assert_eq!(
            AnalysisError::from(GatewayError::Timeout).fault_kind(),
            FaultKind::ExternalCall
        );
        assert_eq!(
            AnalysisError::from(RoutingError::MissingNextNode).fault_kind(),
            FaultKind::Routing
        );
        assert_eq!(
            AnalysisError::from(StateError::EmptySessionId).fault_kind(),
            FaultKind::Validation
        );
    }
}
