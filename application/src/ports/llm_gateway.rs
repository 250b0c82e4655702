//! LLM Gateway port
//!
//! Defines the interface for requesting completions from a language model.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// A single completion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub prompt: String,
    /// Ask the model for a JSON object
    pub structured: bool,
}

impl CompletionRequest {
    pub fn structured(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            structured: true,
        }
    }

    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            structured: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub content: String,
}

/// Gateway for language model completions
///
/// Implementations must return an error on transport failure; the
/// application layers no retry around this call.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Model identifier used for logging
    fn model_name(&self) -> &str;

    /// Request a completion
    async fn invoke(&self, request: &CompletionRequest) -> Result<Completion, GatewayError>;
}

/// Invoke the gateway once, failing with [`GatewayError::Timeout`] after `timeout`.
pub async fn invoke_with_timeout<G: LlmGateway + ?Sized>(
    gateway: &G,
    request: &CompletionRequest,
    timeout: Duration,
) -> Result<Completion, GatewayError> {
    match tokio::time::timeout(timeout, gateway.invoke(request)).await {
        Ok(result) => result,
        Err(_) => Err(GatewayError::Timeout),
    }
}
