//! Parameter extractor
//!
//! Pulls tool parameters out of the user's message with one structured
//! language model call. Failures are returned as errors; no fallback
//! values are synthesized.

use super::shared::AnalysisError;
use crate::ports::llm_gateway::{CompletionRequest, LlmGateway, invoke_with_timeout};
use seeker_domain::{ExtractedParameters, PromptTemplate};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub struct ParameterExtractor<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    timeout: Duration,
}

impl<G: LlmGateway + 'static> ParameterExtractor<G> {
    pub fn new(gateway: Arc<G>, timeout: Duration) -> Self {
        Self { gateway, timeout }
    }

    pub async fn extract(&self, message: &str) -> Result<ExtractedParameters, AnalysisError> {
        let request = CompletionRequest::structured(PromptTemplate::parameter_extraction_prompt(message));
        let completion = invoke_with_timeout(self.gateway.as_ref(), &request, self.timeout).await?;
        let params = ExtractedParameters::parse(&completion.content)?;
        debug!(?params, "Extracted parameters");
        Ok(params)
    }
}
