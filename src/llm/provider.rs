use async_trait::async_trait;
use crate::errors::PerfError;
use super::types::{LLMResponse, Message};

#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Chat completion over an ordered list of role-tagged messages.
    ///
    /// Implementations must report HTTP 429 as `PerfError::RateLimit` so the
    /// enrichment loop can back off and retry.
    async fn chat(&self, messages: &[Message]) -> Result<LLMResponse, PerfError>;

    /// Provider name for logging
    fn provider_name(&self) -> &str;

    /// Model identifier
    fn model_name(&self) -> &str;
}
