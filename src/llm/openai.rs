use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use crate::errors::PerfError;
use super::provider::LLMProvider;
use super::types::{LLMResponse, Message};
use tracing::debug;

pub const DEFAULT_MODEL: &str = "gpt-4-turbo-2024-04-09";

pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f64,
    top_p: f64,
}

impl OpenAIProvider {
    pub fn new(api_key: &str, model: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: 0.7,
            top_p: 1.0,
        }
    }

    /// Point at any OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_sampling(mut self, temperature: f64, top_p: f64) -> Self {
        self.temperature = temperature;
        self.top_p = top_p;
        self
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn chat(&self, messages: &[Message]) -> Result<LLMResponse, PerfError> {
        let body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "top_p": self.top_p,
        });

        let resp = self.client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| PerfError::Network(format!("OpenAI request failed: {}", e)))?;

        let status = resp.status();
        if status.as_u16() == 429 {
            return Err(PerfError::RateLimit("OpenAI rate limit (HTTP 429)".into()));
        }
        if status.as_u16() == 401 {
            return Err(PerfError::Authentication("Invalid OpenAI API key".into()));
        }

        let data: Value = resp.json().await
            .map_err(|e| PerfError::LLMApi(format!("Failed to parse OpenAI response: {}", e)))?;

        if let Some(error) = data.get("error") {
            return Err(PerfError::LLMApi(error["message"].as_str().unwrap_or("Unknown").to_string()));
        }
        if !status.is_success() {
            return Err(PerfError::LLMApi(format!("OpenAI returned HTTP {}", status)));
        }

        let content = data["choices"][0]["message"]["content"].as_str()
            .ok_or_else(|| PerfError::LLMApi("No content in OpenAI response".into()))?
            .to_string();
        let input_tokens = data["usage"]["prompt_tokens"].as_u64();
        let output_tokens = data["usage"]["completion_tokens"].as_u64();

        debug!(model = %self.model, input_tokens, output_tokens, "OpenAI completion");

        Ok(LLMResponse {
            content,
            input_tokens,
            output_tokens,
            model: self.model.clone(),
        })
    }

    fn provider_name(&self) -> &str { "openai" }
    fn model_name(&self) -> &str { &self.model }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let provider = OpenAIProvider::new("sk-test", None);
        assert_eq!(provider.model_name(), DEFAULT_MODEL);
        assert_eq!(provider.provider_name(), "openai");
        assert_eq!(provider.temperature, 0.7);
        assert_eq!(provider.top_p, 1.0);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let provider = OpenAIProvider::new("sk-test", Some("local-model"))
            .with_base_url("http://localhost:11434/v1/");
        assert_eq!(provider.base_url, "http://localhost:11434/v1");
        assert_eq!(provider.model_name(), "local-model");
    }
}
