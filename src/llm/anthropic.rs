use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use crate::errors::PerfError;
use super::provider::LLMProvider;
use super::types::{LLMResponse, Message};
use tracing::debug;

pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f64,
}

impl AnthropicProvider {
    pub fn new(api_key: &str, model: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.unwrap_or("claude-sonnet-4-5-20250929").to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            temperature: 0.7,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Splits chat messages into Anthropic's `system` string and turn list.
///
/// The messages API needs at least one user turn; when every message is a
/// system message the last one becomes the user turn.
fn split_messages(messages: &[Message]) -> (Option<String>, Vec<Value>) {
    let mut system: Vec<&str> = Vec::new();
    let mut turns: Vec<Value> = Vec::new();

    for m in messages {
        if m.is_system() {
            system.push(&m.content);
        } else {
            turns.push(json!({"role": m.role, "content": m.content}));
        }
    }

    if turns.is_empty() {
        if let Some(last) = system.pop() {
            turns.push(json!({"role": "user", "content": last}));
        }
    }

    let system = if system.is_empty() { None } else { Some(system.join("\n\n")) };
    (system, turns)
}

#[async_trait]
impl LLMProvider for AnthropicProvider {
    async fn chat(&self, messages: &[Message]) -> Result<LLMResponse, PerfError> {
        let (system, turns) = split_messages(messages);
        let mut body = json!({
            "model": self.model,
            "max_tokens": 4096,
            "temperature": self.temperature,
            "messages": turns,
        });

        if let Some(sys) = system {
            body["system"] = json!(sys);
        }

        let resp = self.client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| PerfError::Network(format!("Anthropic API request failed: {}", e)))?;

        let status = resp.status();
        if status == 429 {
            return Err(PerfError::RateLimit("Anthropic rate limit exceeded (HTTP 429)".into()));
        }
        if status == 401 {
            return Err(PerfError::Authentication("Invalid Anthropic API key".into()));
        }

        let data: Value = resp.json().await
            .map_err(|e| PerfError::LLMApi(format!("Failed to parse Anthropic response: {}", e)))?;

        if let Some(error) = data.get("error") {
            let msg = error["message"].as_str().unwrap_or("Unknown error");
            return Err(PerfError::LLMApi(msg.to_string()));
        }

        let content = data["content"][0]["text"].as_str()
            .ok_or_else(|| PerfError::LLMApi("No content in Anthropic response".into()))?
            .to_string();

        let input_tokens = data["usage"]["input_tokens"].as_u64();
        let output_tokens = data["usage"]["output_tokens"].as_u64();

        debug!(model = %self.model, input_tokens, output_tokens, "Anthropic completion");

        Ok(LLMResponse {
            content,
            input_tokens,
            output_tokens,
            model: self.model.clone(),
        })
    }

    fn provider_name(&self) -> &str { "anthropic" }
    fn model_name(&self) -> &str { &self.model }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_keeps_user_turns() {
        let (system, turns) = split_messages(&[
            Message::system("estimate"),
            Message::user("ticket text"),
        ]);
        assert_eq!(system.as_deref(), Some("estimate"));
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0]["role"], "user");
        assert_eq!(turns[0]["content"], "ticket text");
    }

    #[test]
    fn test_split_all_system_promotes_last() {
        let (system, turns) = split_messages(&[
            Message::system("instructions"),
            Message::system("{\"id\":\"x\"}"),
        ]);
        assert_eq!(system.as_deref(), Some("instructions"));
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0]["content"], "{\"id\":\"x\"}");
    }
}
