use std::sync::Arc;

use crate::config::LLMConfig;
use crate::errors::PerfError;
use super::provider::LLMProvider;
use super::anthropic::AnthropicProvider;
use super::openai::OpenAIProvider;

/// Build the text-generation client named by `config.provider`.
///
/// A key is required unless a custom `base_url` is set, since local
/// OpenAI-compatible servers usually run without one.
pub fn create_provider(config: &LLMConfig) -> Result<Arc<dyn LLMProvider>, PerfError> {
    let api_key = config.api_key.as_deref().filter(|k| !k.is_empty());
    let model = config.model.as_deref();

    match config.provider.to_ascii_lowercase().as_str() {
        "openai" => {
            let key = match (api_key, config.base_url.as_deref()) {
                (Some(key), _) => key,
                (None, Some(_)) => "",
                (None, None) => return Err(missing_key("openai", "OPEN_AI_KEY")),
            };
            let mut provider = OpenAIProvider::new(key, model)
                .with_sampling(config.temperature, config.top_p);
            if let Some(url) = config.base_url.as_deref() {
                provider = provider.with_base_url(url);
            }
            Ok(Arc::new(provider))
        }
        "anthropic" => {
            let key = api_key.ok_or_else(|| missing_key("anthropic", "ANTHROPIC_API_KEY"))?;
            Ok(Arc::new(
                AnthropicProvider::new(key, model).with_temperature(config.temperature),
            ))
        }
        other => Err(PerfError::Config(format!("Unknown LLM provider: {}", other))),
    }
}

fn missing_key(provider: &str, env_var: &str) -> PerfError {
    PerfError::Config(format!(
        "No API key configured for {} (set llm.api_key or {})",
        provider, env_var
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str, key: Option<&str>) -> LLMConfig {
        LLMConfig {
            provider: provider.to_string(),
            api_key: key.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_openai() {
        let provider = create_provider(&config("openai", Some("sk-test"))).unwrap();
        assert_eq!(provider.provider_name(), "openai");
        assert_eq!(provider.model_name(), super::super::openai::DEFAULT_MODEL);
    }

    #[test]
    fn test_create_anthropic_case_insensitive() {
        let provider = create_provider(&config("Anthropic", Some("sk-ant"))).unwrap();
        assert_eq!(provider.provider_name(), "anthropic");
    }

    #[test]
    fn test_missing_key_is_config_error() {
        assert!(matches!(create_provider(&config("openai", None)), Err(PerfError::Config(_))));
        assert!(matches!(create_provider(&config("anthropic", Some(""))), Err(PerfError::Config(_))));
    }

    #[test]
    fn test_base_url_allows_keyless_openai() {
        let mut cfg = config("openai", None);
        cfg.base_url = Some("http://localhost:11434/v1".into());
        assert!(create_provider(&cfg).is_ok());
    }

    #[test]
    fn test_unknown_provider() {
        let result = create_provider(&config("bard", Some("key")));
        assert!(matches!(result, Err(PerfError::Config(ref m)) if m.contains("bard")));
    }
}
