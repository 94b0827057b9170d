use crate::errors::PerfError;
use super::types::AppConfig;
use tracing::info;

pub const OPENAI_KEY_VAR: &str = "OPEN_AI_KEY";
pub const ANTHROPIC_KEY_VAR: &str = "ANTHROPIC_API_KEY";
pub const DEVELOPER_RATE_VAR: &str = "DEVELOPER_RATE";
pub const INCOME_COEFFICIENT_VAR: &str = "INCOME_COST_KOEFFICIENT";
pub const CONTAINER_URL_VAR: &str = "BLOB_STORAGE_CONTAINER_URL";
pub const API_TOKEN_VAR: &str = "PERFREPORT_API_TOKEN";

/// Overlay process environment values onto `config`. Called once at startup;
/// the resulting config is passed by value from there on.
pub fn apply_env_overrides(config: &mut AppConfig) -> Result<(), PerfError> {
    apply_overrides(config, |name| std::env::var(name).ok())
}

pub fn apply_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), PerfError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let key_var = match config.llm.provider.as_str() {
        "anthropic" => ANTHROPIC_KEY_VAR,
        _ => OPENAI_KEY_VAR,
    };
    if let Some(key) = get(key_var) {
        config.llm.api_key = Some(key);
    }
    if let Some(rate) = get(DEVELOPER_RATE_VAR) {
        config.finance.developer_rate = parse_number(DEVELOPER_RATE_VAR, &rate)?;
    }
    if let Some(coefficient) = get(INCOME_COEFFICIENT_VAR) {
        config.finance.income_cost_coefficient = parse_number(INCOME_COEFFICIENT_VAR, &coefficient)?;
    }
    if let Some(url) = get(CONTAINER_URL_VAR) {
        config.storage.container_url = Some(url);
    }
    if let Some(token) = get(API_TOKEN_VAR) {
        config.server.api_token = Some(token);
    }

    info!(
        llm_key_defined = config.llm.api_key.is_some(),
        container_url_defined = config.storage.container_url.is_some(),
        "Configuration credentials"
    );
    Ok(())
}

fn parse_number(name: &str, raw: &str) -> Result<f64, PerfError> {
    raw.trim().parse::<f64>()
        .map_err(|_| PerfError::Config(format!("{} must be a number, got '{}'", name, raw)))
}
