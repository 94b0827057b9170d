use std::path::Path;
use crate::errors::PerfError;
use super::credentials::resolve_optional;
use super::env::apply_env_overrides;
use super::types::AppConfig;
use super::security::validate_security_patterns;
use super::schema::CONFIG_SCHEMA;
use tracing::warn;

/// Parse and validate a YAML config file.
pub async fn parse_config(path: &Path) -> Result<AppConfig, PerfError> {
    if !path.exists() {
        return Err(PerfError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(PerfError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config_str(&content)
}

pub fn parse_config_str(content: &str) -> Result<AppConfig, PerfError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
    if yaml.is_null() {
        return Ok(AppConfig::default());
    }

    validate_security_patterns(&yaml)?;
    validate_schema(&yaml)?;

    let config: AppConfig = serde_yaml::from_value(yaml)?;
    validate_semantics(&config)?;
    Ok(config)
}

/// Build the runtime config: optional file, then environment overrides,
/// then `$VAR` credential references.
pub async fn load_config(path: Option<&Path>) -> Result<AppConfig, PerfError> {
    let mut config = match path {
        Some(p) => parse_config(p).await?,
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config)?;
    resolve_optional(&mut config.llm.api_key);
    resolve_optional(&mut config.storage.container_url);
    resolve_optional(&mut config.server.api_token);

    validate_semantics(&config)?;
    if config.finance.developer_rate == 0.0 || config.finance.income_cost_coefficient == 0.0 {
        warn!("Developer rate or income coefficient is zero; money figures will be zero");
    }
    Ok(config)
}

/// Validate config against the JSON schema. Advisory only: mismatches are
/// logged, the typed parse decides.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), PerfError> {
    let json_value = serde_json::to_value(yaml)
        .map_err(|e| PerfError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| PerfError::Config(format!("Schema compilation error: {}", e)))?;

    if let Err(errors) = compiled.validate(&json_value) {
        for e in errors {
            warn!(validation_error = %e, path = %e.instance_path, "Config schema warning");
        }
    }

    Ok(())
}

/// Checks the typed config for values the pipeline cannot work with.
pub fn validate_semantics(config: &AppConfig) -> Result<(), PerfError> {
    let finance = &config.finance;
    for (name, value) in [
        ("finance.developer_rate", finance.developer_rate),
        ("finance.income_cost_coefficient", finance.income_cost_coefficient),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(PerfError::Config(format!(
                "{} must be a finite, non-negative number",
                name
            )));
        }
    }

    if config.lighthouse.passes == 0 {
        return Err(PerfError::Config("lighthouse.passes must be at least 1".into()));
    }

    if config.server.request_timeout_secs == 0 {
        return Err(PerfError::Config("server.request_timeout_secs must be at least 1".into()));
    }

    for label in ["TBT", "LCP"] {
        if !config.headline_metrics.contains_key(label) {
            return Err(PerfError::Config(format!(
                "headline_metrics must define '{}'",
                label
            )));
        }
    }

    Ok(())
}
