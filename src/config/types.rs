use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::RetryPolicy;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LLMConfig,
    pub finance: FinanceConfig,
    pub enrichment: EnrichmentConfig,
    pub lighthouse: LighthouseConfig,
    pub headline_metrics: BTreeMap<String, String>,
    pub storage: StorageConfig,
    pub server: ServerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LLMConfig::default(),
            finance: FinanceConfig::default(),
            enrichment: EnrichmentConfig::default(),
            lighthouse: LighthouseConfig::default(),
            headline_metrics: default_headline_metrics(),
            storage: StorageConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Headline label -> audit id. These audits are reported directly and never
/// summed into the saving metrics.
pub fn default_headline_metrics() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("LCP".to_string(), "largest-contentful-paint-element".to_string()),
        ("TBT".to_string(), "total-blocking-time".to_string()),
        ("FCP".to_string(), "first-contentful-paint".to_string()),
        ("CLS".to_string(), "cumulative-layout-shift".to_string()),
    ])
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LLMConfig {
    pub provider: String,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub temperature: f64,
    pub top_p: f64,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: None,
            api_key: None,
            base_url: None,
            temperature: 0.7,
            top_p: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct FinanceConfig {
    /// Cost of one developer hour.
    pub developer_rate: f64,
    /// Revenue sensitivity to page-speed improvements.
    pub income_cost_coefficient: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Pause between the ticket call and the estimate call.
    pub inter_call_delay_ms: u64,
    /// Pause before retrying a rate-limited finding.
    pub rate_limit_delay_ms: u64,
    /// Absent means retry until success or cancellation.
    pub max_rate_limit_retries: Option<u32>,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            inter_call_delay_ms: 100,
            rate_limit_delay_ms: 1000,
            max_rate_limit_retries: None,
        }
    }
}

impl EnrichmentConfig {
    pub fn inter_call_delay(&self) -> Duration {
        Duration::from_millis(self.inter_call_delay_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            delay: Duration::from_millis(self.rate_limit_delay_ms),
            max_retries: self.max_rate_limit_retries,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LighthouseConfig {
    pub binary: String,
    pub chrome_flags: String,
    pub timeout_secs: u64,
    pub passes: u32,
}

impl Default for LighthouseConfig {
    fn default() -> Self {
        Self {
            binary: "lighthouse".to_string(),
            chrome_flags: "--headless=new --no-sandbox".to_string(),
            timeout_secs: 180,
            passes: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Local,
    Blob,
    Sqlite,
}

impl StorageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Blob => "blob",
            Self::Sqlite => "sqlite",
        }
    }
}

impl std::fmt::Display for StorageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    pub kind: StorageKind,
    pub directory: String,
    /// Container URL including its SAS query string.
    pub container_url: Option<String>,
    pub database: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StorageKind::Local,
            directory: "./reports".to_string(),
            container_url: None,
            database: "./data/perfreport.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub request_timeout_secs: u64,
    pub api_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 900,
            api_token: None,
        }
    }
}
