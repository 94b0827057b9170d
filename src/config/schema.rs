use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "llm": {
                "type": "object",
                "properties": {
                    "provider": { "type": "string", "enum": ["openai", "anthropic"] },
                    "model": { "type": "string" },
                    "api_key": { "type": "string" },
                    "base_url": { "type": "string", "format": "uri" },
                    "temperature": { "type": "number", "minimum": 0, "maximum": 2 },
                    "top_p": { "type": "number", "minimum": 0, "maximum": 1 }
                }
            },
            "finance": {
                "type": "object",
                "properties": {
                    "developer_rate": { "type": "number", "minimum": 0 },
                    "income_cost_coefficient": { "type": "number", "minimum": 0 }
                }
            },
            "enrichment": {
                "type": "object",
                "properties": {
                    "inter_call_delay_ms": { "type": "integer", "minimum": 0 },
                    "rate_limit_delay_ms": { "type": "integer", "minimum": 0 },
                    "max_rate_limit_retries": { "type": "integer", "minimum": 0 }
                }
            },
            "lighthouse": {
                "type": "object",
                "properties": {
                    "binary": { "type": "string" },
                    "chrome_flags": { "type": "string" },
                    "timeout_secs": { "type": "integer", "minimum": 1 },
                    "passes": { "type": "integer", "minimum": 1 }
                }
            },
            "headline_metrics": {
                "type": "object",
                "additionalProperties": { "type": "string" }
            },
            "storage": {
                "type": "object",
                "properties": {
                    "kind": { "type": "string", "enum": ["local", "blob", "sqlite"] },
                    "directory": { "type": "string" },
                    "container_url": { "type": "string" },
                    "database": { "type": "string" }
                }
            },
            "server": {
                "type": "object",
                "properties": {
                    "request_timeout_secs": { "type": "integer", "minimum": 1 },
                    "api_token": { "type": "string" }
                }
            }
        }
    })
});
