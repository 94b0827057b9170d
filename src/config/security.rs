use reqwest::Url;

use crate::errors::PerfError;

const DANGEROUS_PATTERNS: &[&str] = &[
    "../",
    "..\\",
    "<script",
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
];

/// Reject config files whose string values carry traversal or script
/// payloads. Values are checked wherever they appear in the document.
pub fn validate_security_patterns(value: &serde_yaml::Value) -> Result<(), PerfError> {
    let mut path = Vec::new();
    match find_dangerous(value, &mut path) {
        Some((pattern, at)) => Err(PerfError::Config(format!(
            "Dangerous pattern '{}' found at config path: {}",
            pattern, at
        ))),
        None => Ok(()),
    }
}

fn find_dangerous(value: &serde_yaml::Value, path: &mut Vec<String>) -> Option<(&'static str, String)> {
    match value {
        serde_yaml::Value::String(s) => {
            let lower = s.to_lowercase();
            DANGEROUS_PATTERNS.iter()
                .find(|p| lower.contains(*p))
                .map(|p| {
                    let at = if path.is_empty() { "root".to_string() } else { path.join(".") };
                    (*p, at)
                })
        }
        serde_yaml::Value::Mapping(map) => map.iter().find_map(|(k, v)| {
            path.push(k.as_str().unwrap_or("unknown").to_string());
            let hit = find_dangerous(v, path);
            path.pop();
            hit
        }),
        serde_yaml::Value::Sequence(seq) => seq.iter().enumerate().find_map(|(i, v)| {
            path.push(format!("[{}]", i));
            let hit = find_dangerous(v, path);
            path.pop();
            hit
        }),
        _ => None,
    }
}

/// Only absolute http(s) URLs with a host may be handed to the audit engine.
pub fn validate_target_url(raw: &str) -> Result<Url, PerfError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| PerfError::InvalidRequest(format!("Invalid url '{}': {}", raw, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(PerfError::InvalidRequest(format!(
            "Unsupported url scheme '{}', expected http or https",
            url.scheme()
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(PerfError::InvalidRequest(format!("Url '{}' has no host", raw)));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> serde_yaml::Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn test_safe_config_passes() {
        let value = yaml("llm:\n  provider: openai\nfinance:\n  developer_rate: 50");
        assert!(validate_security_patterns(&value).is_ok());
    }

    #[test]
    fn test_directory_traversal_blocked_with_path() {
        let value = yaml("storage:\n  directory: ../../etc");
        let err = validate_security_patterns(&value).unwrap_err().to_string();
        assert!(err.contains("storage.directory"));
    }

    #[test]
    fn test_script_in_sequence_blocked() {
        let value = yaml("items:\n  - ok\n  - '<script>alert(1)'");
        let err = validate_security_patterns(&value).unwrap_err().to_string();
        assert!(err.contains("items.[1]"));
    }

    #[test]
    fn test_file_uri_blocked() {
        assert!(validate_security_patterns(&yaml("storage:\n  container_url: 'file:///tmp'")).is_err());
    }

    #[test]
    fn test_numeric_values_pass() {
        assert!(validate_security_patterns(&yaml("passes: 3\nenabled: true")).is_ok());
    }

    #[test]
    fn test_target_url_accepts_https() {
        let url = validate_target_url("https://example.com/landing").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn test_target_url_rejects_other_schemes() {
        assert!(matches!(validate_target_url("file:///etc/passwd"), Err(PerfError::InvalidRequest(_))));
        assert!(matches!(validate_target_url("javascript:alert(1)"), Err(PerfError::InvalidRequest(_))));
    }

    #[test]
    fn test_target_url_rejects_garbage() {
        assert!(validate_target_url("not a url").is_err());
        assert!(validate_target_url("").is_err());
    }
}
