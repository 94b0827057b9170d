use tracing::debug;

/// Resolve a credential value. If the value starts with '$', treat it as an
/// environment variable reference and resolve from the environment.
pub fn resolve_credential(value: &str) -> String {
    if let Some(var_name) = value.strip_prefix('$') {
        match std::env::var(var_name) {
            Ok(resolved) => {
                debug!(var = %var_name, "Resolved credential from environment");
                resolved
            }
            Err(_) => {
                debug!(var = %var_name, "Environment variable not set, using literal");
                value.to_string()
            }
        }
    } else {
        value.to_string()
    }
}

pub fn resolve_optional(value: &mut Option<String>) {
    if let Some(v) = value.as_mut() {
        *v = resolve_credential(v);
    }
}

/// Redact sensitive values in a string. Replaces known credential patterns
/// with [REDACTED].
pub fn redact_credentials(text: &str, secrets: &[&str]) -> String {
    let mut result = text.to_string();
    for secret in secrets {
        if !secret.is_empty() && secret.len() >= 4 {
            result = result.replace(secret, "[REDACTED]");
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_credential_literal() {
        assert_eq!(resolve_credential("sk-literal"), "sk-literal");
    }

    #[test]
    fn test_resolve_credential_env_var() {
        std::env::set_var("TEST_PERFREPORT_CRED", "secret123");
        assert_eq!(resolve_credential("$TEST_PERFREPORT_CRED"), "secret123");
        std::env::remove_var("TEST_PERFREPORT_CRED");
    }

    #[test]
    fn test_resolve_credential_missing_env_var() {
        let result = resolve_credential("$NONEXISTENT_PERFREPORT_VAR");
        assert_eq!(result, "$NONEXISTENT_PERFREPORT_VAR");
    }

    #[test]
    fn test_resolve_optional_none_untouched() {
        let mut value: Option<String> = None;
        resolve_optional(&mut value);
        assert!(value.is_none());
    }

    #[test]
    fn test_redact_sas_token() {
        let text = "PUT https://acct.blob.core.windows.net/reports/report_1.json?sv=2022&sig=abcd1234 failed";
        let redacted = redact_credentials(text, &["sv=2022&sig=abcd1234"]);
        assert!(redacted.contains("[REDACTED]"));
        assert!(!redacted.contains("abcd1234"));
    }

    #[test]
    fn test_redact_credentials_short_secret_ignored() {
        let redacted = redact_credentials("key=ab", &["ab"]);
        assert_eq!(redacted, "key=ab");
    }
}
