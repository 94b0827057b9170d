use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::LighthouseConfig;
use crate::errors::PerfError;
use crate::models::MeasurementRun;
use super::engine::AuditEngine;
use super::report::parse_lhr;

const CATEGORIES: &str = "performance,accessibility,best-practices,seo";

/// Runs the `lighthouse` command-line tool against headless Chrome.
///
/// The child process is killed when the run future is dropped, so a
/// cancelled or timed-out request does not leave a browser behind.
pub struct LighthouseCli {
    binary: String,
    chrome_flags: String,
    timeout: Duration,
}

impl LighthouseCli {
    pub fn new(config: &LighthouseConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            chrome_flags: config.chrome_flags.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    fn command_args(&self, url: &str) -> Vec<String> {
        vec![
            url.to_string(),
            "--output=json".to_string(),
            "--output-path=stdout".to_string(),
            "--quiet".to_string(),
            format!("--only-categories={}", CATEGORIES),
            format!("--chrome-flags={}", self.chrome_flags),
        ]
    }
}

fn tail(text: &str, max_chars: usize) -> &str {
    let count = text.chars().count();
    if count <= max_chars {
        return text;
    }
    let start = text.char_indices()
        .nth(count - max_chars)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &text[start..]
}

#[async_trait]
impl AuditEngine for LighthouseCli {
    async fn run(&self, url: &str) -> Result<MeasurementRun, PerfError> {
        let args = self.command_args(url);
        debug!(binary = %self.binary, ?args, "Launching Lighthouse");

        let child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| PerfError::AuditEngine(format!("Failed to launch {}: {}", self.binary, e)))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| PerfError::Timeout(format!(
                "Lighthouse did not finish within {}s for {}",
                self.timeout.as_secs(),
                url
            )))?
            .map_err(|e| PerfError::AuditEngine(format!("Lighthouse process failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PerfError::AuditEngine(format!(
                "Lighthouse exited with {}: {}",
                output.status,
                tail(stderr.trim(), 500)
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let run = parse_lhr(&stdout)?;
        info!(url, audits = run.findings.len(), "Lighthouse run finished");
        Ok(run)
    }

    fn engine_name(&self) -> &str { "lighthouse" }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(binary: &str) -> LighthouseCli {
        LighthouseCli::new(&LighthouseConfig {
            binary: binary.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_command_args() {
        let args = cli("lighthouse").command_args("https://example.com");
        assert_eq!(args[0], "https://example.com");
        assert!(args.contains(&"--output=json".to_string()));
        assert!(args.contains(&"--output-path=stdout".to_string()));
        assert!(args.contains(&"--chrome-flags=--headless=new --no-sandbox".to_string()));
    }

    #[test]
    fn test_tail_keeps_end() {
        assert_eq!(tail("abcdef", 3), "def");
        assert_eq!(tail("ab", 3), "ab");
        assert_eq!(tail("ééé", 2), "éé");
    }

    #[tokio::test]
    async fn test_missing_binary_is_engine_error() {
        let result = cli("/nonexistent/lighthouse-binary").run("https://example.com").await;
        assert!(matches!(result, Err(PerfError::AuditEngine(_))));
    }
}
