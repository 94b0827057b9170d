use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::EnrichmentConfig;
use crate::errors::{with_retry, PerfError, RetryPolicy};
use crate::llm::LLMProvider;
use crate::models::{EnrichedTask, EnrichmentResult, Finding};
use crate::prompts::{estimate_messages, ticket_messages};

/// Turns ranked findings into tickets with hour estimates, one finding at a
/// time.
///
/// Findings are processed sequentially to stay under the text service's
/// per-caller rate limit. A rate-limited finding is retried as a whole under
/// `retry`; any other failure leaves a `None` in its slot.
pub struct EnrichmentPipeline {
    llm: Arc<dyn LLMProvider>,
    inter_call_delay: Duration,
    retry: RetryPolicy,
}

impl EnrichmentPipeline {
    pub fn new(llm: Arc<dyn LLMProvider>, config: &EnrichmentConfig) -> Self {
        Self::with_timing(llm, config.inter_call_delay(), config.retry_policy())
    }

    pub fn with_timing(llm: Arc<dyn LLMProvider>, inter_call_delay: Duration, retry: RetryPolicy) -> Self {
        Self { llm, inter_call_delay, retry }
    }

    /// Output has exactly one entry per input finding, in input order.
    /// Only cancellation aborts the loop.
    pub async fn enrich(
        &self,
        findings: &[Finding],
        cancel: &CancellationToken,
    ) -> Result<Vec<EnrichmentResult>, PerfError> {
        let mut results: Vec<EnrichmentResult> = Vec::with_capacity(findings.len());

        for (index, finding) in findings.iter().enumerate() {
            let operation = format!("enrich:{}", finding.id);
            let outcome = with_retry(&operation, &self.retry, cancel, || {
                self.enrich_one(finding, cancel)
            }).await;

            match outcome {
                Ok(task) => {
                    info!(index, finding = %finding.id, estimate = %task.estimate_hours, "Finding enriched");
                    results.push(Some(task));
                }
                Err(PerfError::Cancelled(reason)) => {
                    warn!(index, finding = %finding.id, "Enrichment cancelled");
                    return Err(PerfError::Cancelled(reason));
                }
                Err(e) => {
                    warn!(index, finding = %finding.id, error = %e, "Enrichment failed, recording empty task");
                    results.push(None);
                }
            }
        }

        Ok(results)
    }

    async fn enrich_one(
        &self,
        finding: &Finding,
        cancel: &CancellationToken,
    ) -> Result<EnrichedTask, PerfError> {
        let ticket = self.llm.chat(&ticket_messages(finding)?).await?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(PerfError::Cancelled(format!("enrichment of {} was cancelled", finding.id)));
            }
            _ = tokio::time::sleep(self.inter_call_delay) => {}
        }

        let estimate = self.llm.chat(&estimate_messages(&ticket.content)).await?;

        Ok(EnrichedTask {
            finding: finding.clone(),
            ticket_text: ticket.content,
            estimate_hours: estimate.content.trim().to_string(),
        })
    }
}
