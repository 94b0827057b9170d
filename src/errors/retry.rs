use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::types::PerfError;

/// Fixed-delay retry policy.
///
/// `max_retries: None` retries for as long as the error stays retryable, so
/// callers must hand in a cancellation token they can actually trigger.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub delay: Duration,
    pub max_retries: Option<u32>,
}

impl RetryPolicy {
    pub fn unbounded(delay: Duration) -> Self {
        Self { delay, max_retries: None }
    }

    pub fn bounded(delay: Duration, max_retries: u32) -> Self {
        Self { delay, max_retries: Some(max_retries) }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded(Duration::from_millis(1000))
    }
}

/// Execute an async operation with retry logic.
///
/// Retries only if the error is classified as retryable and the policy still
/// allows another attempt. The cancellation token is checked before every
/// attempt and raced against both the attempt and the backoff sleep.
pub async fn with_retry<F, Fut, T>(
    operation_name: &str,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut factory: F,
) -> Result<T, PerfError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PerfError>>,
{
    let mut retries: u32 = 0;

    loop {
        if cancel.is_cancelled() {
            return Err(cancelled(operation_name));
        }

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled(operation_name)),
            result = factory() => result,
        };

        let e = match outcome {
            Ok(result) => return Ok(result),
            Err(e) => e,
        };

        let classification = e.classify();
        if !classification.retryable {
            return Err(e);
        }
        if policy.max_retries.is_some_and(|max| retries >= max) {
            warn!(
                operation = operation_name,
                retries,
                "Max retries exhausted"
            );
            return Err(e);
        }

        retries += 1;
        warn!(
            operation = operation_name,
            attempt = retries,
            error_type = classification.error_type,
            delay_ms = policy.delay.as_millis() as u64,
            error = %e,
            "Retrying after error"
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled(operation_name)),
            _ = tokio::time::sleep(policy.delay) => {}
        }
    }
}

fn cancelled(operation_name: &str) -> PerfError {
    PerfError::Cancelled(format!("{} was cancelled", operation_name))
}
