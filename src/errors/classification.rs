use super::types::PerfError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub retryable: bool,
}

impl PerfError {
    /// Classify this error to determine its type and whether it can be retried.
    ///
    /// Only rate limiting is retryable: every other failure of a single
    /// enrichment step is recorded and the pipeline moves on.
    pub fn classify(&self) -> ErrorClassification {
        let (error_type, retryable) = match self {
            PerfError::RateLimit(_) => ("RateLimitError", true),
            PerfError::Config(_) => ("ConfigError", false),
            PerfError::InvalidRequest(_) => ("InvalidRequestError", false),
            PerfError::Authentication(_) => ("AuthenticationError", false),
            PerfError::LLMApi(_) => ("LLMApiError", false),
            PerfError::Network(_) => ("NetworkError", false),
            PerfError::Timeout(_) => ("TimeoutError", false),
            PerfError::Cancelled(_) => ("CancelledError", false),
            PerfError::AuditEngine(_) => ("AuditEngineError", false),
            PerfError::Storage(_) => ("StorageError", false),
            PerfError::Io(_) => ("IoError", false),
            PerfError::Json(_) => ("JsonError", false),
            PerfError::Yaml(_) => ("YamlError", false),
            PerfError::Database(_) => ("DatabaseError", false),
            PerfError::Internal(_) => ("InternalError", false),
        };
        ErrorClassification { error_type, retryable }
    }

    pub fn is_rate_limit(&self) -> bool {
        matches!(self, PerfError::RateLimit(_))
    }
}
