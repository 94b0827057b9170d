use async_trait::async_trait;
use crate::errors::PerfError;
use crate::models::MeasurementRun;

/// Renders a page and reports category scores plus raw audit records.
#[async_trait]
pub trait AuditEngine: Send + Sync {
    /// One measurement pass against `url`.
    async fn run(&self, url: &str) -> Result<MeasurementRun, PerfError>;

    /// Engine name for logging
    fn engine_name(&self) -> &str;
}
