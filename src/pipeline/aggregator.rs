use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::errors::PerfError;
use crate::lighthouse::AuditEngine;
use crate::models::{AggregatedReport, MeasurementRun};
use super::store::FindingStore;

/// Drives sequential audit passes and folds them into an `AggregatedReport`.
pub struct MeasurementAggregator {
    engine: Arc<dyn AuditEngine>,
    headline_ids: BTreeMap<String, String>,
}

impl MeasurementAggregator {
    pub fn new(engine: Arc<dyn AuditEngine>, headline_ids: BTreeMap<String, String>) -> Self {
        Self { engine, headline_ids }
    }

    /// Runs `pass_count` passes (at least one). Any failed pass aborts the
    /// whole aggregation.
    pub async fn run(
        &self,
        url: &str,
        pass_count: u32,
        cancel: &CancellationToken,
    ) -> Result<AggregatedReport, PerfError> {
        let passes = pass_count.max(1);
        let mut store = FindingStore::new();
        let mut report = AggregatedReport::default();
        let mut last_run: Option<MeasurementRun> = None;

        for pass in 1..=passes {
            info!(pass, passes, engine = self.engine.engine_name(), "Starting audit pass");

            let run = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(PerfError::Cancelled(format!("audit pass {} was cancelled", pass)));
                }
                result = self.engine.run(url) => result.map_err(|e| {
                    error!(pass, error = %e, "Audit pass failed");
                    e
                })?,
            };

            report.performance.push(run.scores.performance);
            report.accessibility.push(run.scores.accessibility);
            report.seo.push(run.scores.seo);
            report.best_practices = run.scores.best_practices;
            store.ingest(&run);
            info!(pass, findings = run.findings.len(), "Audit pass added to aggregated report");
            last_run = Some(run);
        }

        let headline: HashSet<&str> = self.headline_ids.values().map(String::as_str).collect();
        report.findings = store.ranked_findings();
        report.saving_metrics = store.saving_metrics(&headline);
        if let Some(last) = &last_run {
            report.metrics = FindingStore::headline_metric_values(&self.headline_ids, last);
        }

        info!(
            distinct = store.len(),
            ranked = report.findings.len(),
            "Aggregation complete"
        );
        Ok(report)
    }
}
