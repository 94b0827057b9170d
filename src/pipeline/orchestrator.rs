use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::{AppConfig, FinanceConfig};
use crate::config::validate_target_url;
use crate::errors::PerfError;
use crate::lighthouse::AuditEngine;
use crate::llm::LLMProvider;
use crate::models::{AnalysisReport, BusinessParams};
use crate::reporting::{assemble_report, estimate, store_report};
use crate::storage::ReportStorage;
use super::aggregator::MeasurementAggregator;
use super::enrichment::EnrichmentPipeline;

/// One analysis to run.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub url: String,
    /// Report identifier; the stored blob is `report_<guid>.json`.
    pub guid: String,
    pub params: BusinessParams,
}

/// Single-flow analysis: audit passes, enrichment, money model, report
/// assembly, storage. Every stage runs strictly after the previous one.
pub struct AnalysisPipeline {
    aggregator: MeasurementAggregator,
    enrichment: EnrichmentPipeline,
    storage: Option<Arc<dyn ReportStorage>>,
    finance: FinanceConfig,
    passes: u32,
}

impl AnalysisPipeline {
    pub fn new(
        engine: Arc<dyn AuditEngine>,
        llm: Arc<dyn LLMProvider>,
        storage: Option<Arc<dyn ReportStorage>>,
        config: &AppConfig,
    ) -> Self {
        Self {
            aggregator: MeasurementAggregator::new(engine, config.headline_metrics.clone()),
            enrichment: EnrichmentPipeline::new(llm, &config.enrichment),
            storage,
            finance: config.finance,
            passes: config.lighthouse.passes,
        }
    }

    /// Override the configured pass count for this pipeline.
    pub fn with_passes(mut self, passes: u32) -> Self {
        self.passes = passes;
        self
    }

    pub async fn run(
        &self,
        request: &AnalysisRequest,
        cancel: &CancellationToken,
    ) -> Result<AnalysisReport, PerfError> {
        let url = validate_target_url(&request.url)?;
        let guid = request.guid.as_str();
        info!(guid, url = %url, passes = self.passes, "Analysis started");

        let aggregated = self.aggregator.run(url.as_str(), self.passes, cancel).await?;
        ensure_active(cancel, "enrichment")?;

        info!(guid, findings = aggregated.findings.len(), "Enriching ranked findings");
        let tasks = self.enrichment.enrich(&aggregated.findings, cancel).await?;
        let failed = tasks.iter().filter(|t| t.is_none()).count();
        if failed > 0 {
            warn!(guid, failed, total = tasks.len(), "Some findings could not be enriched");
        }

        let money = estimate(&aggregated, &tasks, &request.params, &self.finance);
        let report = assemble_report(aggregated, tasks, money);
        ensure_active(cancel, "storage")?;

        match &self.storage {
            Some(storage) => {
                store_report(storage.as_ref(), guid, &report).await?;
            }
            None => info!(guid, "Storage disabled, report not persisted"),
        }

        info!(
            guid,
            tasks = report.tasks.len(),
            work_cost = report.money.work_cost,
            "Analysis finished"
        );
        Ok(report)
    }
}

fn ensure_active(cancel: &CancellationToken, next_stage: &str) -> Result<(), PerfError> {
    if cancel.is_cancelled() {
        return Err(PerfError::Cancelled(format!("analysis cancelled before {}", next_stage)));
    }
    Ok(())
}
