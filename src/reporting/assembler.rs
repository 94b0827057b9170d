use tracing::{error, info};

use crate::errors::PerfError;
use crate::models::{AggregatedReport, AnalysisReport, EnrichmentResult, SavingsEstimate};
use crate::storage::{report_blob_name, ReportStorage};
use super::estimator::average_score;

/// Fold the stage outputs into the final report. Tasks keep their slots,
/// `None` included.
pub fn assemble_report(
    aggregated: AggregatedReport,
    tasks: Vec<EnrichmentResult>,
    money: SavingsEstimate,
) -> AnalysisReport {
    AnalysisReport {
        performance: average_score(&aggregated.performance),
        accessibility: average_score(&aggregated.accessibility),
        seo: average_score(&aggregated.seo),
        best_practices: aggregated.best_practices,
        saving_metrics: aggregated.saving_metrics,
        metrics: aggregated.metrics,
        tasks,
        money,
    }
}

/// Serialize and write the report as `report_<guid>.json`. Returns the blob
/// name. Any storage failure is returned to the caller.
pub async fn store_report(
    storage: &dyn ReportStorage,
    guid: &str,
    report: &AnalysisReport,
) -> Result<String, PerfError> {
    let name = report_blob_name(guid);
    let body = serde_json::to_string(report)?;

    storage.put(&name, &body).await.map_err(|e| {
        error!(blob = %name, backend = storage.backend_name(), error = %e, "Report upload failed");
        e
    })?;

    info!(blob = %name, backend = storage.backend_name(), bytes = body.len(), "Report stored");
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use async_trait::async_trait;
    use crate::models::{EnrichedTask, Finding};

    #[derive(Default)]
    struct MemoryStorage {
        blobs: Mutex<BTreeMap<String, String>>,
        fail: bool,
    }

    #[async_trait]
    impl ReportStorage for MemoryStorage {
        async fn put(&self, name: &str, body: &str) -> Result<(), PerfError> {
            if self.fail {
                return Err(PerfError::Storage("container not found".into()));
            }
            self.blobs.lock().unwrap().insert(name.to_string(), body.to_string());
            Ok(())
        }

        async fn get(&self, name: &str) -> Result<Option<String>, PerfError> {
            Ok(self.blobs.lock().unwrap().get(name).cloned())
        }

        fn backend_name(&self) -> &str { "memory" }
    }

    fn aggregated() -> AggregatedReport {
        AggregatedReport {
            findings: vec![Finding::new("unused-css-rules").with_guidance_level(2)],
            saving_metrics: BTreeMap::from([("LCP".to_string(), 150.0)]),
            metrics: BTreeMap::from([
                ("TBT".to_string(), Some("320 ms".to_string())),
                ("CLS".to_string(), None),
            ]),
            performance: vec![Some(0.4), Some(0.6)],
            accessibility: vec![Some(0.9), None],
            seo: vec![None, None],
            best_practices: Some(0.75),
        }
    }

    fn tasks() -> Vec<EnrichmentResult> {
        vec![
            Some(EnrichedTask {
                finding: Finding::new("unused-css-rules").with_guidance_level(2),
                ticket_text: "Remove unused CSS".into(),
                estimate_hours: "3".into(),
            }),
            None,
        ]
    }

    #[test]
    fn test_assemble_averages_scores() {
        let report = assemble_report(aggregated(), tasks(), SavingsEstimate::default());
        assert!((report.performance.unwrap() - 50.0).abs() < 1e-9);
        assert!((report.accessibility.unwrap() - 90.0).abs() < 1e-9);
        assert_eq!(report.seo, None);
        assert_eq!(report.best_practices, Some(0.75));
        assert_eq!(report.tasks.len(), 2);
        assert!(report.tasks[1].is_none());
    }

    #[tokio::test]
    async fn test_store_report_writes_named_blob() {
        let storage = MemoryStorage::default();
        let report = assemble_report(aggregated(), tasks(), SavingsEstimate {
            work_cost: 150.0,
            potential_income_increase: 0.0,
            potential_revenue_gain: 1.5,
        });

        let name = store_report(&storage, "7d2c", &report).await.unwrap();
        assert_eq!(name, "report_7d2c.json");

        let body = storage.get(&name).await.unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["tasks"][1], serde_json::Value::Null);
        assert_eq!(json["money"]["workCost"], 150.0);
        assert_eq!(json["savingMetrics"]["LCP"], 150.0);
        assert_eq!(json["metrics"]["TBT"], "320 ms");
        assert_eq!(json["metrics"]["CLS"], serde_json::Value::Null);
        assert_eq!(json["bestPractices"], 0.75);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let storage = MemoryStorage { fail: true, ..Default::default() };
        let report = assemble_report(aggregated(), tasks(), SavingsEstimate::default());
        let result = store_report(&storage, "x", &report).await;
        assert!(matches!(result, Err(PerfError::Storage(_))));
    }

    #[test]
    fn test_nan_money_serializes_as_null() {
        let report = assemble_report(aggregated(), tasks(), SavingsEstimate {
            work_cost: f64::NAN,
            ..Default::default()
        });
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["money"]["workCost"], serde_json::Value::Null);
    }
}
