use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::finding::Finding;

/// Read-only view over the finding store at the end of aggregation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedReport {
    /// Ranked findings, highest guidance level first.
    pub findings: Vec<Finding>,
    pub saving_metrics: BTreeMap<String, f64>,
    /// Headline label -> display value from the final run. Missing audits
    /// map to `None`.
    pub metrics: BTreeMap<String, Option<String>>,
    /// One entry per run.
    pub performance: Vec<Option<f64>>,
    pub accessibility: Vec<Option<f64>>,
    pub seo: Vec<Option<f64>>,
    /// Best-practices score of the last run.
    pub best_practices: Option<f64>,
}

impl AggregatedReport {
    pub fn saving(&self, metric: &str) -> f64 {
        self.saving_metrics.get(metric).copied().unwrap_or(0.0)
    }
}

/// A finding turned into a ticket with an effort estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedTask {
    pub finding: Finding,
    pub ticket_text: String,
    /// Raw completion text; expected to be a bare number of hours.
    pub estimate_hours: String,
}

impl EnrichedTask {
    /// Parsed estimate. Anything that is not a plain number yields NaN.
    pub fn hours(&self) -> f64 {
        let trimmed = self.estimate_hours.trim();
        if trimmed.is_empty() {
            return 0.0;
        }
        trimmed.parse::<f64>().unwrap_or(f64::NAN)
    }
}

/// `None` marks a finding whose enrichment failed irrecoverably. Its slot is
/// kept so the sequence lines up with the ranked findings.
pub type EnrichmentResult = Option<EnrichedTask>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsEstimate {
    pub work_cost: f64,
    pub potential_income_increase: f64,
    pub potential_revenue_gain: f64,
}

/// Final result returned to the caller and written to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub tasks: Vec<EnrichmentResult>,
    pub performance: Option<f64>,
    pub accessibility: Option<f64>,
    pub seo: Option<f64>,
    pub saving_metrics: BTreeMap<String, f64>,
    pub metrics: BTreeMap<String, Option<String>>,
    pub best_practices: Option<f64>,
    pub money: SavingsEstimate,
}

/// Traffic figures supplied with each analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessParams {
    pub visitor_quantity: f64,
    pub pages_per_visit: f64,
    pub ads_per_page: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(estimate: &str) -> EnrichedTask {
        EnrichedTask {
            finding: Finding::new("x"),
            ticket_text: "ticket".into(),
            estimate_hours: estimate.into(),
        }
    }

    #[test]
    fn test_hours_parses_plain_number() {
        assert_eq!(task("16").hours(), 16.0);
        assert_eq!(task(" 7.5\n").hours(), 7.5);
    }

    #[test]
    fn test_hours_non_numeric_is_nan() {
        assert!(task("about 8 hours").hours().is_nan());
    }

    #[test]
    fn test_hours_blank_is_zero() {
        assert_eq!(task("  ").hours(), 0.0);
    }

    #[test]
    fn test_report_serializes_null_sentinels_in_place() {
        let report = AnalysisReport {
            tasks: vec![Some(task("4")), None, Some(task("2"))],
            performance: Some(90.0),
            accessibility: None,
            seo: Some(100.0),
            saving_metrics: BTreeMap::new(),
            metrics: BTreeMap::from([("LCP".to_string(), None)]),
            best_practices: Some(0.96),
            money: SavingsEstimate::default(),
        };
        let value = serde_json::to_value(&report).unwrap();
        let tasks = value["tasks"].as_array().unwrap();
        assert_eq!(tasks.len(), 3);
        assert!(tasks[1].is_null());
        assert_eq!(tasks[0]["estimateHours"], "4");
        assert!(value["metrics"]["LCP"].is_null());
        assert!(value["money"].get("workCost").is_some());
        assert!(value.get("bestPractices").is_some());
    }

    #[test]
    fn test_missing_saving_metric_reads_as_zero() {
        let report = AggregatedReport::default();
        assert_eq!(report.saving("TBT"), 0.0);
    }
}
