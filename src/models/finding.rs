use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A single diagnosed issue from a page audit.
///
/// Only the fields the pipeline reasons about are typed. Everything else the
/// audit engine reported (title, description, details tables) is carried in
/// `extra` so the serialized finding handed to the text service is the full
/// record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub id: String,
    /// Severity rank assigned by the audit engine. `None` means the finding
    /// is not actionable and never reaches the ranked list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guidance_level: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
    /// Metric name -> estimated improvement if remediated.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "numeric_savings"
    )]
    pub metric_savings: Option<BTreeMap<String, f64>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Finding {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            guidance_level: None,
            display_value: None,
            metric_savings: None,
            extra: Map::new(),
        }
    }

    pub fn with_guidance_level(mut self, level: i64) -> Self {
        self.guidance_level = Some(level);
        self
    }

    pub fn with_display_value(mut self, value: &str) -> Self {
        self.display_value = Some(value.to_string());
        self
    }

    pub fn with_saving(mut self, metric: &str, value: f64) -> Self {
        self.metric_savings
            .get_or_insert_with(BTreeMap::new)
            .insert(metric.to_string(), value);
        self
    }

    pub fn is_ranked(&self) -> bool {
        self.guidance_level.is_some()
    }

    pub fn has_savings(&self) -> bool {
        self.metric_savings.as_ref().is_some_and(|s| !s.is_empty())
    }
}

/// Keeps only the numeric entries of a `metricSavings` object. The audit
/// engine occasionally emits `null` for metrics it could not estimate.
fn numeric_savings<'de, D>(deserializer: D) -> Result<Option<BTreeMap<String, f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Map<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|map| {
        map.into_iter()
            .filter_map(|(metric, value)| value.as_f64().map(|v| (metric, v)))
            .collect()
    }))
}

/// Category scores reported by one audit run, each in [0, 1].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScores {
    pub performance: Option<f64>,
    pub accessibility: Option<f64>,
    pub seo: Option<f64>,
    pub best_practices: Option<f64>,
}

/// One invocation of the audit engine. Consumed by the aggregator, never
/// persisted on its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementRun {
    pub scores: CategoryScores,
    /// Raw audit records in the order the engine reported them.
    pub findings: Vec<Finding>,
}

impl MeasurementRun {
    pub fn finding(&self, id: &str) -> Option<&Finding> {
        self.findings.iter().find(|f| f.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_finding_deserialize_keeps_extra_fields() {
        let raw = json!({
            "id": "render-blocking-resources",
            "title": "Eliminate render-blocking resources",
            "guidanceLevel": 2,
            "displayValue": "Potential savings of 310 ms",
            "metricSavings": { "FCP": 300, "LCP": 310 },
            "details": { "type": "opportunity", "headings": [] }
        });
        let finding: Finding = serde_json::from_value(raw).unwrap();
        assert_eq!(finding.id, "render-blocking-resources");
        assert_eq!(finding.guidance_level, Some(2));
        assert_eq!(finding.metric_savings.as_ref().unwrap()["LCP"], 310.0);
        assert_eq!(finding.extra["title"], "Eliminate render-blocking resources");
        assert!(finding.extra.contains_key("details"));
    }

    #[test]
    fn test_finding_serialize_preserves_original_shape() {
        let raw = json!({
            "id": "unused-javascript",
            "guidanceLevel": 1,
            "score": 0.5
        });
        let finding: Finding = serde_json::from_value(raw).unwrap();
        let back = serde_json::to_value(&finding).unwrap();
        assert_eq!(back["guidanceLevel"], 1);
        assert_eq!(back["score"], 0.5);
        assert!(back.get("metricSavings").is_none());
    }

    #[test]
    fn test_null_guidance_level_is_unranked() {
        let finding: Finding = serde_json::from_value(json!({
            "id": "viewport",
            "guidanceLevel": null
        })).unwrap();
        assert!(!finding.is_ranked());
    }

    #[test]
    fn test_metric_savings_drops_non_numeric() {
        let finding: Finding = serde_json::from_value(json!({
            "id": "x",
            "metricSavings": { "FCP": 100, "CLS": null }
        })).unwrap();
        let savings = finding.metric_savings.unwrap();
        assert_eq!(savings.len(), 1);
        assert_eq!(savings["FCP"], 100.0);
    }

    #[test]
    fn test_has_savings_requires_entries() {
        let mut finding = Finding::new("x");
        assert!(!finding.has_savings());
        finding.metric_savings = Some(BTreeMap::new());
        assert!(!finding.has_savings());
        assert!(finding.with_saving("TBT", 20.0).has_savings());
    }
}
