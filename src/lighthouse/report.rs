use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::PerfError;
use crate::models::{CategoryScores, Finding, MeasurementRun};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Lhr {
    #[serde(default)]
    categories: LhrCategories,
    #[serde(default)]
    audits: Map<String, Value>,
    runtime_error: Option<LhrRuntimeError>,
}

#[derive(Debug, Default, Deserialize)]
struct LhrCategories {
    performance: Option<LhrCategory>,
    accessibility: Option<LhrCategory>,
    seo: Option<LhrCategory>,
    #[serde(rename = "best-practices")]
    best_practices: Option<LhrCategory>,
}

#[derive(Debug, Deserialize)]
struct LhrCategory {
    score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct LhrRuntimeError {
    code: Option<String>,
    message: Option<String>,
}

fn score(category: &Option<LhrCategory>) -> Option<f64> {
    category.as_ref().and_then(|c| c.score)
}

/// Parse a Lighthouse JSON result into a measurement run.
///
/// Audits keep document order. An audit record that does not fit the
/// finding shape is skipped rather than failing the whole pass.
pub fn parse_lhr(json: &str) -> Result<MeasurementRun, PerfError> {
    let lhr: Lhr = serde_json::from_str(json)
        .map_err(|e| PerfError::AuditEngine(format!("Unreadable Lighthouse report: {}", e)))?;

    if let Some(err) = lhr.runtime_error {
        return Err(PerfError::AuditEngine(format!(
            "Lighthouse runtime error {}: {}",
            err.code.as_deref().unwrap_or("UNKNOWN"),
            err.message.as_deref().unwrap_or("no message"),
        )));
    }

    let scores = CategoryScores {
        performance: score(&lhr.categories.performance),
        accessibility: score(&lhr.categories.accessibility),
        seo: score(&lhr.categories.seo),
        best_practices: score(&lhr.categories.best_practices),
    };

    let mut findings = Vec::with_capacity(lhr.audits.len());
    for (key, mut value) in lhr.audits {
        if let Some(obj) = value.as_object_mut() {
            obj.entry("id").or_insert_with(|| Value::String(key.clone()));
        }
        match serde_json::from_value::<Finding>(value) {
            Ok(finding) => findings.push(finding),
            Err(e) => warn!(audit = %key, error = %e, "Skipping malformed audit record"),
        }
    }

    debug!(audits = findings.len(), "Parsed Lighthouse report");
    Ok(MeasurementRun { scores, findings })
}
