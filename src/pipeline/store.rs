use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::{Finding, MeasurementRun};

/// Per-execution collection of audit findings keyed by finding id.
///
/// Re-ingesting an id replaces the stored attributes (last write wins) but
/// keeps the slot of the first occurrence, so ranking ties resolve in first
/// ingestion order.
#[derive(Debug, Default)]
pub struct FindingStore {
    index: HashMap<String, usize>,
    findings: Vec<Finding>,
}

impl FindingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest(&mut self, run: &MeasurementRun) {
        for finding in &run.findings {
            match self.index.entry(finding.id.clone()) {
                Entry::Vacant(e) => {
                    e.insert(self.findings.len());
                    self.findings.push(finding.clone());
                }
                Entry::Occupied(e) => {
                    self.findings[*e.get()] = finding.clone();
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Findings with a guidance level, highest first. `sort_by` is stable so
    /// equal levels keep ingestion order.
    pub fn ranked_findings(&self) -> Vec<Finding> {
        let mut ranked: Vec<Finding> = self.findings.iter()
            .filter(|f| f.is_ranked())
            .cloned()
            .collect();
        ranked.sort_by(|a, b| b.guidance_level.cmp(&a.guidance_level));
        ranked
    }

    /// Sums each metric's savings over ranked, non-headline findings.
    pub fn saving_metrics(&self, headline_ids: &HashSet<&str>) -> BTreeMap<String, f64> {
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for finding in self.findings.iter()
            .filter(|f| f.is_ranked() && f.has_savings())
            .filter(|f| !headline_ids.contains(f.id.as_str()))
        {
            if let Some(savings) = &finding.metric_savings {
                for (metric, value) in savings {
                    *totals.entry(metric.clone()).or_insert(0.0) += value;
                }
            }
        }
        totals
    }

    /// Looks up each headline label's audit in `last_run`. A missing audit or
    /// one without a display value maps to `None`.
    pub fn headline_metric_values(
        headline_ids: &BTreeMap<String, String>,
        last_run: &MeasurementRun,
    ) -> BTreeMap<String, Option<String>> {
        headline_ids.iter()
            .map(|(label, id)| {
                let value = last_run.finding(id).and_then(|f| f.display_value.clone());
                (label.clone(), value)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(findings: Vec<Finding>) -> MeasurementRun {
        MeasurementRun { findings, ..Default::default() }
    }

    fn ids(findings: &[Finding]) -> Vec<&str> {
        findings.iter().map(|f| f.id.as_str()).collect()
    }

    #[test]
    fn test_ingest_last_write_wins() {
        let mut store = FindingStore::new();
        store.ingest(&run(vec![Finding::new("A").with_guidance_level(1).with_display_value("old")]));
        store.ingest(&run(vec![Finding::new("A").with_guidance_level(3).with_display_value("new")]));

        let ranked = store.ranked_findings();
        assert_eq!(store.len(), 1);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].guidance_level, Some(3));
        assert_eq!(ranked[0].display_value.as_deref(), Some("new"));
    }

    #[test]
    fn test_ranked_excludes_undefined_guidance() {
        let mut store = FindingStore::new();
        store.ingest(&run(vec![
            Finding::new("A").with_guidance_level(5),
            Finding::new("B").with_guidance_level(9),
            Finding::new("C"),
        ]));
        assert_eq!(ids(&store.ranked_findings()), vec!["B", "A"]);
    }

    #[test]
    fn test_ranked_ties_keep_ingestion_order() {
        let mut store = FindingStore::new();
        store.ingest(&run(vec![
            Finding::new("first").with_guidance_level(2),
            Finding::new("top").with_guidance_level(3),
            Finding::new("second").with_guidance_level(2),
        ]));
        // Overwriting keeps the original slot.
        store.ingest(&run(vec![Finding::new("first").with_guidance_level(2)]));
        assert_eq!(ids(&store.ranked_findings()), vec!["top", "first", "second"]);
    }

    #[test]
    fn test_ranked_is_idempotent() {
        let mut store = FindingStore::new();
        store.ingest(&run(vec![
            Finding::new("A").with_guidance_level(1),
            Finding::new("B").with_guidance_level(2),
        ]));
        assert_eq!(store.ranked_findings(), store.ranked_findings());
    }

    #[test]
    fn test_saving_metrics_excludes_headline_ids() {
        let mut store = FindingStore::new();
        store.ingest(&run(vec![
            Finding::new("x").with_guidance_level(3).with_saving("FCP", 100.0),
            Finding::new("LCP-id").with_guidance_level(2).with_saving("LCP", 500.0),
        ]));
        let headline: HashSet<&str> = HashSet::from(["LCP-id"]);
        let savings = store.saving_metrics(&headline);
        assert_eq!(savings, BTreeMap::from([("FCP".to_string(), 100.0)]));
    }

    #[test]
    fn test_saving_metrics_sums_and_skips_unranked() {
        let mut store = FindingStore::new();
        store.ingest(&run(vec![
            Finding::new("a").with_guidance_level(1).with_saving("TBT", 150.0).with_saving("LCP", 200.0),
            Finding::new("b").with_guidance_level(2).with_saving("TBT", 50.0),
            Finding::new("c").with_saving("TBT", 1000.0),
        ]));
        let savings = store.saving_metrics(&HashSet::new());
        assert_eq!(savings["TBT"], 200.0);
        assert_eq!(savings["LCP"], 200.0);
    }

    #[test]
    fn test_headline_values_from_last_run() {
        let headline = BTreeMap::from([
            ("TBT".to_string(), "total-blocking-time".to_string()),
            ("CLS".to_string(), "cumulative-layout-shift".to_string()),
        ]);
        let last = run(vec![Finding::new("total-blocking-time").with_display_value("350 ms")]);
        let values = FindingStore::headline_metric_values(&headline, &last);
        assert_eq!(values["TBT"].as_deref(), Some("350 ms"));
        assert_eq!(values["CLS"], None);
    }
}
