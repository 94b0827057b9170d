pub mod aggregator;
pub mod enrichment;
pub mod orchestrator;
pub mod store;

pub use aggregator::MeasurementAggregator;
pub use enrichment::EnrichmentPipeline;
pub use orchestrator::{AnalysisPipeline, AnalysisRequest};
pub use store::FindingStore;
