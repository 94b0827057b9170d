use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::commands::AnalyzeArgs;
use crate::cli::{load, Services};
use crate::errors::PerfError;
use crate::models::BusinessParams;
use crate::pipeline::{AnalysisPipeline, AnalysisRequest};
use crate::storage::{report_blob_name, validate_blob_name};

pub async fn handle_analyze(args: AnalyzeArgs) -> Result<(), PerfError> {
    let config = load(args.config.as_deref()).await?;
    let services = Services::from_config(&config)?;

    let storage = (!args.no_store).then(|| services.storage.clone());
    let mut pipeline = AnalysisPipeline::new(services.engine, services.llm, storage, &config);
    if let Some(passes) = args.passes {
        pipeline = pipeline.with_passes(passes);
    }

    let request = AnalysisRequest {
        url: args.url,
        guid: args.guid.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        params: BusinessParams {
            visitor_quantity: args.visitors,
            pages_per_visit: args.pages_per_visit,
            ads_per_page: args.ads_per_page,
        },
    };
    if !args.no_store {
        validate_blob_name(&report_blob_name(&request.guid))?;
    }
    info!(guid = %request.guid, "Running analysis");

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling analysis");
            on_signal.cancel();
        }
    });

    let result = pipeline.run(&request, &cancel).await;
    watcher.abort();

    let report = result?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
