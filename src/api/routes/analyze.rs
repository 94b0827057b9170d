use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::api::models::{AnalyzeParams, CancelResponse};
use crate::api::AppState;
use crate::errors::PerfError;
use crate::models::AnalysisReport;

/// Runs one analysis. Parameters come from the query string and/or a JSON
/// body; query fields win and the body fills whatever the query leaves out.
pub async fn analyze(
    State(state): State<AppState>,
    query: Result<Query<AnalyzeParams>, QueryRejection>,
    body: Bytes,
) -> Result<Json<AnalysisReport>, PerfError> {
    let Query(query) = query.map_err(|e| PerfError::InvalidRequest(e.body_text()))?;
    let params = if body.iter().all(u8::is_ascii_whitespace) {
        query
    } else {
        let from_body: AnalyzeParams = serde_json::from_slice(&body)
            .map_err(|e| PerfError::InvalidRequest(format!("Invalid JSON body: {}", e)))?;
        query.merge(from_body)
    };
    let request = params.into_request()?;

    // Dropping the guard (finished, failed, or client gone) cancels the run
    // and unregisters it.
    let run = state.register_run(&request.guid)?;
    let pipeline = state.pipeline();
    let deadline = Duration::from_secs(state.config.server.request_timeout_secs);

    let outcome = tokio::select! {
        result = pipeline.run(&request, run.token()) => result,
        _ = tokio::time::sleep(deadline) => {
            run.token().cancel();
            Err(PerfError::Timeout(format!(
                "analysis {} exceeded {}s",
                request.guid,
                deadline.as_secs()
            )))
        }
    };

    match outcome {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            error!(guid = %request.guid, url = %request.url, error = %e, "Analysis failed");
            Err(e)
        }
    }
}

pub async fn cancel_analysis(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> Result<Json<CancelResponse>, (StatusCode, Json<Value>)> {
    match state.active_runs.get(&guid) {
        Some(token) => {
            token.cancel();
            info!(guid = %guid, "Analysis cancellation requested");
            Ok(Json(CancelResponse { guid, cancelled: true }))
        }
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "No running analysis with that guid"})),
        )),
    }
}
