use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::api::AppState;
use crate::errors::PerfError;
use crate::storage::report_blob_name;

/// Serves a stored report exactly as it was written.
pub async fn get_report(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> Result<Response, PerfError> {
    let name = report_blob_name(&guid);
    match state.storage.get(&name).await? {
        Some(body) => Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Report not found", "guid": guid})),
        ).into_response()),
    }
}
