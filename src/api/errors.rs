use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use crate::errors::PerfError;

impl PerfError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PerfError::InvalidRequest(_) | PerfError::Config(_) => StatusCode::BAD_REQUEST,
            PerfError::Authentication(_) => StatusCode::UNAUTHORIZED,
            PerfError::Cancelled(_) => StatusCode::REQUEST_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PerfError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = json!({
            "error": self.to_string(),
            "type": self.classify().error_type,
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(PerfError::InvalidRequest("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(PerfError::Authentication("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(PerfError::Cancelled("x".into()).status_code(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(PerfError::Storage("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(PerfError::AuditEngine("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
