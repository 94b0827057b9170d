pub mod routes;
pub mod models;
pub mod errors;
pub mod auth;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use dashmap::{mapref::entry::Entry, DashMap};
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::errors::PerfError;
use crate::lighthouse::AuditEngine;
use crate::llm::LLMProvider;
use crate::pipeline::AnalysisPipeline;
use crate::storage::ReportStorage;

/// Shared, read-only service handles plus the registry of in-flight runs.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub engine: Arc<dyn AuditEngine>,
    pub llm: Arc<dyn LLMProvider>,
    pub storage: Arc<dyn ReportStorage>,
    pub active_runs: Arc<DashMap<String, CancellationToken>>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        engine: Arc<dyn AuditEngine>,
        llm: Arc<dyn LLMProvider>,
        storage: Arc<dyn ReportStorage>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            engine,
            llm,
            storage,
            active_runs: Arc::new(DashMap::new()),
        }
    }

    /// Each request gets its own pipeline; only the client handles are shared.
    pub fn pipeline(&self) -> AnalysisPipeline {
        AnalysisPipeline::new(
            self.engine.clone(),
            self.llm.clone(),
            Some(self.storage.clone()),
            &self.config,
        )
    }

    /// Register a cancellation token for `guid`. A guid can only have one
    /// run in flight.
    pub fn register_run(&self, guid: &str) -> Result<RunGuard, PerfError> {
        match self.active_runs.entry(guid.to_string()) {
            Entry::Occupied(_) => Err(PerfError::InvalidRequest(format!(
                "analysis {} is already running",
                guid
            ))),
            Entry::Vacant(slot) => {
                let token = CancellationToken::new();
                slot.insert(token.clone());
                Ok(RunGuard {
                    active_runs: self.active_runs.clone(),
                    guid: guid.to_string(),
                    token,
                })
            }
        }
    }
}

/// Cancels and unregisters its run when dropped.
pub struct RunGuard {
    active_runs: Arc<DashMap<String, CancellationToken>>,
    guid: String,
    token: CancellationToken,
}

impl RunGuard {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.token.cancel();
        self.active_runs.remove(&self.guid);
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/analyze", post(routes::analyze::analyze).get(routes::analyze::analyze))
        .route("/api/analyze/:guid/cancel", post(routes::analyze::cancel_analysis))
        .route("/api/reports/:guid", get(routes::reports::get_report))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::api_auth_middleware))
        .route("/api/health", get(routes::health::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
