use crate::api;
use crate::cli::commands::ServeArgs;
use crate::cli::{load, Services};
use crate::errors::PerfError;
use tracing::info;

pub async fn handle_serve(args: ServeArgs) -> Result<(), PerfError> {
    let config = load(args.config.as_deref()).await?;
    let services = Services::from_config(&config)?;

    info!(host = %args.host, port = args.port, "Starting API server");
    let state = api::AppState::new(config, services.engine, services.llm, services.storage);
    let app = api::build_router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .map_err(|e| PerfError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
