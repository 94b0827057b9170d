pub mod analyze;
pub mod commands;
pub mod serve;

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::config::{self, AppConfig};
use crate::errors::PerfError;
use crate::lighthouse::{AuditEngine, LighthouseCli};
use crate::llm::{create_provider, LLMProvider};
use crate::storage::{create_storage, ReportStorage};

pub use commands::{Cli, Commands};

/// Clients shared by every analysis a process runs.
pub struct Services {
    pub engine: Arc<dyn AuditEngine>,
    pub llm: Arc<dyn LLMProvider>,
    pub storage: Arc<dyn ReportStorage>,
}

impl Services {
    pub fn from_config(config: &AppConfig) -> Result<Self, PerfError> {
        let engine: Arc<dyn AuditEngine> = Arc::new(LighthouseCli::new(&config.lighthouse));
        let llm = create_provider(&config.llm)?;
        let storage = create_storage(&config.storage)?;
        info!(
            engine = engine.engine_name(),
            provider = llm.provider_name(),
            model = llm.model_name(),
            storage = storage.backend_name(),
            "Services ready"
        );
        Ok(Self { engine, llm, storage })
    }
}

pub async fn load(config_path: Option<&str>) -> Result<AppConfig, PerfError> {
    config::load_config(config_path.map(Path::new)).await
}

pub async fn handle_validate(args: commands::ValidateArgs) -> Result<(), PerfError> {
    let path = Path::new(&args.config);
    let _config = config::parse_config(path).await?;
    println!("Configuration is valid: {}", args.config);
    Ok(())
}
