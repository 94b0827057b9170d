pub mod blob;
pub mod local;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{StorageConfig, StorageKind};
use crate::errors::PerfError;

pub use blob::BlobStorage;
pub use local::LocalStorage;
pub use sqlite::SqliteStorage;

/// Named-blob store for finished reports.
#[async_trait]
pub trait ReportStorage: Send + Sync {
    /// Write `body` under `name`, replacing any previous content.
    async fn put(&self, name: &str, body: &str) -> Result<(), PerfError>;

    /// `Ok(None)` when nothing is stored under `name`.
    async fn get(&self, name: &str) -> Result<Option<String>, PerfError>;

    fn backend_name(&self) -> &str;
}

pub fn report_blob_name(guid: &str) -> String {
    format!("report_{}.json", guid)
}

/// Blob names end up in file paths and URLs, so only a conservative
/// character set is allowed.
pub fn validate_blob_name(name: &str) -> Result<(), PerfError> {
    let valid = !name.is_empty()
        && name.len() <= 255
        && !name.starts_with('.')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(PerfError::InvalidRequest(format!("Invalid report name: {:?}", name)))
    }
}

pub fn create_storage(config: &StorageConfig) -> Result<Arc<dyn ReportStorage>, PerfError> {
    match config.kind {
        StorageKind::Local => Ok(Arc::new(LocalStorage::new(&config.directory))),
        StorageKind::Blob => {
            let url = config.container_url.as_deref().ok_or_else(|| {
                PerfError::Config(
                    "storage.kind is blob but no container URL is set (storage.container_url or BLOB_STORAGE_CONTAINER_URL)".into(),
                )
            })?;
            Ok(Arc::new(BlobStorage::new(url)?))
        }
        StorageKind::Sqlite => Ok(Arc::new(SqliteStorage::open(&config.database)?)),
    }
}
