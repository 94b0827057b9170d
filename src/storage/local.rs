use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::errors::PerfError;
use super::{validate_blob_name, ReportStorage};

/// Reports as plain files in one directory.
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, PerfError> {
        validate_blob_name(name)?;
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl ReportStorage for LocalStorage {
    async fn put(&self, name: &str, body: &str) -> Result<(), PerfError> {
        let path = self.path_for(name)?;
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            PerfError::Storage(format!("Cannot create {}: {}", self.root.display(), e))
        })?;

        // Write then rename so readers never see a half-written report.
        let tmp = self.root.join(format!(".{}.tmp", name));
        tokio::fs::write(&tmp, body).await.map_err(|e| {
            PerfError::Storage(format!("Cannot write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &path).await.map_err(|e| {
            PerfError::Storage(format!("Cannot move report into {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), bytes = body.len(), "Report written");
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Option<String>, PerfError> {
        let path = self.path_for(name)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PerfError::Storage(format!("Cannot read {}: {}", path.display(), e))),
        }
    }

    fn backend_name(&self) -> &str { "local" }
}
