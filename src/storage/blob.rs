use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, warn};

use crate::config::credentials::redact_credentials;
use crate::errors::PerfError;
use super::{validate_blob_name, ReportStorage};

/// Block blobs in a cloud storage container addressed by a SAS URL
/// (`https://<account>.blob.core.windows.net/<container>?<sas>`).
pub struct BlobStorage {
    client: Client,
    container: Url,
}

impl BlobStorage {
    pub fn new(container_url: &str) -> Result<Self, PerfError> {
        let container = Url::parse(container_url)
            .map_err(|_| PerfError::Config("Blob container URL is not a valid URL".into()))?;
        if !matches!(container.scheme(), "http" | "https") || container.cannot_be_a_base() {
            return Err(PerfError::Config("Blob container URL must be an http(s) URL".into()));
        }
        Ok(Self { client: Client::new(), container })
    }

    /// Container path plus `name`, keeping the SAS query string.
    fn blob_url(&self, name: &str) -> Result<Url, PerfError> {
        validate_blob_name(name)?;
        let mut url = self.container.clone();
        url.path_segments_mut()
            .map_err(|_| PerfError::Config("Blob container URL cannot carry a path".into()))?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }

    /// The SAS signature must never end up in logs or error payloads.
    fn scrub(&self, text: &str) -> String {
        match self.container.query() {
            Some(query) => redact_credentials(text, &[query]),
            None => text.to_string(),
        }
    }
}

#[async_trait]
impl ReportStorage for BlobStorage {
    async fn put(&self, name: &str, body: &str) -> Result<(), PerfError> {
        let url = self.blob_url(name)?;
        let resp = self.client
            .put(url)
            .header("x-ms-blob-type", "BlockBlob")
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| PerfError::Storage(self.scrub(&format!("Blob upload failed: {}", e))))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            warn!(blob = name, status = status.as_u16(), "Blob upload rejected");
            return Err(PerfError::Storage(self.scrub(&format!(
                "Blob upload of {} returned HTTP {}: {}",
                name,
                status.as_u16(),
                detail.chars().take(300).collect::<String>()
            ))));
        }

        debug!(blob = name, bytes = body.len(), "Report uploaded");
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Option<String>, PerfError> {
        let url = self.blob_url(name)?;
        let resp = self.client
            .get(url)
            .send()
            .await
            .map_err(|e| PerfError::Storage(self.scrub(&format!("Blob download failed: {}", e))))?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body = resp.text().await.map_err(|e| {
                    PerfError::Storage(self.scrub(&format!("Blob body unreadable: {}", e)))
                })?;
                Ok(Some(body))
            }
            status => Err(PerfError::Storage(format!(
                "Blob download of {} returned HTTP {}",
                name,
                status.as_u16()
            ))),
        }
    }

    fn backend_name(&self) -> &str { "blob" }
}
