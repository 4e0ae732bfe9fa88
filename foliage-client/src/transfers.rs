//! File transfer endpoints
//!
//! Large inputs and results move through the shared filesystem; these
//! endpoints copy them between that filesystem and the backend.

use crate::BackendClient;
use crate::error::{ClientError, Result};
use foliage_core::domain::naming::ResultKind;
use foliage_core::domain::work_item::RequestId;
use reqwest::Body;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, error, info};

impl BackendClient {
    // =============================================================================
    // File Transfer
    // =============================================================================

    /// Download the preprocessing input of an activity to `destination`
    ///
    /// Parent directories are created as needed and an existing file is
    /// overwritten. Nothing is written when the backend answers non-2xx.
    pub async fn download_preprocessing_data(
        &self,
        request_id: &RequestId,
        destination: &Path,
    ) -> Result<()> {
        let url = format!("{}dati-preelaborazione/{}", self.base_url, request_id);
        info!("Fetching preprocessing data for activity {}", request_id);
        debug!("GET {}", url);

        let mut response = self.authorized(self.client.get(&url)).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Download from {} failed with status {}: {}", url, status, body);
            return Err(ClientError::api_error(status.as_u16(), &url, body));
        }

        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ClientError::transfer(parent, e))?;
        }

        debug!("Saving {}", destination.display());
        let mut file = tokio::fs::File::create(destination)
            .await
            .map_err(|e| ClientError::transfer(destination, e))?;

        let mut written = 0usize;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk)
                .await
                .map_err(|e| ClientError::transfer(destination, e))?;
            written += chunk.len();
        }
        file.flush()
            .await
            .map_err(|e| ClientError::transfer(destination, e))?;

        debug!("Saved {} bytes to {}", written, destination.display());
        Ok(())
    }

    /// Upload a result artifact of an activity
    ///
    /// The backend expects `Content-Type: application/json` on this endpoint
    /// whatever the file holds.
    pub async fn upload_result(
        &self,
        request_id: &RequestId,
        kind: ResultKind,
        source: &Path,
    ) -> Result<()> {
        let url = format!(
            "{}risultati-monitoraggio/{}/{}",
            self.base_url, request_id, kind
        );
        info!("Uploading {} result {}", kind, source.display());

        let file = tokio::fs::File::open(source)
            .await
            .map_err(|e| ClientError::transfer(source, e))?;
        let size = file
            .metadata()
            .await
            .map_err(|e| ClientError::transfer(source, e))?
            .len();

        debug!("PUT {} ({} bytes)", url, size);
        let response = self
            .authorized(self.client.put(&url))
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_LENGTH, size)
            .body(Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await?;

        self.handle_empty_response(&url, response).await
    }
}
