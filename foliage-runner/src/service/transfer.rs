//! File transfer gateway
//!
//! Maps work items onto files in the shared directory and moves those files
//! to and from the backend.

use anyhow::{Context, Result};
use foliage_client::BackendClient;
use foliage_core::domain::naming::{ResultKind, result_file_name};
use foliage_core::domain::work_item::WorkItem;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Layout of the directory shared with the EOP containers
#[derive(Debug, Clone)]
pub struct SharedDirectory {
    /// Mount point on this host
    pub local_mount: PathBuf,
    /// Mount point inside the EOP containers
    pub container_mount: String,
    /// Preprocessing input, relative to the mount point
    pub preprocessing_data_path: String,
}

impl SharedDirectory {
    pub fn preprocessing_input_path(&self) -> PathBuf {
        self.local_mount.join(&self.preprocessing_data_path)
    }

    /// The preprocessing input as the monitoring container sees it
    pub fn container_preprocessing_path(&self) -> String {
        format!("{}/{}", self.container_mount, self.preprocessing_data_path)
    }

    pub fn result_path(&self, file_name: &str) -> PathBuf {
        self.local_mount.join("output").join(file_name)
    }
}

/// Moves preprocessing inputs and monitoring results for work items
pub struct FileTransferGateway {
    backend: Arc<BackendClient>,
    layout: SharedDirectory,
    region_code: String,
}

impl FileTransferGateway {
    pub fn new(backend: Arc<BackendClient>, layout: SharedDirectory, region_code: String) -> Self {
        Self {
            backend,
            layout,
            region_code,
        }
    }

    pub fn layout(&self) -> &SharedDirectory {
        &self.layout
    }

    /// Downloads the work item's preprocessing input into the shared directory
    pub async fn fetch_preprocessing_input(&self, item: &WorkItem) -> Result<()> {
        let destination = self.layout.preprocessing_input_path();

        self.backend
            .download_preprocessing_data(&item.request_id, &destination)
            .await
            .with_context(|| {
                format!(
                    "Failed to fetch preprocessing data for activity {}",
                    item.request_id
                )
            })
    }

    /// Uploads one result artifact of the work item from the shared `output` directory
    pub async fn upload_result(&self, item: &WorkItem, kind: ResultKind) -> Result<()> {
        let file_name = result_file_name(
            item.scheduled_start_time,
            &self.region_code,
            &item.processing_window(),
            kind,
        );
        let source = self.layout.result_path(&file_name);
        debug!("Sending file {}", file_name);

        self.backend
            .upload_result(&item.request_id, kind, &source)
            .await
            .with_context(|| {
                format!(
                    "Failed to upload {} result for activity {}",
                    kind, item.request_id
                )
            })
    }
}
