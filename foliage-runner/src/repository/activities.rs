//! Activities repository
//!
//! Handles the activity queue on the backend:
//! - Claiming the next pending activity
//! - Reporting completion

use anyhow::{Context, Result};
use async_trait::async_trait;
use foliage_client::BackendClient;
use foliage_core::domain::outcome::MonitoringOutcome;
use foliage_core::domain::work_item::WorkItem;
use std::sync::Arc;

/// Repository trait for the backend activity queue
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Claims the next pending activity for this batch
    ///
    /// Returns `None` once the queue is drained.
    async fn claim_next(&self) -> Result<Option<WorkItem>>;

    /// Reports a processed activity
    ///
    /// # Arguments
    /// * `outcome` - Request id and processing start time
    async fn complete(&self, outcome: &MonitoringOutcome) -> Result<()>;
}

/// HTTP implementation of ActivityRepository
pub struct HttpActivityRepository {
    client: Arc<BackendClient>,
}

impl HttpActivityRepository {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ActivityRepository for HttpActivityRepository {
    async fn claim_next(&self) -> Result<Option<WorkItem>> {
        self.client
            .claim_activity()
            .await
            .context("Failed to claim the next activity")
    }

    async fn complete(&self, outcome: &MonitoringOutcome) -> Result<()> {
        self.client
            .complete_activity(outcome)
            .await
            .with_context(|| format!("Failed to complete activity {}", outcome.request_id))
    }
}
