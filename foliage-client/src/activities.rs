//! Activity queue endpoints

use crate::BackendClient;
use crate::error::{ClientError, Result};
use foliage_core::domain::outcome::MonitoringOutcome;
use foliage_core::domain::work_item::WorkItem;
use tracing::{debug, info};

impl BackendClient {
    // =============================================================================
    // Activity Lifecycle
    // =============================================================================

    /// Claim the next pending monitoring activity
    ///
    /// The backend answers 2xx with an empty body (or `null`) when the queue
    /// is drained.
    ///
    /// # Returns
    /// The claimed work item, or `None` if there is nothing left to do
    pub async fn claim_activity(&self) -> Result<Option<WorkItem>> {
        let url = self.activity_url();
        debug!("POST {}", url);

        let response = self.authorized(self.client.post(&url)).send().await?;
        let body = self.handle_text_response(&url, response).await?;

        parse_claim_body(&body)
    }

    /// Report that an activity has been fully processed
    ///
    /// # Arguments
    /// * `outcome` - The completion record to send
    pub async fn complete_activity(&self, outcome: &MonitoringOutcome) -> Result<()> {
        let url = self.activity_url();
        info!("Completing activity {}", outcome.request_id);
        debug!("PUT {}", url);

        let response = self
            .authorized(self.client.put(&url))
            .json(outcome)
            .send()
            .await?;

        self.handle_empty_response(&url, response).await
    }
}

fn parse_claim_body(body: &str) -> Result<Option<WorkItem>> {
    let body = body.trim();
    if body.is_empty() {
        return Ok(None);
    }

    serde_json::from_str::<Option<WorkItem>>(body)
        .map_err(|e| ClientError::ParseError(format!("Invalid activity payload: {}", e)))
}
