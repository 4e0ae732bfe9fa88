//! Monitoring service
//!
//! Drives one work item through its lifecycle:
//! - Preprocessing on the EOP preprocessing service
//! - Download of the preprocessing input and monitoring on the EOP monitoring service
//! - Upload of the `alert` and `nat2000` results to the backend
//!
//! Stages run strictly in sequence. The first failure aborts the work item;
//! nothing is retried here.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use foliage_client::EopClient;
use foliage_core::domain::naming::ResultKind;
use foliage_core::domain::outcome::MonitoringOutcome;
use foliage_core::domain::work_item::WorkItem;
use foliage_core::dto::monitor::MonitorRequest;
use tracing::{debug, info};

use crate::service::transfer::FileTransferGateway;

/// Service trait for processing a claimed work item
#[async_trait]
pub trait MonitoringService: Send + Sync {
    /// Runs every enabled stage for `item`
    ///
    /// # Returns
    /// The outcome to report back to the backend
    async fn process(&self, item: &WorkItem) -> Result<MonitoringOutcome>;
}

/// Per-run stage settings
#[derive(Debug, Clone)]
pub struct StageSettings {
    pub region_code: String,
    pub skip_preprocessing: bool,
    pub skip_monitoring: bool,
}

/// Standard implementation of MonitoringService
pub struct StandardMonitoringService {
    settings: StageSettings,
    preprocessing: EopClient,
    monitoring: EopClient,
    gateway: FileTransferGateway,
}

impl StandardMonitoringService {
    /// Creates a new standard monitoring service
    ///
    /// # Arguments
    /// * `settings` - Region code and skip flags
    /// * `preprocessing` - Client for the EOP preprocessing service
    /// * `monitoring` - Client for the EOP monitoring service
    /// * `gateway` - File transfer between the shared directory and the backend
    pub fn new(
        settings: StageSettings,
        preprocessing: EopClient,
        monitoring: EopClient,
        gateway: FileTransferGateway,
    ) -> Self {
        Self {
            settings,
            preprocessing,
            monitoring,
            gateway,
        }
    }

    async fn run_preprocessing(&self, item: &WorkItem) -> Result<()> {
        if self.settings.skip_preprocessing {
            info!("Skipping preprocessing stage");
            return Ok(());
        }

        info!("Preprocessing stage - START");
        let data = self
            .preprocessing
            .preprocess(
                item.scheduled_start_time,
                &self.settings.region_code,
                &item.processing_window(),
            )
            .await
            .with_context(|| format!("Preprocessing failed for activity {}", item.request_id))?;
        debug!("Preprocessing returned: {}", data);
        info!("Preprocessing stage - COMPLETED");

        Ok(())
    }

    async fn run_monitoring(&self, item: &WorkItem) -> Result<()> {
        if self.settings.skip_monitoring {
            info!("Skipping monitoring stage");
            return Ok(());
        }

        self.gateway.fetch_preprocessing_input(item).await?;

        info!("Monitoring stage - START");
        let body = MonitorRequest::new(
            item.scheduled_start_time,
            &self.settings.region_code,
            &item.processing_window(),
            &self.gateway.layout().container_preprocessing_path(),
        );

        let data = self
            .monitoring
            .monitor(&body)
            .await
            .with_context(|| format!("Monitoring failed for activity {}", item.request_id))?;
        debug!("Monitoring returned: {}", data);
        info!("Monitoring stage - COMPLETED");

        Ok(())
    }

    async fn upload_results(&self, item: &WorkItem) -> Result<()> {
        info!("Result upload - START");
        for kind in ResultKind::ALL {
            self.gateway.upload_result(item, kind).await?;
        }
        info!("Result upload - COMPLETED");

        Ok(())
    }
}

#[async_trait]
impl MonitoringService for StandardMonitoringService {
    async fn process(&self, item: &WorkItem) -> Result<MonitoringOutcome> {
        let started_at: NaiveDateTime = Local::now().naive_local();
        let window = item.processing_window();
        info!(
            "Processing activity {} (window {} - {})",
            item.request_id, window.start, window.end
        );

        self.run_preprocessing(item).await?;
        self.run_monitoring(item).await?;

        // Results are uploaded even when monitoring was skipped; they must
        // then already be in the shared directory.
        self.upload_results(item).await?;

        Ok(MonitoringOutcome::new(item.request_id.clone(), started_at))
    }
}
