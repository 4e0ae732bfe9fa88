//! Foliage Runner
//!
//! A one-shot batch worker that drains pending monitoring activities from the
//! Foliage backend.
//!
//! Architecture:
//! - Configuration: Command-line flags with environment fallback
//! - Repositories: Activity queue on the backend
//! - Services: Work item lifecycle, file transfers, EOP readiness check
//! - Scheduler: Claim, process and report loop
//!
//! Each claimed activity runs preprocessing and monitoring on the EOP
//! services, uploads the results and is reported back before the next claim.
//! The process exits non-zero on the first failure.

mod config;
mod repository;
mod scheduler;
mod service;

use anyhow::{Context, Result};
use clap::Parser;
use foliage_client::{BackendClient, Credentials, EopClient, JobPoller};
use reqwest::Client;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::repository::{ActivityRepository, HttpActivityRepository};
use crate::scheduler::ActivityDriver;
use crate::service::{
    FileTransferGateway, MonitoringService, StandardMonitoringService, check_requirements,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "foliage_runner=info,foliage_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Foliage Runner");

    let config = load_config()?;
    info!(
        "Loaded configuration: client_id={}, backend_base_url={}, region_code={}",
        config.client_id, config.backend_base_url, config.region_code
    );

    let backend = Arc::new(
        BackendClient::new(
            config.backend_base_url.clone(),
            config.client_id.clone(),
            Credentials::new(
                config.backend_username.clone(),
                config.backend_password.clone(),
            ),
        )
        .context("Failed to create backend client")?,
    );
    info!("Backend client initialized for {}", backend.base_url());

    let poller = JobPoller::new(Client::new())
        .with_attempt_timeout(config.attempt_timeout())
        .with_max_wait(config.max_wait());
    let preprocessing = EopClient::with_poller(config.preprocessing_url.clone(), poller.clone())
        .context("Failed to create preprocessing client")?;
    let monitoring = EopClient::with_poller(config.monitoring_url.clone(), poller)
        .context("Failed to create monitoring client")?;

    info!("Clients initialized");

    if config.check_services {
        check_requirements(&preprocessing, &monitoring).await?;
    }

    let gateway = FileTransferGateway::new(
        Arc::clone(&backend),
        config.shared_directory(),
        config.region_code.clone(),
    );
    let monitoring_service: Arc<dyn MonitoringService> = Arc::new(
        StandardMonitoringService::new(config.stage_settings(), preprocessing, monitoring, gateway),
    );
    let activities: Arc<dyn ActivityRepository> = Arc::new(HttpActivityRepository::new(backend));

    info!(
        "Poll attempt timeout: {:?}, max wait: {:?}",
        config.attempt_timeout(),
        config.max_wait()
    );

    let driver = ActivityDriver::new(activities, monitoring_service);
    match driver.run().await {
        Ok(processed) => {
            info!("Run completed, {} activity(ies) processed", processed);
            Ok(())
        }
        Err(e) => {
            error!("Run aborted: {:#}", e);
            Err(e)
        }
    }
}

/// Loads configuration from flags and environment variables
fn load_config() -> Result<Config> {
    let config = Config::parse();
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
