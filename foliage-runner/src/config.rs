//! Runner configuration
//!
//! Every option can be given as a command-line flag or through the matching
//! environment variable. Read once at startup and never mutated afterwards.

use clap::Parser;
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;

use crate::service::{SharedDirectory, StageSettings};

/// Monitoring batch configuration
#[derive(Debug, Clone, Parser)]
#[command(name = "foliage-runner")]
#[command(about = "Drains pending monitoring activities from the Foliage backend", long_about = None)]
pub struct Config {
    /// Backend base URL (e.g., "http://backend:8080/foliage/")
    #[arg(long, env = "FOLIAGE_BACKEND_BASE_URL")]
    pub backend_base_url: String,

    /// Identifier this batch claims activities as
    #[arg(long, env = "FOLIAGE_CLIENT_ID")]
    pub client_id: String,

    #[arg(long, env = "FOLIAGE_BACKEND_USERNAME")]
    pub backend_username: String,

    #[arg(long, env = "FOLIAGE_BACKEND_PASSWORD", hide_env_values = true)]
    pub backend_password: String,

    /// Base URL of the EOP preprocessing service
    #[arg(long, env = "FOLIAGE_EOP_PREPROCESSING_URL")]
    pub preprocessing_url: String,

    /// Base URL of the EOP monitoring service
    #[arg(long, env = "FOLIAGE_EOP_MONITORING_URL")]
    pub monitoring_url: String,

    /// Region all downstream calls are scoped to
    #[arg(long, env = "FOLIAGE_REGION_CODE")]
    pub region_code: String,

    /// Shared directory as mounted on this host
    #[arg(long, env = "FOLIAGE_SHARED_DIR_LOCAL_PATH")]
    pub shared_dir_local: PathBuf,

    /// Shared directory as mounted inside the EOP containers
    #[arg(long, env = "FOLIAGE_SHARED_DIR_CONTAINER_PATH")]
    pub shared_dir_container: String,

    /// Preprocessing input file, relative to the shared directory
    #[arg(long, env = "FOLIAGE_PREPROCESSING_DATA_PATH")]
    pub preprocessing_data_path: String,

    #[arg(long, env = "FOLIAGE_SKIP_PREPROCESSING")]
    pub skip_preprocessing: bool,

    #[arg(long, env = "FOLIAGE_SKIP_MONITORING")]
    pub skip_monitoring: bool,

    /// Ping both EOP services before claiming any activity
    #[arg(long, env = "FOLIAGE_CHECK_SERVICES")]
    pub check_services: bool,

    /// Seconds to wait on a running EOP job before logging and waiting again
    #[arg(long, env = "FOLIAGE_POLL_ATTEMPT_TIMEOUT", default_value_t = 1800)]
    pub poll_attempt_timeout: u64,

    /// Seconds after which a running EOP job is abandoned (unbounded if unset)
    #[arg(long, env = "FOLIAGE_POLL_MAX_WAIT")]
    pub poll_max_wait: Option<u64>,
}

impl Config {
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_attempt_timeout)
    }

    pub fn max_wait(&self) -> Option<Duration> {
        self.poll_max_wait.map(Duration::from_secs)
    }

    pub fn stage_settings(&self) -> StageSettings {
        StageSettings {
            region_code: self.region_code.clone(),
            skip_preprocessing: self.skip_preprocessing,
            skip_monitoring: self.skip_monitoring,
        }
    }

    pub fn shared_directory(&self) -> SharedDirectory {
        SharedDirectory {
            local_mount: self.shared_dir_local.clone(),
            container_mount: self.shared_dir_container.clone(),
            preprocessing_data_path: self.preprocessing_data_path.clone(),
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.client_id.is_empty() {
            anyhow::bail!("client_id cannot be empty");
        }

        if self.region_code.is_empty() {
            anyhow::bail!("region_code cannot be empty");
        }

        if self.preprocessing_data_path.is_empty() {
            anyhow::bail!("preprocessing_data_path cannot be empty");
        }

        for (name, url) in [
            ("backend_base_url", &self.backend_base_url),
            ("preprocessing_url", &self.preprocessing_url),
            ("monitoring_url", &self.monitoring_url),
        ] {
            let parsed = Url::parse(url)
                .map_err(|e| anyhow::anyhow!("{} is not a valid URL ({}): {}", name, url, e))?;

            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                anyhow::bail!("{} must start with http:// or https://", name);
            }
        }

        if self.poll_attempt_timeout == 0 {
            anyhow::bail!("poll_attempt_timeout must be greater than 0");
        }

        if self.poll_max_wait == Some(0) {
            anyhow::bail!("poll_max_wait must be greater than 0 when set");
        }

        Ok(())
    }
}
