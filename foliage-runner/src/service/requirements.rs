//! EOP service readiness check

use anyhow::{Context, Result};
use foliage_client::EopClient;
use tracing::info;

/// Pings the preprocessing and monitoring services
///
/// Fails on the first service that is unreachable or answers with an
/// unsuccessful envelope.
pub async fn check_requirements(preprocessing: &EopClient, monitoring: &EopClient) -> Result<()> {
    info!("Checking EOP services");

    for (stage, client) in [("preprocessing", preprocessing), ("monitoring", monitoring)] {
        info!("Testing {}", stage);
        client
            .ping()
            .await
            .with_context(|| format!("{} service at {} is not ready", stage, client.base_url()))?;
    }

    info!("EOP services are ready");
    Ok(())
}
