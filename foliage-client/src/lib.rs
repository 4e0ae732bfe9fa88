//! Foliage HTTP Clients
//!
//! Type-safe clients for the two kinds of remote systems the monitoring batch
//! talks to:
//!
//! - [`BackendClient`]: the Foliage backend, which hands out monitoring
//!   activities, serves preprocessing input files and receives results.
//!   Every request carries basic-auth credentials.
//! - [`EopClient`]: one of the anonymous EOP processing services
//!   (preprocessing or monitoring). Long-running calls go through a
//!   [`JobPoller`].
//!
//! # Example
//!
//! ```no_run
//! use foliage_client::{BackendClient, Credentials};
//!
//! #[tokio::main]
//! async fn main() -> foliage_client::Result<()> {
//!     let backend = BackendClient::new(
//!         "http://localhost:8080/foliage/",
//!         "batch-01",
//!         Credentials::new("batch", "secret"),
//!     )?;
//!
//!     while let Some(item) = backend.claim_activity().await? {
//!         println!("Claimed activity {}", item.request_id);
//!     }
//!     Ok(())
//! }
//! ```

mod activities;
pub mod eop;
pub mod error;
pub mod poller;
mod transfers;

// Re-export commonly used types
pub use eop::EopClient;
pub use error::{ClientError, Result};
pub use poller::JobPoller;

use reqwest::{Client, RequestBuilder, Url};
use tracing::{debug, error};

/// Basic-auth credentials for the backend
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// HTTP client for the Foliage backend
///
/// Groups of endpoints:
/// - Activity queue (claim the next activity, report its completion)
/// - File transfer (download preprocessing input, upload results)
#[derive(Debug, Clone)]
pub struct BackendClient {
    /// Base URL, always ending with `/` (e.g., "http://localhost:8080/foliage/")
    base_url: String,
    /// Identifier this batch claims activities as
    client_id: String,
    credentials: Credentials,
    /// HTTP client instance
    client: Client,
}

impl BackendClient {
    /// Create a new backend client
    ///
    /// Fails with [`ClientError::InvalidUrl`] if the base URL does not parse.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the backend API; a trailing `/` is added if missing
    /// * `client_id` - Identifier of this batch instance
    /// * `credentials` - Basic-auth credentials sent with every request
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        credentials: Credentials,
    ) -> Result<Self> {
        Self::with_client(base_url, client_id, credentials, Client::new())
    }

    /// Create a new backend client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        credentials: Credentials,
        client: Client,
    ) -> Result<Self> {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let backend = Self {
            base_url,
            client_id: client_id.into(),
            credentials,
            client,
        };

        Url::parse(&backend.activity_url())
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", backend.activity_url(), e)))?;

        Ok(backend)
    }

    /// Get the base URL of the backend
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn activity_url(&self) -> String {
        format!("{}attivita/{}", self.base_url, self.client_id)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.basic_auth(
            &self.credentials.username,
            Some(&self.credentials.password),
        )
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Check the status code and return the body as text
    ///
    /// Non-2xx responses become [`ClientError::ApiError`] carrying the body.
    async fn handle_text_response(&self, url: &str, response: reqwest::Response) -> Result<String> {
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Request to {} failed with status {}: {}", url, status, body);
            return Err(ClientError::api_error(status.as_u16(), url, body));
        }

        let body = response.text().await?;
        debug!("Received from {}: {}", url, body);
        Ok(body)
    }

    /// Handle a response whose body is not needed
    async fn handle_empty_response(&self, url: &str, response: reqwest::Response) -> Result<()> {
        self.handle_text_response(url, response).await.map(|_| ())
    }
}
