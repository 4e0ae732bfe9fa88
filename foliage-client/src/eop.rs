//! EOP processing service client
//!
//! The preprocessing and monitoring services expose the same contract: a
//! `/ping` health endpoint and one job endpoint, both answering with a
//! [`ServiceEnvelope`]. A call succeeds only when the status is 2xx and the
//! envelope's success flag is set.

use chrono::NaiveDateTime;
use foliage_core::domain::job::JobResult;
use foliage_core::domain::naming::{date_stamp, minute_stamp};
use foliage_core::domain::window::ProcessingWindow;
use foliage_core::dto::envelope::ServiceEnvelope;
use foliage_core::dto::monitor::MonitorRequest;
use reqwest::{Client, Request, Url};
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::error::{ClientError, Result};
use crate::poller::{self, JobPoller};

/// Classifies a response from an EOP service
///
/// Pure function of status, body and target URL.
pub fn classify_response(status: u16, body: &str, url: &str) -> JobResult {
    if !(200..300).contains(&status) {
        return JobResult::TransportError {
            status,
            body: body.to_string(),
        };
    }

    match serde_json::from_str::<ServiceEnvelope>(body) {
        Ok(envelope) if envelope.succeeded() => {
            JobResult::Success(envelope.data.unwrap_or(JsonValue::Null))
        }
        Ok(envelope) => JobResult::ApplicationError(match envelope.error_description() {
            Some(description) => format!("Processing failed for request to {}: {}", url, description),
            None => format!("Processing failed for request to {}", url),
        }),
        Err(e) => JobResult::ApplicationError(format!(
            "Unreadable response from {}: {}",
            url, e
        )),
    }
}

/// Turns a non-success [`JobResult`] into the matching [`ClientError`]
pub fn require_success(url: &str, result: JobResult) -> Result<JsonValue> {
    match result {
        JobResult::Success(data) => Ok(data),
        JobResult::ApplicationError(message) => Err(ClientError::Application {
            url: url.to_string(),
            message,
        }),
        JobResult::TransportError { status, body } => {
            Err(ClientError::api_error(status, url, body))
        }
    }
}

/// Client for one EOP service
#[derive(Debug, Clone)]
pub struct EopClient {
    /// Base URL without trailing slash (e.g., "http://eop-preprocessing:8000")
    base_url: String,
    poller: JobPoller,
}

impl EopClient {
    /// Creates a client with a default [`JobPoller`]
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_poller(base_url, JobPoller::new(Client::new()))
    }

    /// Creates a client that drives long calls through `poller`
    ///
    /// The poller's HTTP client is used for every request.
    pub fn with_poller(base_url: impl Into<String>, poller: JobPoller) -> Result<Self> {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();

        Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        Ok(Self { base_url, poller })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn client(&self) -> &Client {
        self.poller.client()
    }

    /// Sends `request` and waits for it directly, without the poller
    pub async fn call(&self, request: Request) -> Result<JobResult> {
        poller::execute(self.client(), request).await
    }

    /// Checks that the service is up and answers with a successful envelope
    pub async fn ping(&self) -> Result<()> {
        let url = format!("{}/ping", self.base_url);
        info!("Checking connection to {} ...", url);

        let request = self.client().get(&url).build()?;
        let result = self.call(request).await?;

        require_success(&url, result).map(|_| ())
    }

    /// Builds the preprocessing request for a scheduled start and window
    pub fn preprocess_request(
        &self,
        scheduled_start: NaiveDateTime,
        region: &str,
        window: &ProcessingWindow,
    ) -> Result<Request> {
        let url = format!(
            "{}/preprocess/{}/{}/{}/{}",
            self.base_url,
            minute_stamp(scheduled_start),
            region,
            date_stamp(window.start),
            date_stamp(window.end)
        );

        Ok(self.client().get(url).build()?)
    }

    /// Builds the monitoring request
    pub fn monitor_request(&self, body: &MonitorRequest) -> Result<Request> {
        let url = format!("{}/monitor", self.base_url);
        debug!(
            "Monitoring request body: {}",
            serde_json::to_string(body).unwrap_or_default()
        );

        Ok(self.client().post(url).json(body).build()?)
    }

    /// Runs preprocessing to completion
    ///
    /// # Returns
    /// The envelope's `data` payload
    pub async fn preprocess(
        &self,
        scheduled_start: NaiveDateTime,
        region: &str,
        window: &ProcessingWindow,
    ) -> Result<JsonValue> {
        let request = self.preprocess_request(scheduled_start, region, window)?;
        self.drive(request).await
    }

    /// Runs monitoring to completion
    ///
    /// # Returns
    /// The envelope's `data` payload
    pub async fn monitor(&self, body: &MonitorRequest) -> Result<JsonValue> {
        let request = self.monitor_request(body)?;
        self.drive(request).await
    }

    async fn drive(&self, request: Request) -> Result<JsonValue> {
        let url = request.url().to_string();
        let result = self.poller.poll_until_done(request).await?;
        require_success(&url, result)
    }
}
