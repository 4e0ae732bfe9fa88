//! Async job poller
//!
//! The EOP services do their work inside the HTTP call itself, which can
//! take tens of minutes. The poller issues the request once and then waits
//! on that single in-flight call in bounded slices, logging progress after
//! each slice so the batch never looks hung.

use std::time::Duration;

use foliage_core::domain::job::JobResult;
use reqwest::{Client, Request};
use tokio::time::{self, Instant};
use tracing::{debug, error, info, warn};

use crate::eop::classify_response;
use crate::error::{ClientError, Result};

/// Default wait per attempt before logging and waiting again
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Drives a long-running request to completion
#[derive(Debug, Clone)]
pub struct JobPoller {
    client: Client,
    attempt_timeout: Duration,
    /// Total wait after which the call is abandoned; `None` waits forever
    max_wait: Option<Duration>,
}

impl JobPoller {
    /// Creates a poller with the default attempt timeout and no overall bound
    pub fn new(client: Client) -> Self {
        Self {
            client,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            max_wait: None,
        }
    }

    pub fn with_attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }

    pub fn with_max_wait(mut self, max_wait: Option<Duration>) -> Self {
        self.max_wait = max_wait;
        self
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Sends `request` once and waits for it to resolve
    ///
    /// A timed-out attempt never resends the request; it only waits again on
    /// the same call. Returns on the first response, classified with the
    /// envelope rules, or on a transport failure.
    pub async fn poll_until_done(&self, request: Request) -> Result<JobResult> {
        let url = request.url().to_string();
        let method = request.method().clone();
        debug!("{} {} ...", method, url);

        let call = execute(&self.client, request);
        tokio::pin!(call);

        let started = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let wait = match self.max_wait {
                Some(max) => self
                    .attempt_timeout
                    .min(max.saturating_sub(started.elapsed())),
                None => self.attempt_timeout,
            };

            match time::timeout(wait, &mut call).await {
                Ok(Ok(result)) => {
                    debug!("...completed {} {} after {} attempt(s)", method, url, attempt);
                    return Ok(result);
                }
                Ok(Err(e)) => {
                    error!("...error detected on {} {}: {}", method, url, e);
                    return Err(e);
                }
                Err(_) => {
                    let waited = started.elapsed();
                    info!(
                        "...still waiting for {} {} (attempt {}, {:?} elapsed)",
                        method, url, attempt, waited
                    );

                    if let Some(max) = self.max_wait {
                        if waited >= max {
                            warn!("Abandoning {} {} after {:?}", method, url, waited);
                            return Err(ClientError::PollTimedOut { url, waited });
                        }
                    }
                }
            }
        }
    }
}

/// Sends a request and classifies whatever comes back
pub(crate) async fn execute(client: &Client, request: Request) -> Result<JobResult> {
    let url = request.url().to_string();

    let response = client.execute(request).await?;
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        debug!("Received from {}:\n{}", url, body);
    } else {
        error!("Request to {} failed with status {}", url, status);
        debug!("Received from {}:\n{}", url, body);
    }

    Ok(classify_response(status.as_u16(), &body, &url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use reqwest::Method;

    fn get(client: &Client, url: String) -> Request {
        client.request(Method::GET, url).build().unwrap()
    }

    #[tokio::test]
    async fn test_rewaits_on_same_call_without_resending() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/preprocess/slow");
                then.status(200)
                    .delay(Duration::from_millis(400))
                    .body(r#"{"isOk": true, "data": {"start_date": "x"}}"#);
            })
            .await;

        let client = Client::new();
        let poller =
            JobPoller::new(client.clone()).with_attempt_timeout(Duration::from_millis(50));

        let result = poller
            .poll_until_done(get(&client, server.url("/preprocess/slow")))
            .await
            .unwrap();

        assert!(result.is_success());
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_stops_on_application_error() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/preprocess/bad");
                then.status(200)
                    .body(r#"{"isOk": false, "error": {"coderr": 2, "deserr": "no tiles"}}"#);
            })
            .await;

        let client = Client::new();
        let poller = JobPoller::new(client.clone());

        let result = poller
            .poll_until_done(get(&client, server.url("/preprocess/bad")))
            .await
            .unwrap();

        assert!(matches!(result, JobResult::ApplicationError(ref msg) if msg.contains("no tiles")));
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_max_wait_abandons_call() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/monitor/stuck");
                then.status(200)
                    .delay(Duration::from_secs(5))
                    .body(r#"{"isOK": true}"#);
            })
            .await;

        let client = Client::new();
        let poller = JobPoller::new(client.clone())
            .with_attempt_timeout(Duration::from_millis(50))
            .with_max_wait(Some(Duration::from_millis(200)));

        let err = poller
            .poll_until_done(get(&client, server.url("/monitor/stuck")))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::PollTimedOut { .. }));
    }

    #[tokio::test]
    async fn test_transport_failure_is_terminal() {
        // Bind and drop a listener to get a port nothing listens on.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let client = Client::new();
        let poller = JobPoller::new(client.clone());

        let err = poller
            .poll_until_done(get(&client, format!("http://127.0.0.1:{}/ping", port)))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::RequestFailed(_)));
    }
}
