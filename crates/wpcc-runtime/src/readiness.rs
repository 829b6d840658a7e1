//! HTTP readiness probing for a freshly started server.
//!
//! Replaces the fixed startup delay with a bounded poll of a status URL
//! (for Selenium: `http://127.0.0.1:4444/wd/hub/status`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, info};
use wpcc_core::{GuardError, ReadinessProbe, ServerDescriptor};

/// Per-request timeout; the overall budget is `HttpReadinessProbe::timeout`.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Lower bound on the poll interval.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Smallest slice of time granted to a single check near the deadline.
const MIN_CHECK_BUDGET: Duration = Duration::from_millis(250);

/// Polls a status URL until it reports ready or the time budget runs out.
///
/// Ready means a 2xx response whose body either is not Selenium status JSON
/// or carries `"value": {"ready": true}`.
#[derive(Debug, Clone)]
pub struct HttpReadinessProbe {
    url: String,
    timeout: Duration,
    client: Client,
}

impl HttpReadinessProbe {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            url: url.into(),
            timeout,
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Single readiness check. Transport errors count as "not ready".
    pub async fn check_once(&self) -> bool {
        match self.client.get(&self.url).send().await {
            Ok(response) if response.status().is_success() => match response.text().await {
                Ok(body) => body_reports_ready(&body),
                Err(e) => {
                    debug!("Failed to read status response: {}", e);
                    false
                }
            },
            Ok(response) => {
                debug!(
                    "Status check returned {} (expected 2xx), retrying...",
                    response.status()
                );
                false
            }
            Err(e) => {
                debug!("Status check failed: {}, retrying...", e);
                false
            }
        }
    }

    /// One check, abandoned once `budget` has elapsed.
    async fn check_within(&self, budget: Duration) -> bool {
        timeout(budget, self.check_once()).await.unwrap_or_else(|_| {
            debug!("Status check exceeded the remaining readiness budget");
            false
        })
    }
}

#[async_trait]
impl ReadinessProbe for HttpReadinessProbe {
    /// Poll until ready, never waiting past `timeout` by more than
    /// `MIN_CHECK_BUDGET`; a zero budget still gets a single check.
    async fn wait_ready(&self, descriptor: &ServerDescriptor) -> Result<(), GuardError> {
        let interval = descriptor.liveness_check_interval.max(MIN_POLL_INTERVAL);
        let deadline = Instant::now() + self.timeout;
        info!("Waiting for server to be ready at {}", self.url);

        let mut attempts = 0u32;
        loop {
            attempts += 1;
            let remaining = deadline.saturating_duration_since(Instant::now());
            if self.check_within(remaining.max(MIN_CHECK_BUDGET)).await {
                info!(attempts, "Server is ready at {}", self.url);
                return Ok(());
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            sleep(interval.min(remaining)).await;
        }

        Err(GuardError::NotReady {
            reason: format!(
                "{} did not report ready within {:?} ({} attempts)",
                self.url, self.timeout, attempts
            ),
        })
    }
}

#[derive(Debug, Deserialize)]
struct StatusPayload {
    value: Option<StatusValue>,
}

#[derive(Debug, Deserialize)]
struct StatusValue {
    ready: Option<bool>,
}

/// Interpret a 2xx status body.
///
/// Selenium 3+/W3C answers `{"value": {"ready": bool, ...}}`; Selenium 2 and
/// arbitrary health endpoints carry no `ready` flag and count as ready.
fn body_reports_ready(body: &str) -> bool {
    match serde_json::from_str::<StatusPayload>(body) {
        Ok(StatusPayload {
            value: Some(StatusValue { ready: Some(ready) }),
        }) => ready,
        _ => true,
    }
}
