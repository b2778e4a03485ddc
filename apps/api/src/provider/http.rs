use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::models::resume::ResumeData;
use crate::provider::{FetchError, ResumeSource};

/// How hard a fetch tries before the provider falls back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    pub timeout: Duration,
    /// Extra attempts after the first, on network errors and 5xx only.
    pub max_retries: u32,
    /// Base delay, doubled per retry.
    pub retry_backoff: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_retries: 0,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

/// Fetches the aggregate from `GET /api/resume` (or any URL serving the same JSON).
#[derive(Clone)]
pub struct HttpResumeSource {
    client: Client,
    url: String,
    policy: FetchPolicy,
}

impl HttpResumeSource {
    pub fn new(url: impl Into<String>, policy: FetchPolicy) -> Result<Self, FetchError> {
        Ok(Self {
            client: Client::builder().timeout(policy.timeout).build()?,
            url: url.into(),
            policy,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// `base` doubled per retry after the first, saturating instead of overflowing.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
}

#[async_trait]
impl ResumeSource for HttpResumeSource {
    async fn fetch(&self) -> Result<Option<ResumeData>, FetchError> {
        let mut last_error: Option<FetchError> = None;

        for attempt in 0..=self.policy.max_retries {
            if attempt > 0 {
                let delay = backoff_delay(self.policy.retry_backoff, attempt);
                warn!(
                    "Resume fetch attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.get(&self.url).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(FetchError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status == StatusCode::UNAUTHORIZED {
                debug!("Resume API answered 401, treating as no data");
                return Ok(None);
            }

            if status.is_server_error() {
                last_error = Some(FetchError::Status {
                    status: status.as_u16(),
                });
                continue;
            }

            if !status.is_success() {
                return Err(FetchError::Status {
                    status: status.as_u16(),
                });
            }

            let data: ResumeData = response.json().await?;
            debug!("Fetched resume aggregate from {}", self.url);
            return Ok(Some(data));
        }

        Err(last_error.unwrap_or(FetchError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE.as_u16(),
        }))
    }
}
