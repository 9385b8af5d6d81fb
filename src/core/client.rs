// src/core/client.rs

use tracing::{debug, error, info};

use crate::core::models::{ScanHandle, ScanRequest};
use color_eyre::eyre::{Result, WrapErr};
use std::time::Duration;
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";
const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
// An individual request hanging for several poll periods counts as a dead
// backend, not a slow one.
const TIMEOUT_INTERVAL_MULTIPLE: u32 = 4;

/// Everything surfaced to the user is one of these; none is retried
/// automatically, and backend-provided text is preserved verbatim.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("scan submission failed: {0}")]
    Submission(String),
    #[error("status poll failed: {0}")]
    PollTransport(String),
    #[error("scan failed: {0}")]
    ScanFailed(String),
}

/// Connection settings for one backend. The poll interval is deliberately a
/// configuration value; constant-interval polling with no backoff is the
/// protocol, sized to stay responsive without hammering the backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_interval(Duration::from_millis(DEFAULT_POLL_INTERVAL_MS))
    }
}

impl ClientConfig {
    fn with_interval(poll_interval: Duration) -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_BASE).expect("default base url is valid"),
            poll_interval,
            request_timeout: poll_interval * TIMEOUT_INTERVAL_MULTIPLE,
        }
    }

    /// Builds a config from `TRACELENS_API_BASE` and `TRACELENS_POLL_MS`,
    /// falling back to the defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let interval = std::env::var("TRACELENS_POLL_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(DEFAULT_POLL_INTERVAL_MS));

        let mut config = Self::with_interval(interval);
        if let Some(base) = std::env::var("TRACELENS_API_BASE")
            .ok()
            .and_then(|v| Url::parse(&v).ok())
        {
            config.base_url = base;
        }
        config
    }
}

/// HTTP client for the scan backend. Cheap to clone; the underlying reqwest
/// client is shared.
#[derive(Debug, Clone)]
pub struct ScanClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ScanClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("tracelens/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .build()
            .wrap_err("failed to build HTTP client")?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Creates the scan job and returns its poll handle. An empty query is
    /// rejected here, before any network activity.
    pub async fn submit(&self, request: &ScanRequest) -> Result<ScanHandle, ScanError> {
        if request.query.trim().is_empty() {
            return Err(ScanError::Validation("query must not be empty".to_string()));
        }

        let url = self.endpoint("search/start")?;
        info!(query = %request.query, source = %request.source, "Submitting scan.");

        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| ScanError::Submission(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, "Scan submission rejected by backend.");
            return Err(ScanError::Submission(format!(
                "backend returned {status}: {body}"
            )));
        }

        let handle: ScanHandle = response
            .json()
            .await
            .map_err(|e| ScanError::Submission(format!("unreadable submission response: {e}")))?;
        info!(id = %handle.id, "Scan accepted.");
        Ok(handle)
    }

    /// One status poll, returning the raw body for decoding and live display.
    /// Any transport-level problem, including a non-2xx status, means the
    /// backend can no longer answer for this scan and polling must stop.
    pub async fn fetch_status(&self, handle: &ScanHandle) -> Result<String, ScanError> {
        let url = self.endpoint(&format!("search/status/{}", handle.id))?;
        debug!(id = %handle.id, "Polling scan status.");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ScanError::PollTransport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScanError::PollTransport(format!(
                "backend returned {status}: {body}"
            )));
        }

        response
            .text()
            .await
            .map_err(|e| ScanError::PollTransport(e.to_string()))
    }

    fn endpoint(&self, path: &str) -> Result<Url, ScanError> {
        self.config
            .base_url
            .join(path)
            .map_err(|e| ScanError::Submission(format!("bad endpoint {path}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::LookupSource;

    #[tokio::test]
    async fn empty_query_is_rejected_before_any_network_call() {
        // Reserved TEST-NET address: a connection attempt would error
        // differently (and slowly), so a Validation error proves the request
        // never left the process.
        let mut config = ClientConfig::default();
        config.base_url = Url::parse("http://192.0.2.1:9").unwrap();
        let client = ScanClient::new(config).unwrap();

        for query in ["", "   ", "\t\n"] {
            let request = ScanRequest::new(query, LookupSource::Domain);
            let err = client.submit(&request).await.unwrap_err();
            assert!(matches!(err, ScanError::Validation(_)), "query {query:?}");
        }
    }

    #[test]
    fn request_timeout_is_a_multiple_of_the_poll_interval() {
        let config = ClientConfig::default();
        assert_eq!(config.request_timeout, config.poll_interval * 4);
    }
}
