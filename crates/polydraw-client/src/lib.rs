//! polydraw client - HTTP adapter for the polygon submission port
//!
//! Sends the widget's submission to the backend with `reqwest` and turns
//! every failure mode into a [`SubmitError`] the widget can show.

use std::time::Duration;

use async_trait::async_trait;
use polydraw_core::config::LayeredConfig;
use polydraw_core::error::{PolydrawError, Result, SubmitError};
use polydraw_core::ports::{PolygonSubmitter, Submission};

/// Longest response body kept in a [`SubmitError::Status`]
const MAX_ERROR_BODY: usize = 512;

/// Submitter that POSTs to a backend over HTTP
#[derive(Debug, Clone)]
pub struct HttpSubmitter {
    /// Origin the relative endpoint paths are resolved against
    /// (e.g., "http://localhost:5000")
    base_url: String,

    timeout: Duration,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpSubmitter {
    /// Create a submitter for `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build().map_err(|e| {
            PolydrawError::ConfigInvalid {
                key: "http_client".to_string(),
                reason: format!("Failed to build HTTP client: {}", e),
            }
        })?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
            client,
        })
    }

    /// Create with the default local backend address
    pub fn localhost() -> Result<Self> {
        Self::new(
            polydraw_core::config::DEFAULT_BASE_URL,
            Duration::from_secs(polydraw_core::config::DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Create from resolved configuration
    pub fn from_config(config: &LayeredConfig) -> Result<Self> {
        Self::new(config.base_url.value.clone(), Duration::from_secs(config.timeout_secs.value))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an endpoint path
    pub fn endpoint_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[async_trait]
impl PolygonSubmitter for HttpSubmitter {
    async fn submit(&self, submission: &Submission) -> std::result::Result<serde_json::Value, SubmitError> {
        let url = self.endpoint_url(&submission.path);
        tracing::debug!(url = %url, "Submitting polygon");

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&submission.payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SubmitError::Transport(format!(
                        "no response from {} within {}s",
                        url,
                        self.timeout.as_secs_f64()
                    ))
                } else {
                    SubmitError::Transport(format!("failed to reach {}: {}", url, e))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmitError::Transport(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url = %url, "Backend rejected polygon");
            return Err(SubmitError::Status { status: status.as_u16(), body: truncate(&body) });
        }

        serde_json::from_str(&body).map_err(|e| SubmitError::InvalidResponse(e.to_string()))
    }
}

fn truncate(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((index, _)) => format!("{}...", &body[..index]),
        None => body.to_string(),
    }
}
