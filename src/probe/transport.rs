//! HTTP transport for probe requests.
//!
//! # Responsibilities
//! - Send exactly one GET per call (no retries, no backoff)
//! - Hand back status and body text, or a classified transport error
//!
//! # Design Decisions
//! - One `reqwest::Client` is shared by every virtual user (pooled connections)
//! - A body that fails to read mid-stream keeps the status and drops the body

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::probe::request::ProbeRequest;

/// What came back from the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: Option<String>,
}

impl ProbeResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: Some(body.into()),
        }
    }

    /// A response with no body at all.
    pub fn empty(status: u16) -> Self {
        Self { status, body: None }
    }
}

/// Failure to get any response from the target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connection refused or host unreachable: {0}")]
    Connect(String),

    #[error("request timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else if e.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Other(e.to_string())
        }
    }
}

/// Sends a probe request and waits for the response.
pub trait Transport: Send + Sync {
    fn get(
        &self,
        request: &ProbeRequest,
    ) -> impl Future<Output = Result<ProbeResponse, TransportError>> + Send;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, request: &ProbeRequest) -> Result<ProbeResponse, TransportError> {
        let response = self
            .client
            .get(request.url.clone())
            .headers(request.headers.clone())
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(status, error = %e, "Failed to read response body");
                None
            }
        };

        Ok(ProbeResponse { status, body })
    }
}
