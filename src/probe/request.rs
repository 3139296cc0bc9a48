//! Outbound probe request.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue, HOST};
use thiserror::Error;
use url::Url;

use crate::config::ProbeConfig;

/// Header asking the canary router to pick the canary deployment.
pub const CANARY_HEADER: HeaderName = HeaderName::from_static("x-canary");

/// Error building the probe request from configuration.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("invalid target URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid Host header value: {0}")]
    HostHeader(#[from] InvalidHeaderValue),
}

/// The request every iteration sends. Built once and reused.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    pub url: Url,
    pub headers: HeaderMap,
}

impl ProbeRequest {
    /// Build a request for `url` carrying the given `Host` header and,
    /// when `force_canary` is set, `X-Canary: true`.
    pub fn new(url: Url, host_header: &str, force_canary: bool) -> Result<Self, RequestError> {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_str(host_header)?);
        if force_canary {
            headers.insert(CANARY_HEADER, HeaderValue::from_static("true"));
        }
        Ok(Self { url, headers })
    }

    pub fn from_config(config: &ProbeConfig) -> Result<Self, RequestError> {
        Self::new(
            config.target_url()?,
            &config.target.host_header,
            config.target.force_canary,
        )
    }

    /// Whether this request asks for the canary explicitly.
    pub fn forces_canary(&self) -> bool {
        self.headers.contains_key(CANARY_HEADER)
    }
}
