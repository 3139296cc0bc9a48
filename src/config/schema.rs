//! Configuration schema definitions.
//!
//! All types derive Serde traits so the same structure can come from a TOML
//! file, and every field has a default matching the probe's documented
//! behaviour when nothing is configured.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::duration::serde_duration;

/// Root configuration for a probe run.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ProbeConfig {
    /// What to hit and how the request looks.
    pub target: TargetConfig,

    /// How much load to generate.
    pub load: LoadConfig,

    /// Logging, metrics export and summary output.
    pub observability: ObservabilityConfig,
}

impl ProbeConfig {
    /// The URL every iteration requests: `http://<host>/`.
    pub fn target_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!("http://{}/", self.target.host))
    }
}

/// Target configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TargetConfig {
    /// Network address probed (e.g., "127.0.0.1:8080").
    pub host: String,

    /// Value sent in the `Host` header, used by the ingress to pick the app.
    pub host_header: String,

    /// Send `X-Canary: true` to ask the router for the canary.
    pub force_canary: bool,

    /// Per-request timeout.
    #[serde(with = "serde_duration")]
    pub request_timeout: Duration,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1:8080".to_string(),
            host_header: "app.local".to_string(),
            force_canary: false,
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Load shape configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoadConfig {
    /// Number of virtual users looping in parallel.
    pub vus: u32,

    /// Total run length.
    #[serde(with = "serde_duration")]
    pub duration: Duration,

    /// Pause at the end of every iteration.
    #[serde(with = "serde_duration")]
    pub think_time: Duration,

    /// How long in-flight iterations may run past the deadline before being aborted.
    #[serde(with = "serde_duration")]
    pub graceful_stop: Duration,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            vus: 50,
            duration: Duration::from_secs(20),
            think_time: Duration::from_millis(50),
            graceful_stop: Duration::from_secs(30),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Prometheus scrape endpoint bind address; disabled when unset.
    pub metrics_address: Option<String>,

    /// Write the end-of-run summary as JSON to this path.
    pub summary_export: Option<PathBuf>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_address: None,
            summary_export: None,
        }
    }
}
