//! Command-line interface.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::duration::parse_duration;
use crate::config::loader::{apply_env, load_file};
use crate::config::{validate_config, ConfigError, LogFormat, ProbeConfig};

/// Command-line arguments. Every flag overrides the file and environment.
#[derive(Debug, Default, Parser)]
#[command(name = "canary-probe")]
#[command(
    about = "Load a canary-routed deployment and count which variant answers",
    long_about = "Sends GET http://<host>/ from many virtual users and classifies each \
                  response as canary or main.\n\n\
                  Environment: MINIKUBE_HOST, HOST_HEADER, FORCE_CANARY_BY_HEADER, K6_VUS, K6_DURATION"
)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Target host:port.
    #[arg(long)]
    pub host: Option<String>,

    /// Value for the Host header.
    #[arg(long)]
    pub host_header: Option<String>,

    /// Send `X-Canary: true` with every request.
    #[arg(long)]
    pub force_canary: bool,

    /// Number of virtual users.
    #[arg(long)]
    pub vus: Option<u32>,

    /// Run length, e.g. 20s or 1m30s.
    #[arg(short, long, value_parser = parse_duration)]
    pub duration: Option<Duration>,

    /// Pause at the end of each iteration.
    #[arg(long, value_parser = parse_duration)]
    pub think_time: Option<Duration>,

    /// Per-request timeout.
    #[arg(long, value_parser = parse_duration)]
    pub request_timeout: Option<Duration>,

    /// How long in-flight iterations may run past the deadline.
    #[arg(long, value_parser = parse_duration)]
    pub graceful_stop: Option<Duration>,

    /// Serve Prometheus metrics on this address.
    #[arg(long)]
    pub metrics_address: Option<String>,

    /// Write the run summary as JSON to this file.
    #[arg(long)]
    pub summary_export: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log output format.
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

impl Cli {
    /// Resolve the final configuration from file, process environment and flags.
    pub fn resolve(&self) -> Result<ProbeConfig, ConfigError> {
        self.resolve_with(|var| std::env::var(var).ok())
    }

    /// Same as [`Cli::resolve`] with an explicit environment lookup.
    pub fn resolve_with<F>(&self, lookup: F) -> Result<ProbeConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match &self.config {
            Some(path) => load_file(path)?,
            None => ProbeConfig::default(),
        };
        apply_env(&mut config, lookup)?;
        self.apply_overrides(&mut config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut ProbeConfig) {
        if let Some(host) = &self.host {
            config.target.host = host.clone();
        }
        if let Some(header) = &self.host_header {
            config.target.host_header = header.clone();
        }
        if self.force_canary {
            config.target.force_canary = true;
        }
        if let Some(timeout) = self.request_timeout {
            config.target.request_timeout = timeout;
        }
        if let Some(vus) = self.vus {
            config.load.vus = vus;
        }
        if let Some(duration) = self.duration {
            config.load.duration = duration;
        }
        if let Some(think_time) = self.think_time {
            config.load.think_time = think_time;
        }
        if let Some(graceful_stop) = self.graceful_stop {
            config.load.graceful_stop = graceful_stop;
        }
        if let Some(addr) = &self.metrics_address {
            config.observability.metrics_address = Some(addr.clone());
        }
        if let Some(path) = &self.summary_export {
            config.observability.summary_export = Some(path.clone());
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }
    }
}
