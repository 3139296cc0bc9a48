//! Configuration loading from disk and the environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::duration::parse_duration;
use crate::config::schema::ProbeConfig;
use crate::config::validation::ValidationError;

/// Target host:port.
pub const ENV_HOST: &str = "MINIKUBE_HOST";
/// `Host` header value.
pub const ENV_HOST_HEADER: &str = "HOST_HEADER";
/// Exactly `true` turns on the forcing header.
pub const ENV_FORCE_CANARY: &str = "FORCE_CANARY_BY_HEADER";
/// Virtual-user count.
pub const ENV_VUS: &str = "K6_VUS";
/// Run duration.
pub const ENV_DURATION: &str = "K6_DURATION";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid {var}={value:?}: {reason}")]
    Env {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from a TOML file. Validation happens after all layers are applied.
pub fn load_file(path: &Path) -> Result<ProbeConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: ProbeConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Overlay environment variables onto `config`.
///
/// Unset and empty variables leave the current value alone.
pub fn apply_env<F>(config: &mut ProbeConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |var: &str| lookup(var).filter(|value| !value.is_empty());

    if let Some(host) = get(ENV_HOST) {
        config.target.host = host;
    }
    if let Some(header) = get(ENV_HOST_HEADER) {
        config.target.host_header = header;
    }
    if let Some(flag) = get(ENV_FORCE_CANARY) {
        config.target.force_canary = flag == "true";
    }
    if let Some(raw) = get(ENV_VUS) {
        config.load.vus = raw.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::Env {
            var: ENV_VUS,
            value: raw.clone(),
            reason: e.to_string(),
        })?;
    }
    if let Some(raw) = get(ENV_DURATION) {
        config.load.duration = parse_duration(&raw).map_err(|e| ConfigError::Env {
            var: ENV_DURATION,
            value: raw.clone(),
            reason: e.to_string(),
        })?;
    }

    Ok(())
}

/// Overlay the process environment onto `config`.
pub fn apply_process_env(config: &mut ProbeConfig) -> Result<(), ConfigError> {
    apply_env(config, |var| std::env::var(var).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_env_keeps_defaults() {
        let mut config = ProbeConfig::default();
        apply_env(&mut config, env(&[])).unwrap();
        assert_eq!(config, ProbeConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ProbeConfig::default();
        apply_env(
            &mut config,
            env(&[
                (ENV_HOST, "192.168.49.2:80"),
                (ENV_HOST_HEADER, "shop.local"),
                (ENV_FORCE_CANARY, "true"),
                (ENV_VUS, "5"),
                (ENV_DURATION, "1m30s"),
            ]),
        )
        .unwrap();

        assert_eq!(config.target.host, "192.168.49.2:80");
        assert_eq!(config.target.host_header, "shop.local");
        assert!(config.target.force_canary);
        assert_eq!(config.load.vus, 5);
        assert_eq!(config.load.duration, Duration::from_secs(90));
    }

    #[test]
    fn test_force_flag_is_strict() {
        for value in ["TRUE", "1", "yes", "True"] {
            let mut config = ProbeConfig::default();
            apply_env(&mut config, env(&[(ENV_FORCE_CANARY, value)])).unwrap();
            assert!(!config.target.force_canary, "{value} must not enable the flag");
        }
    }

    #[test]
    fn test_empty_values_fall_back_to_defaults() {
        let mut config = ProbeConfig::default();
        apply_env(&mut config, env(&[(ENV_HOST, ""), (ENV_VUS, ""), (ENV_DURATION, "")])).unwrap();
        assert_eq!(config, ProbeConfig::default());
    }

    #[test]
    fn test_bad_vus_is_reported() {
        let mut config = ProbeConfig::default();
        let err = apply_env(&mut config, env(&[(ENV_VUS, "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: ENV_VUS, .. }));
    }

    #[test]
    fn test_bad_duration_is_reported() {
        let mut config = ProbeConfig::default();
        let err = apply_env(&mut config, env(&[(ENV_DURATION, "20 parsecs")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: ENV_DURATION, .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_file(Path::new("/nonexistent/canary-probe.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
