//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the target forms a usable URL and `Host` header
//! - Validate value ranges (vus > 0, 0 < duration < representable deadline)
//! - Check the log level parses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProbeConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;
use std::time::Instant;

use reqwest::header::HeaderValue;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::config::schema::ProbeConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("target.host must not be empty")]
    EmptyHost,

    #[error("target.host {host:?} does not form a valid URL: {reason}")]
    InvalidHost { host: String, reason: String },

    #[error("target.host_header must not be empty")]
    EmptyHostHeader,

    #[error("target.host_header {0:?} is not a valid header value")]
    InvalidHostHeader(String),

    #[error("target.request_timeout must be greater than zero")]
    ZeroRequestTimeout,

    #[error("load.vus must be greater than zero")]
    ZeroVus,

    #[error("load.duration must be greater than zero")]
    ZeroDuration,

    #[error("load.duration is too long to schedule a deadline")]
    DurationTooLong,

    #[error("observability.log_level {0:?} is not one of off, error, warn, info, debug, trace")]
    InvalidLogLevel(String),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a fully layered configuration before the run starts.
pub fn validate_config(config: &ProbeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let target = &config.target;

    if target.host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost);
    } else {
        match config.target_url() {
            Ok(url) if url.host_str().is_some() && url.path() == "/" && url.query().is_none() => {}
            Ok(url) => errors.push(ValidationError::InvalidHost {
                host: target.host.clone(),
                reason: format!("resolves to {url}, expected http://host[:port]/"),
            }),
            Err(e) => errors.push(ValidationError::InvalidHost {
                host: target.host.clone(),
                reason: e.to_string(),
            }),
        }
    }

    if target.host_header.trim().is_empty() {
        errors.push(ValidationError::EmptyHostHeader);
    } else if HeaderValue::from_str(&target.host_header).is_err() {
        errors.push(ValidationError::InvalidHostHeader(target.host_header.clone()));
    }

    if target.request_timeout.is_zero() {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.load.vus == 0 {
        errors.push(ValidationError::ZeroVus);
    }
    if config.load.duration.is_zero() {
        errors.push(ValidationError::ZeroDuration);
    } else if Instant::now().checked_add(config.load.duration).is_none() {
        errors.push(ValidationError::DurationTooLong);
    }

    if config.observability.log_level.parse::<LevelFilter>().is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidMetricsAddress(addr.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&ProbeConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ProbeConfig::default();
        config.target.host = String::new();
        config.target.host_header = "  ".into();
        config.load.vus = 0;
        config.load.duration = Duration::ZERO;
        config.observability.log_level = "loud".into();
        config.observability.metrics_address = Some("not-an-addr".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyHost,
                ValidationError::EmptyHostHeader,
                ValidationError::ZeroVus,
                ValidationError::ZeroDuration,
                ValidationError::InvalidLogLevel("loud".into()),
                ValidationError::InvalidMetricsAddress("not-an-addr".into()),
            ]
        );
    }

    #[test]
    fn test_host_with_path_is_rejected() {
        let mut config = ProbeConfig::default();
        config.target.host = "127.0.0.1:8080/api".into();

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::InvalidHost { .. }));
    }

    #[test]
    fn test_host_header_with_newline_is_rejected() {
        let mut config = ProbeConfig::default();
        config.target.host_header = "app.local\r\nX-Evil: 1".into();

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::InvalidHostHeader(_)));
    }

    #[test]
    fn test_unschedulable_duration_is_rejected() {
        let mut config = ProbeConfig::default();
        config.load.duration = Duration::from_secs(u64::MAX);

        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::DurationTooLong])
        );
    }

    #[test]
    fn test_huge_env_duration_is_rejected() {
        let mut config = ProbeConfig::default();
        crate::config::loader::apply_env(&mut config, |var| {
            (var == crate::config::loader::ENV_DURATION).then(|| "3000000000000000h".to_string())
        })
        .unwrap();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::DurationTooLong]);
    }

    #[test]
    fn test_log_levels() {
        for level in ["off", "error", "warn", "INFO", "debug", "trace"] {
            let mut config = ProbeConfig::default();
            config.observability.log_level = level.into();
            assert_eq!(validate_config(&config), Ok(()), "{level}");
        }

        let mut config = ProbeConfig::default();
        config.observability.log_level = "verbose".into();
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::InvalidLogLevel("verbose".into())])
        );
    }
}
