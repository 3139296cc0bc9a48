//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → loader.rs (optional TOML file)
//!     → loader.rs (MINIKUBE_HOST, HOST_HEADER, ... environment)
//!     → cli.rs (command-line overrides)
//!     → validation.rs (semantic checks)
//!     → ProbeConfig (validated, immutable for the whole run)
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; nothing reloads it mid-run
//! - All fields have defaults so an empty environment is a valid run
//! - Validation separates syntactic (serde, duration parsing) from semantic checks

pub mod duration;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{LoadConfig, LogFormat, ObservabilityConfig, ProbeConfig, TargetConfig};
pub use validation::{validate_config, ValidationError};
