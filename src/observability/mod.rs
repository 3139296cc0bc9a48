//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! probe + runner produce:
//!     → logging.rs (structured log events, run span with run_id)
//!     → metrics.rs (canary_hits, main_hits, checks, ...)
//!
//! Consumers:
//!     → stdout/stderr (pretty or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//!     → end-of-run summary (runner::summary)
//! ```
//!
//! # Design Decisions
//! - Metric updates go through the `metrics` facade; without an installed
//!   recorder they are no-ops, so tests need no setup
//! - Log level from config, overridable with RUST_LOG

pub mod logging;
pub mod metrics;
