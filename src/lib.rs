//! Canary probe library.
//!
//! Generates HTTP load against a deployment behind a canary router and counts
//! how many responses came from the canary versus the main deployment.

pub mod cli;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod probe;
pub mod runner;

pub use config::ProbeConfig;
pub use lifecycle::Shutdown;
pub use probe::{classify, HitCounters, Probe, Verdict};
pub use runner::{RunSummary, VirtualUsers};
