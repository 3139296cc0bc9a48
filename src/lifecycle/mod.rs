//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     ProbeConfig → HttpTransport → Probe → VirtualUsers::run → RunSummary
//!
//! Shutdown (shutdown.rs):
//!     trigger → VUs stop starting iterations → in-flight ones drain
//!     force   → in-flight iterations are aborted
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger shutdown (run ends early with a summary)
//!     second signal  → force shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, nothing during the run is
//! - An interrupted run still reports what it counted

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownListener};
