//! Load runner subsystem.
//!
//! # Data Flow
//! ```text
//! LoadConfig (vus, duration, graceful_stop)
//!     → executor.rs (N tasks, each looping the iteration body)
//!     → deadline / shutdown: stop starting iterations, drain, abort stragglers
//!     → RunOutcome + CounterSnapshot
//!     → summary.rs (RunSummary: text + optional JSON export)
//! ```

pub mod executor;
pub mod summary;

pub use executor::{RunOutcome, StopReason, VirtualUsers};
pub use summary::{RunInfo, RunSummary, SummaryError};
