//! Virtual-user executor.
//!
//! # Responsibilities
//! - Run an iteration body in a loop on N independent tasks
//! - Stop starting iterations at the deadline or on shutdown
//! - Let in-flight iterations drain, then abort stragglers (at once if forced)
//!
//! # Design Decisions
//! - Generic over the iteration body: knows nothing about HTTP or counters
//! - Each VU yields between iterations so a body that never awaits cannot
//!   starve the runtime
//! - Iterations are not synchronised across VUs

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinSet;
use tokio::time::{self, Instant};

use crate::config::LoadConfig;
use crate::lifecycle::ShutdownListener;

/// Stand-in deadline for durations too long to add to an `Instant` (~30 years).
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The configured duration elapsed.
    Deadline,
    /// Shutdown was triggered before the deadline.
    Interrupted,
}

/// What the executor saw, independent of what the iterations did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub completed_iterations: u64,
    /// VUs still mid-iteration when the graceful-stop window ran out.
    pub aborted_vus: usize,
    pub elapsed: Duration,
    pub stop_reason: StopReason,
}

/// Runs an iteration body across a fixed number of virtual users for a fixed duration.
#[derive(Debug, Clone)]
pub struct VirtualUsers {
    vus: u32,
    duration: Duration,
    graceful_stop: Duration,
}

impl VirtualUsers {
    pub fn new(vus: u32, duration: Duration) -> Self {
        Self {
            vus,
            duration,
            graceful_stop: LoadConfig::default().graceful_stop,
        }
    }

    pub fn from_config(load: &LoadConfig) -> Self {
        Self::new(load.vus, load.duration).with_graceful_stop(load.graceful_stop)
    }

    pub fn with_graceful_stop(mut self, graceful_stop: Duration) -> Self {
        self.graceful_stop = graceful_stop;
        self
    }

    pub fn vus(&self) -> u32 {
        self.vus
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Run `iteration` (called with the VU index) until the deadline or shutdown.
    pub async fn run<F, Fut>(&self, iteration: F, shutdown: ShutdownListener) -> RunOutcome
    where
        F: Fn(u32) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let iteration = Arc::new(iteration);
        let completed = Arc::new(AtomicU64::new(0));
        let started = Instant::now();
        let deadline = started
            .checked_add(self.duration)
            .unwrap_or_else(|| started + FAR_FUTURE);

        tracing::info!(
            vus = self.vus,
            duration_ms = self.duration.as_millis() as u64,
            "Starting virtual users"
        );

        let mut set = JoinSet::new();
        for vu in 0..self.vus {
            let iteration = Arc::clone(&iteration);
            let completed = Arc::clone(&completed);
            let shutdown = shutdown.clone();

            set.spawn(async move {
                while Instant::now() < deadline && !shutdown.is_triggered() {
                    iteration(vu).await;
                    completed.fetch_add(1, Ordering::Relaxed);
                    tokio::task::yield_now().await;
                }
            });
        }

        let mut stop_signal = shutdown;
        let stop_reason = tokio::select! {
            _ = drain(&mut set) => StopReason::Deadline,
            _ = time::sleep_until(deadline) => StopReason::Deadline,
            _ = stop_signal.wait() => StopReason::Interrupted,
        };

        let mut aborted_vus = 0;
        if !set.is_empty() {
            tracing::debug!(
                in_flight = set.len(),
                graceful_stop_ms = self.graceful_stop.as_millis() as u64,
                "Waiting for in-flight iterations"
            );
            let drained = tokio::select! {
                result = time::timeout(self.graceful_stop, drain(&mut set)) => {
                    if result.is_err() {
                        tracing::warn!("Graceful stop expired, aborting virtual users");
                    }
                    result.is_ok()
                }
                _ = stop_signal.wait_forced() => {
                    tracing::warn!("Forced stop, aborting virtual users");
                    false
                }
            };
            if !drained {
                aborted_vus = set.len();
                set.abort_all();
                while set.join_next().await.is_some() {}
            }
        }

        let outcome = RunOutcome {
            completed_iterations: completed.load(Ordering::Relaxed),
            aborted_vus,
            elapsed: started.elapsed(),
            stop_reason,
        };

        tracing::info!(
            iterations = outcome.completed_iterations,
            aborted_vus = outcome.aborted_vus,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            stop_reason = ?outcome.stop_reason,
            "Virtual users finished"
        );

        outcome
    }
}

async fn drain(set: &mut JoinSet<()>) {
    while let Some(result) = set.join_next().await {
        if let Err(e) = result {
            if e.is_panic() {
                tracing::error!(error = %e, "Virtual user panicked");
            }
        }
    }
}
