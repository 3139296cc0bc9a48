//! Run-wide hit and check counters.
//!
//! # Design Decisions
//! - Plain atomics, `Relaxed`: every counter is a commutative sum
//! - Every recorded observation is mirrored into the `metrics` facade

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::observability::metrics;
use crate::probe::classify::Verdict;
use crate::probe::iteration::Observation;

/// Counters shared by every virtual user. Only ever incremented.
#[derive(Debug, Default)]
pub struct HitCounters {
    iterations: AtomicU64,
    canary_hits: AtomicU64,
    main_hits: AtomicU64,
    checks_passed: AtomicU64,
    checks_failed: AtomicU64,
    request_failures: AtomicU64,
}

/// Point-in-time copy of [`HitCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CounterSnapshot {
    pub iterations: u64,
    pub canary_hits: u64,
    pub main_hits: u64,
    pub checks_passed: u64,
    pub checks_failed: u64,
    pub request_failures: u64,
}

impl HitCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one iteration. Increments exactly one of the hit counters.
    pub fn record(&self, observation: &Observation) {
        self.iterations.fetch_add(1, Ordering::Relaxed);

        match observation.verdict {
            Verdict::Canary => self.canary_hits.fetch_add(1, Ordering::Relaxed),
            Verdict::Main => self.main_hits.fetch_add(1, Ordering::Relaxed),
        };

        if observation.status_ok {
            self.checks_passed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.checks_failed.fetch_add(1, Ordering::Relaxed);
        }

        if observation.request_failed {
            self.request_failures.fetch_add(1, Ordering::Relaxed);
        }

        metrics::record_observation(observation);
    }

    pub fn canary_hits(&self) -> u64 {
        self.canary_hits.load(Ordering::Relaxed)
    }

    pub fn main_hits(&self) -> u64 {
        self.main_hits.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            iterations: self.iterations.load(Ordering::Relaxed),
            canary_hits: self.canary_hits.load(Ordering::Relaxed),
            main_hits: self.main_hits.load(Ordering::Relaxed),
            checks_passed: self.checks_passed.load(Ordering::Relaxed),
            checks_failed: self.checks_failed.load(Ordering::Relaxed),
            request_failures: self.request_failures.load(Ordering::Relaxed),
        }
    }
}

impl CounterSnapshot {
    /// Fraction of classified responses that came from the canary.
    pub fn canary_ratio(&self) -> Option<f64> {
        let total = self.canary_hits + self.main_hits;
        (total > 0).then(|| self.canary_hits as f64 / total as f64)
    }

    /// Fraction of `status is 200` checks that passed.
    pub fn check_pass_rate(&self) -> Option<f64> {
        let total = self.checks_passed + self.checks_failed;
        (total > 0).then(|| self.checks_passed as f64 / total as f64)
    }
}
