//! End-of-run summary.

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::config::duration::{format_duration, serde_duration};
use crate::probe::counters::CounterSnapshot;
use crate::probe::iteration::STATUS_CHECK;
use crate::runner::executor::{RunOutcome, StopReason};

/// Error writing the summary export.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("failed to serialize summary: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write summary: {0}")]
    Io(#[from] std::io::Error),
}

/// Final report of a probe run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub target: String,
    pub host_header: String,
    pub force_canary: bool,
    pub vus: u32,
    #[serde(with = "serde_duration")]
    pub duration: Duration,
    #[serde(with = "serde_duration")]
    pub elapsed: Duration,
    pub stop_reason: StopReason,
    pub aborted_vus: usize,
    pub counters: CounterSnapshot,
    pub canary_ratio: Option<f64>,
    pub check_pass_rate: Option<f64>,
}

impl RunSummary {
    /// Assemble a summary from what the executor saw and what the counters hold.
    pub fn new(run: RunInfo, outcome: &RunOutcome, counters: CounterSnapshot) -> Self {
        Self {
            run_id: run.run_id,
            target: run.target,
            host_header: run.host_header,
            force_canary: run.force_canary,
            vus: run.vus,
            duration: run.duration,
            elapsed: outcome.elapsed,
            stop_reason: outcome.stop_reason,
            aborted_vus: outcome.aborted_vus,
            canary_ratio: counters.canary_ratio(),
            check_pass_rate: counters.check_pass_rate(),
            counters,
        }
    }

    pub fn to_json(&self) -> Result<String, SummaryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the summary as pretty JSON.
    pub fn export_json(&self, path: &Path) -> Result<(), SummaryError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Static facts about a run, fixed before it starts.
#[derive(Debug, Clone)]
pub struct RunInfo {
    pub run_id: Uuid,
    pub target: String,
    pub host_header: String,
    pub force_canary: bool,
    pub vus: u32,
    pub duration: Duration,
}

fn percent(rate: Option<f64>) -> String {
    rate.map(|r| format!("{:.2}%", r * 100.0))
        .unwrap_or_else(|| "n/a".to_string())
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.counters;
        writeln!(f, "======== canary probe results ========")?;
        writeln!(f, "run id          : {}", self.run_id)?;
        writeln!(f, "target          : {} (Host: {})", self.target, self.host_header)?;
        writeln!(f, "forced canary   : {}", self.force_canary)?;
        writeln!(
            f,
            "load            : {} VUs for {} (ran {}, {})",
            self.vus,
            format_duration(self.duration),
            format_duration(self.elapsed),
            match self.stop_reason {
                StopReason::Deadline => "completed",
                StopReason::Interrupted => "interrupted",
            }
        )?;
        writeln!(f, "iterations      : {}", c.iterations)?;
        writeln!(f, "canary_hits     : {}", c.canary_hits)?;
        writeln!(f, "main_hits       : {}", c.main_hits)?;
        writeln!(f, "canary ratio    : {}", percent(self.canary_ratio))?;
        writeln!(
            f,
            "check '{}' : {} ✓ / {} ✗ ({})",
            STATUS_CHECK,
            c.checks_passed,
            c.checks_failed,
            percent(self.check_pass_rate)
        )?;
        writeln!(f, "request failures: {}", c.request_failures)?;
        if self.aborted_vus > 0 {
            writeln!(f, "aborted VUs     : {}", self.aborted_vus)?;
        }
        Ok(())
    }
}
