//! Metrics collection and exposition.
//!
//! # Metrics
//! - `canary_hits` (counter): responses classified as canary
//! - `main_hits` (counter): responses classified as main
//! - `checks` (counter): `status is 200` outcomes, labelled `check` and `result`
//! - `iterations` (counter): completed probe iterations
//! - `request_failures` (counter): requests that got no response at all

use std::net::SocketAddr;

use metrics::{counter, describe_counter, Unit};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::probe::classify::Verdict;
use crate::probe::iteration::{Observation, STATUS_CHECK};

pub const CANARY_HITS: &str = "canary_hits";
pub const MAIN_HITS: &str = "main_hits";
pub const CHECKS: &str = "checks";
pub const ITERATIONS: &str = "iterations";
pub const REQUEST_FAILURES: &str = "request_failures";

/// Install the Prometheus recorder and start its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    describe_metrics();
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

fn describe_metrics() {
    describe_counter!(CANARY_HITS, Unit::Count, "Responses classified as canary");
    describe_counter!(MAIN_HITS, Unit::Count, "Responses classified as main");
    describe_counter!(CHECKS, Unit::Count, "Per-request check outcomes");
    describe_counter!(ITERATIONS, Unit::Count, "Completed probe iterations");
    describe_counter!(REQUEST_FAILURES, Unit::Count, "Requests that got no response");
}

/// Mirror one observation into the installed recorder.
pub fn record_observation(observation: &Observation) {
    counter!(ITERATIONS).increment(1);

    match observation.verdict {
        Verdict::Canary => counter!(CANARY_HITS).increment(1),
        Verdict::Main => counter!(MAIN_HITS).increment(1),
    }

    let result = if observation.status_ok { "pass" } else { "fail" };
    counter!(CHECKS, "check" => STATUS_CHECK, "result" => result).increment(1);

    if observation.request_failed {
        counter!(REQUEST_FAILURES).increment(1);
    }
}
