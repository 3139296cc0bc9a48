//! One virtual-user iteration.

use std::time::Duration;

use crate::config::ProbeConfig;
use crate::probe::classify::{classify, Verdict};
use crate::probe::counters::HitCounters;
use crate::probe::request::{ProbeRequest, RequestError};
use crate::probe::transport::{ProbeResponse, Transport, TransportError};

/// Name of the per-request status check.
pub const STATUS_CHECK: &str = "status is 200";

/// Everything an iteration learned from one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    /// Outcome of the `status is 200` check.
    pub status_ok: bool,
    /// The request never produced a response.
    pub request_failed: bool,
    pub verdict: Verdict,
}

/// Turn a request outcome into an observation.
///
/// A transport error counts as status 0 with no body: the check fails and
/// the (empty) body still classifies, as main.
pub fn observe(outcome: &Result<ProbeResponse, TransportError>) -> Observation {
    match outcome {
        Ok(response) => Observation {
            status_ok: response.status == 200,
            request_failed: false,
            verdict: classify(response.body.as_deref()),
        },
        Err(_) => Observation {
            status_ok: false,
            request_failed: true,
            verdict: classify(None),
        },
    }
}

/// The canary probe loop body.
#[derive(Debug, Clone)]
pub struct Probe {
    request: ProbeRequest,
    think_time: Duration,
}

impl Probe {
    pub fn new(request: ProbeRequest, think_time: Duration) -> Self {
        Self {
            request,
            think_time,
        }
    }

    pub fn from_config(config: &ProbeConfig) -> Result<Self, RequestError> {
        Ok(Self::new(
            ProbeRequest::from_config(config)?,
            config.load.think_time,
        ))
    }

    pub fn request(&self) -> &ProbeRequest {
        &self.request
    }

    /// Send one request, record what came back, then pause for the think time.
    pub async fn iterate<T: Transport>(&self, transport: &T, counters: &HitCounters) -> Observation {
        let outcome = transport.get(&self.request).await;

        match &outcome {
            Ok(response) if response.status != 200 => {
                tracing::debug!(status = response.status, "Check failed: {}", STATUS_CHECK);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Request failed");
            }
            Ok(_) => {}
        }

        let observation = observe(&outcome);
        counters.record(&observation);

        if !self.think_time.is_zero() {
            tokio::time::sleep(self.think_time).await;
        }

        observation
    }
}
