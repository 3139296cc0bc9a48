//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the transport and probe from a validated configuration
//! - Wire probe, counters and executor together
//! - Collect the run summary
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The transport is injectable; `run` is the production wiring

use std::sync::Arc;

use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::ProbeConfig;
use crate::lifecycle::ShutdownListener;
use crate::probe::request::RequestError;
use crate::probe::{HitCounters, HttpTransport, Probe, Transport};
use crate::runner::{RunInfo, RunSummary, VirtualUsers};

/// Error preparing a run.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error(transparent)]
    Request(#[from] RequestError),
}

/// Run the probe against the configured target over HTTP.
pub async fn run(config: &ProbeConfig, shutdown: ShutdownListener) -> Result<RunSummary, StartupError> {
    let transport = HttpTransport::new(config.target.request_timeout)?;
    run_with_transport(config, transport, shutdown).await
}

/// Run the probe with the given transport.
pub async fn run_with_transport<T>(
    config: &ProbeConfig,
    transport: T,
    shutdown: ShutdownListener,
) -> Result<RunSummary, StartupError>
where
    T: Transport + 'static,
{
    let probe = Arc::new(Probe::from_config(config)?);
    let transport = Arc::new(transport);
    let counters = Arc::new(HitCounters::new());
    let executor = VirtualUsers::from_config(&config.load);

    let info = RunInfo {
        run_id: Uuid::new_v4(),
        target: probe.request().url.to_string(),
        host_header: config.target.host_header.clone(),
        force_canary: probe.request().forces_canary(),
        vus: executor.vus(),
        duration: executor.duration(),
    };

    let span = tracing::info_span!("run", run_id = %info.run_id);
    tracing::info!(
        parent: &span,
        target = %info.target,
        host_header = %info.host_header,
        force_canary = info.force_canary,
        "Probe run starting"
    );

    let outcome = {
        let counters = Arc::clone(&counters);
        executor
            .run(
                move |_vu| {
                    let probe = Arc::clone(&probe);
                    let transport = Arc::clone(&transport);
                    let counters = Arc::clone(&counters);
                    async move {
                        probe.iterate(transport.as_ref(), &counters).await;
                    }
                },
                shutdown,
            )
            .instrument(span.clone())
            .await
    };

    let summary = RunSummary::new(info, &outcome, counters.snapshot());
    tracing::info!(
        parent: &span,
        canary_hits = summary.counters.canary_hits,
        main_hits = summary.counters.main_hits,
        checks_failed = summary.counters.checks_failed,
        request_failures = summary.counters.request_failures,
        "Probe run finished"
    );

    Ok(summary)
}
