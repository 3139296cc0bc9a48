//! canary-probe
//!
//! Sends repeated GETs to a deployment behind a canary router and counts
//! which variant answered each one.
//!
//! # Architecture Overview
//!
//! ```text
//!   env / TOML / flags ──▶ config ──▶ lifecycle::startup
//!                                          │
//!                                          ▼
//!                               runner::VirtualUsers (N tasks)
//!                                          │ per iteration
//!                                          ▼
//!      target ◀── GET (Host, X-Canary?) ── probe::Probe
//!             ──▶ status + body ─────────▶ observe → classify
//!                                          │
//!                                          ▼
//!                     HitCounters (canary_hits / main_hits, checks)
//!                          │                          │
//!                          ▼                          ▼
//!                 runner::RunSummary        metrics (Prometheus, optional)
//! ```

use clap::Parser;

use canary_probe::cli::Cli;
use canary_probe::lifecycle::signals::spawn_signal_listener;
use canary_probe::lifecycle::{startup, Shutdown};
use canary_probe::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.resolve()?;

    logging::init_logging(&config.observability);

    tracing::info!("canary-probe v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        host = %config.target.host,
        host_header = %config.target.host_header,
        force_canary = config.target.force_canary,
        vus = config.load.vus,
        duration_ms = config.load.duration.as_millis() as u64,
        "Configuration loaded"
    );

    if let Some(addr) = &config.observability.metrics_address {
        metrics::init_metrics(addr.parse()?)?;
    }

    let shutdown = Shutdown::new();
    spawn_signal_listener(shutdown.clone());

    let summary = startup::run(&config, shutdown.subscribe()).await?;
    println!("{summary}");

    if let Some(path) = &config.observability.summary_export {
        summary.export_json(path)?;
        tracing::info!(path = %path.display(), "Summary exported");
    }

    Ok(())
}
