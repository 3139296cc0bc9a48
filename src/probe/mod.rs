//! Canary probe subsystem.
//!
//! # Data Flow
//! ```text
//! ProbeConfig.target
//!     → request.rs (GET http://<host>/ with Host and optional X-Canary)
//!     → transport.rs (one HTTP attempt, no retries)
//!     → iteration.rs (observe: "status is 200" check + classify body)
//!     → classify.rs (Canary | Main)
//!     → counters.rs (exactly one of canary_hits / main_hits)
//!     → think time, iteration ends
//! ```
//!
//! # Design Decisions
//! - Classification and observation are pure functions of the response
//! - Counters are injected, never global, and only ever incremented
//! - Transport is a trait so the iteration body runs without a network in tests
//! - A failed request still classifies (empty body), so every iteration counts once

pub mod classify;
pub mod counters;
pub mod iteration;
pub mod request;
pub mod transport;

pub use classify::{classify, Verdict};
pub use counters::{CounterSnapshot, HitCounters};
pub use iteration::{observe, Observation, Probe, STATUS_CHECK};
pub use request::ProbeRequest;
pub use transport::{HttpTransport, ProbeResponse, Transport, TransportError};
