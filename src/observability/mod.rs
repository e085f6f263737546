//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Forwarder and generator produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or compact)
//!     → Metrics endpoint (Prometheus scrape), when enabled
//! ```
//!
//! # Design Decisions
//! - Request ID (x-request-id) is attached to every forwarding log line
//! - Logs are for operational visibility only, never for control flow

pub mod logging;
pub mod metrics;
