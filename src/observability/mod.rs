//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via `tracing`; level set by env filter or config
//! - Metric updates are cheap and recorded per search request
//! - The Prometheus exporter is optional and binds its own listener

pub mod logging;
pub mod metrics;
