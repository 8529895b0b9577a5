//! In-process metrics for the gatekeeper.
//!
//! Counters and the oracle latency histogram live in atomics keyed by label
//! sets; `/metrics` renders them in Prometheus text format.

pub mod metrics;

pub use metrics::GateMetrics;
