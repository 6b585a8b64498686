//! Prometheus-backed implementations of domain metrics ports.
//!
//! Compiled only with the `metrics` feature.

mod prometheus_availability;

pub use prometheus_availability::PrometheusAvailabilityMetrics;
