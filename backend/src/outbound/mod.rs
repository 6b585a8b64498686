//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **availability**: reqwest clients for the validation and lookup endpoints
//! - **history**: in-process check history used when no database is configured
//! - **persistence**: PostgreSQL check history using Diesel
//! - **metrics**: Prometheus exporters (feature-gated)
//!
//! Adapters translate between domain types and infrastructure representations
//! and contain no business logic.

pub mod availability;
pub mod history;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod persistence;
