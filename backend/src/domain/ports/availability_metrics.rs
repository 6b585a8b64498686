//! Port for recording how availability checks were resolved.
//!
//! The resolver reports which upstream tier produced each verdict so operators
//! can see when the primary endpoint degrades and traffic shifts to the
//! fallback.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::AvailabilityStatus;

define_port_error! {
    /// Errors exposed when recording availability metrics.
    pub enum AvailabilityMetricsError {
        /// Metric exporter rejected the write.
        Export { message: String } => "availability metrics exporter failed: {message}",
    }
}

/// Upstream tier that produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionTier {
    /// Primary validation endpoint.
    Primary,
    /// Fallback lookup endpoint.
    Fallback,
    /// Neither tier answered.
    Unresolved,
}

impl ResolutionTier {
    /// Metric label value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Fallback => "fallback",
            Self::Unresolved => "unresolved",
        }
    }
}

/// Labels attached to every resolution metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionMetricLabels {
    /// Tier that produced the verdict.
    pub tier: ResolutionTier,
    /// Verdict status.
    pub status: AvailabilityStatus,
}

/// Metrics recording port for availability resolutions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvailabilityMetrics: Send + Sync {
    /// Record one resolved verdict.
    async fn record_resolution(
        &self,
        labels: &ResolutionMetricLabels,
    ) -> Result<(), AvailabilityMetricsError>;
}

/// Metrics sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpAvailabilityMetrics;

#[async_trait]
impl AvailabilityMetrics for NoOpAvailabilityMetrics {
    async fn record_resolution(
        &self,
        _labels: &ResolutionMetricLabels,
    ) -> Result<(), AvailabilityMetricsError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_metrics_accept_every_event() {
        let metrics = NoOpAvailabilityMetrics;
        let labels = ResolutionMetricLabels {
            tier: ResolutionTier::Fallback,
            status: AvailabilityStatus::Taken,
        };
        assert!(metrics.record_resolution(&labels).await.is_ok());
    }
}
