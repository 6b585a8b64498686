//! Prometheus adapter for availability resolution counters.
//!
//! # Metrics
//!
//! - **Name**: `namecheck_availability_resolutions_total`
//! - **Type**: Counter
//! - **Labels**:
//!   - `tier`: `primary`, `fallback`, or `unresolved`
//!   - `status`: verdict status, e.g. `available` or `censored`

use async_trait::async_trait;
use prometheus::{CounterVec, Opts, Registry};

use crate::domain::ports::{AvailabilityMetrics, AvailabilityMetricsError, ResolutionMetricLabels};

/// Prometheus-backed recorder for availability resolutions.
pub struct PrometheusAvailabilityMetrics {
    resolutions_total: CounterVec,
}

impl PrometheusAvailabilityMetrics {
    /// Create and register the counter with `registry`.
    ///
    /// # Errors
    ///
    /// Returns an error when Prometheus rejects the registration, for example
    /// because the name is already taken.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let resolutions_total = CounterVec::new(
            Opts::new(
                "namecheck_availability_resolutions_total",
                "Availability resolutions by upstream tier and verdict status",
            ),
            &["tier", "status"],
        )?;
        registry.register(Box::new(resolutions_total.clone()))?;
        Ok(Self { resolutions_total })
    }
}

#[async_trait]
impl AvailabilityMetrics for PrometheusAvailabilityMetrics {
    async fn record_resolution(
        &self,
        labels: &ResolutionMetricLabels,
    ) -> Result<(), AvailabilityMetricsError> {
        self.resolutions_total
            .with_label_values(&[labels.tier.as_str(), labels.status.as_str()])
            .inc();
        Ok(())
    }
}
