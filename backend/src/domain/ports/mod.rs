//! Driven ports at the hexagonal boundary.
//!
//! Domain services depend only on these traits; outbound adapters implement
//! them for HTTP upstreams, storage, and metrics exporters.

mod macros;
pub(crate) use macros::define_port_error;

mod availability_metrics;
mod availability_source;
mod check_history_repository;

#[cfg(test)]
pub use availability_metrics::MockAvailabilityMetrics;
pub use availability_metrics::{
    AvailabilityMetrics, AvailabilityMetricsError, NoOpAvailabilityMetrics,
    ResolutionMetricLabels, ResolutionTier,
};
#[cfg(test)]
pub use availability_source::{MockUsernameLookupSource, MockUsernameValidationSource};
pub use availability_source::{
    AvailabilitySourceError, LookupResponse, UsernameLookupSource, UsernameValidationSource,
    ValidationResponse,
};
#[cfg(test)]
pub use check_history_repository::MockCheckHistoryRepository;
pub use check_history_repository::{CheckHistoryRepository, CheckHistoryRepositoryError};
