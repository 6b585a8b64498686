//! Two-tier availability resolution.
//!
//! The primary validation endpoint is asked first. Any failure there (bad
//! status, wrong content type, missing code, timeout, transport error, or a
//! panic inside the adapter) moves the check to the fallback lookup endpoint.
//! If the fallback fails too, the resolver returns an `error` verdict. The
//! resolver never fails and never panics outward.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::FutureExt;
use tracing::{debug, warn};

use super::ports::{
    AvailabilityMetrics, AvailabilitySourceError, LookupResponse, NoOpAvailabilityMetrics,
    ResolutionMetricLabels, ResolutionTier, UsernameLookupSource, UsernameValidationSource,
};
use super::{AvailabilityStatus, AvailabilityVerdict, Username};

/// Outcome of one resolution tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierOutcome {
    /// The tier produced a verdict.
    Resolved(AvailabilityVerdict),
    /// The tier failed and the next tier should be tried.
    NeedsFallback(AvailabilitySourceError),
    /// The tier failed and no further tier remains.
    Failed(AvailabilitySourceError),
}

/// Resolves a syntactically valid username into a verdict.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvailabilityResolver: Send + Sync {
    /// Classify `username`. Implementations must always return a verdict.
    async fn resolve(&self, username: &Username) -> AvailabilityVerdict;
}

/// Resolver chaining the validation endpoint and the lookup fallback.
pub struct TieredAvailabilityResolver {
    primary: Arc<dyn UsernameValidationSource>,
    fallback: Arc<dyn UsernameLookupSource>,
    metrics: Arc<dyn AvailabilityMetrics>,
}

impl TieredAvailabilityResolver {
    /// Build a resolver reporting tier usage to `metrics`.
    pub fn new(
        primary: Arc<dyn UsernameValidationSource>,
        fallback: Arc<dyn UsernameLookupSource>,
        metrics: Arc<dyn AvailabilityMetrics>,
    ) -> Self {
        Self {
            primary,
            fallback,
            metrics,
        }
    }

    /// Build a resolver that discards metrics.
    pub fn with_noop_metrics(
        primary: Arc<dyn UsernameValidationSource>,
        fallback: Arc<dyn UsernameLookupSource>,
    ) -> Self {
        Self::new(primary, fallback, Arc::new(NoOpAvailabilityMetrics))
    }

    /// Ask the primary validation endpoint.
    pub async fn primary_tier(&self, username: &Username) -> TierOutcome {
        match AssertUnwindSafe(self.primary.validate(username))
            .catch_unwind()
            .await
        {
            Ok(Ok(response)) => {
                let status = AvailabilityStatus::from_validation_code(response.code);
                let verdict = AvailabilityVerdict::new(username.as_str(), status);
                let verdict = match response.message.filter(|m| !m.trim().is_empty()) {
                    Some(message) => verdict.with_message(message),
                    None => verdict,
                };
                TierOutcome::Resolved(verdict)
            }
            Ok(Err(error)) => TierOutcome::NeedsFallback(error),
            Err(payload) => TierOutcome::NeedsFallback(AvailabilitySourceError::unexpected(
                panic_message(payload.as_ref()),
            )),
        }
    }

    /// Ask the fallback lookup endpoint.
    pub async fn fallback_tier(&self, username: &Username) -> TierOutcome {
        match AssertUnwindSafe(self.fallback.lookup(username))
            .catch_unwind()
            .await
        {
            Ok(Ok(LookupResponse { matches })) => {
                let status = if matches == 0 {
                    AvailabilityStatus::Available
                } else {
                    AvailabilityStatus::Taken
                };
                TierOutcome::Resolved(AvailabilityVerdict::new(username.as_str(), status))
            }
            Ok(Err(error)) => TierOutcome::Failed(error),
            Err(payload) => TierOutcome::Failed(AvailabilitySourceError::unexpected(
                panic_message(payload.as_ref()),
            )),
        }
    }

    async fn resolve_with_fallback(
        &self,
        username: &Username,
    ) -> (ResolutionTier, AvailabilityVerdict) {
        match self.fallback_tier(username).await {
            TierOutcome::Resolved(verdict) => (ResolutionTier::Fallback, verdict),
            TierOutcome::NeedsFallback(reason) | TierOutcome::Failed(reason) => {
                warn!(%username, %reason, "fallback availability lookup failed");
                (
                    ResolutionTier::Unresolved,
                    AvailabilityVerdict::unverified(username.as_str()),
                )
            }
        }
    }

    async fn record(&self, tier: ResolutionTier, verdict: &AvailabilityVerdict) {
        let labels = ResolutionMetricLabels {
            tier,
            status: verdict.status(),
        };
        if let Err(error) = self.metrics.record_resolution(&labels).await {
            debug!(%error, "availability metrics write failed");
        }
    }
}

#[async_trait]
impl AvailabilityResolver for TieredAvailabilityResolver {
    async fn resolve(&self, username: &Username) -> AvailabilityVerdict {
        let (tier, verdict) = match self.primary_tier(username).await {
            TierOutcome::Resolved(verdict) => (ResolutionTier::Primary, verdict),
            TierOutcome::NeedsFallback(reason) | TierOutcome::Failed(reason) => {
                warn!(%username, %reason, "primary availability check failed; trying lookup");
                self.resolve_with_fallback(username).await
            }
        };
        self.record(tier, &verdict).await;
        verdict
    }
}

/// Best-effort text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_owned()
    }
}

#[cfg(test)]
#[path = "availability_resolver_tests.rs"]
mod tests;
