//! Sequential, paced bulk username checking.
//!
//! A batch is normalized into candidate lines and partitioned by syntax.
//! Invalid candidates are reported first without any network call. Valid ones
//! are resolved strictly one at a time, in input order, with a fixed pause
//! between consecutive resolutions to stay under the upstream platform's
//! abuse thresholds. A failure on one username is captured in its result item
//! and never aborts the batch.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::FutureExt;
use mockable::Clock;
use tracing::{error, info};

use super::availability_resolver::panic_message;
use super::ports::CheckHistoryRepository;
use super::{
    AvailabilityResolver, AvailabilityVerdict, NewCheckRecord, Username, UsernameViolation,
    normalize_candidates, validate_username,
};

/// Pause between consecutive upstream resolutions.
pub const DEFAULT_BULK_PACING: Duration = Duration::from_millis(200);
/// Error text attached to candidates failing syntax validation.
pub const INVALID_FORMAT_ERROR: &str = "invalid username format";
/// Error text attached to candidates whose check failed unexpectedly.
pub const UNEXPECTED_CHECK_ERROR: &str = "unexpected error while checking username";
/// Error text attached to candidates whose outcome could not be stored.
pub const RECORD_FAILED_ERROR: &str = "could not record check result";

/// Async pause used between resolutions.
#[async_trait]
pub trait PacingSleeper: Send + Sync {
    /// Suspend the calling task for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Tokio-timer sleeper.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl PacingSleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Bulk checking tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkCheckConfig {
    /// Pause between consecutive resolutions.
    pub pacing: Duration,
}

impl Default for BulkCheckConfig {
    fn default() -> Self {
        Self {
            pacing: DEFAULT_BULK_PACING,
        }
    }
}

/// What happened to one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkItemOutcome {
    /// Rejected by syntax validation; no upstream call was made.
    InvalidFormat {
        /// Failed rules.
        violations: Vec<UsernameViolation>,
    },
    /// Resolved and persisted.
    Checked(AvailabilityVerdict),
    /// The check failed unexpectedly; nothing was persisted.
    Failed {
        /// Client-facing reason.
        reason: String,
    },
}

/// One entry of a bulk report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkCheckItem {
    /// Candidate after trimming.
    pub username: String,
    /// Outcome for the candidate.
    pub outcome: BulkItemOutcome,
    /// Persistence time for checked items, processing time otherwise.
    pub timestamp: DateTime<Utc>,
}

impl BulkCheckItem {
    /// Availability when known; `None` for invalid or failed items.
    #[must_use]
    pub fn is_available(&self) -> Option<bool> {
        match &self.outcome {
            BulkItemOutcome::Checked(verdict) => Some(verdict.is_available()),
            BulkItemOutcome::InvalidFormat { .. } | BulkItemOutcome::Failed { .. } => None,
        }
    }

    /// Error text for invalid or failed items.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            BulkItemOutcome::InvalidFormat { .. } => Some(INVALID_FORMAT_ERROR),
            BulkItemOutcome::Failed { reason } => Some(reason),
            BulkItemOutcome::Checked(_) => None,
        }
    }
}

/// Counters derived from one batch's own results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BulkSummary {
    /// Normalized candidate lines.
    pub total: usize,
    /// Candidates passing syntax validation.
    pub processed: usize,
    /// Candidates failing syntax validation.
    pub errors: usize,
    /// Items reported available.
    pub available: usize,
    /// Items reported unavailable, whatever the status.
    pub taken: usize,
}

/// Ordered results plus summary for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkCheckReport {
    /// Invalid-format items first, then checked items in input order.
    pub results: Vec<BulkCheckItem>,
    /// Batch counters.
    pub summary: BulkSummary,
}

/// Orchestrates one bulk batch at a time per caller.
#[derive(Clone)]
pub struct BulkCheckService {
    resolver: Arc<dyn AvailabilityResolver>,
    history: Arc<dyn CheckHistoryRepository>,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn PacingSleeper>,
    config: BulkCheckConfig,
}

impl BulkCheckService {
    /// Build a service pausing with the Tokio timer.
    pub fn new(
        resolver: Arc<dyn AvailabilityResolver>,
        history: Arc<dyn CheckHistoryRepository>,
        clock: Arc<dyn Clock>,
        config: BulkCheckConfig,
    ) -> Self {
        Self::with_sleeper(resolver, history, clock, Arc::new(TokioSleeper), config)
    }

    /// Build a service with an injected sleeper.
    pub fn with_sleeper(
        resolver: Arc<dyn AvailabilityResolver>,
        history: Arc<dyn CheckHistoryRepository>,
        clock: Arc<dyn Clock>,
        sleeper: Arc<dyn PacingSleeper>,
        config: BulkCheckConfig,
    ) -> Self {
        Self {
            resolver,
            history,
            clock,
            sleeper,
            config,
        }
    }

    /// Process one batch of raw entries.
    ///
    /// ```rust,ignore
    /// let report = service.process_batch(&["ab", "good_name", "bad__name"]).await;
    /// assert_eq!(report.summary.total, 3);
    /// ```
    pub async fn process_batch<S: AsRef<str> + Sync>(&self, raw_entries: &[S]) -> BulkCheckReport {
        let lines = normalize_candidates(raw_entries);
        let total = lines.len();

        let mut results = Vec::with_capacity(total);
        let mut validated = Vec::new();
        for line in lines {
            match validate_username(&line).into_username() {
                Ok(username) => validated.push(username),
                Err(invalid) => results.push(BulkCheckItem {
                    username: invalid.value().to_owned(),
                    outcome: BulkItemOutcome::InvalidFormat {
                        violations: invalid.violations().to_vec(),
                    },
                    timestamp: self.clock.utc(),
                }),
            }
        }
        let errors = results.len();
        let processed = validated.len();
        info!(total, processed, errors, "bulk check started");

        let mut remaining = validated.into_iter().peekable();
        while let Some(username) = remaining.next() {
            results.push(self.check_one(username).await);
            if remaining.peek().is_some() {
                self.sleeper.sleep(self.config.pacing).await;
            }
        }

        let summary = BulkSummary {
            total,
            processed,
            errors,
            available: count_availability(&results, true),
            taken: count_availability(&results, false),
        };
        info!(
            total = summary.total,
            available = summary.available,
            taken = summary.taken,
            errors = summary.errors,
            "bulk check finished"
        );
        BulkCheckReport { results, summary }
    }

    async fn check_one(&self, username: Username) -> BulkCheckItem {
        let verdict = match AssertUnwindSafe(self.resolver.resolve(&username))
            .catch_unwind()
            .await
        {
            Ok(verdict) => verdict,
            Err(payload) => {
                error!(
                    %username,
                    panic = %panic_message(payload.as_ref()),
                    "availability resolver panicked"
                );
                return self.failed(username, UNEXPECTED_CHECK_ERROR);
            }
        };

        let record = NewCheckRecord {
            username: verdict.username().to_owned(),
            is_available: verdict.is_available(),
        };
        match self.history.append(&record).await {
            Ok(stored) => BulkCheckItem {
                username: username.as_str().to_owned(),
                outcome: BulkItemOutcome::Checked(verdict),
                timestamp: stored.checked_at,
            },
            Err(err) => {
                error!(%username, error = %err, "failed to record bulk check result");
                self.failed(username, RECORD_FAILED_ERROR)
            }
        }
    }

    fn failed(&self, username: Username, reason: &str) -> BulkCheckItem {
        BulkCheckItem {
            username: username.as_str().to_owned(),
            outcome: BulkItemOutcome::Failed {
                reason: reason.to_owned(),
            },
            timestamp: self.clock.utc(),
        }
    }
}

fn count_availability(results: &[BulkCheckItem], available: bool) -> usize {
    results
        .iter()
        .filter(|item| item.is_available() == Some(available))
        .count()
}

#[cfg(test)]
#[path = "bulk_check_tests.rs"]
mod tests;
