//! Single username check: validate, resolve, persist.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use super::check_history::map_history_error;
use super::ports::CheckHistoryRepository;
use super::{
    AvailabilityResolver, AvailabilityVerdict, Error, InvalidUsername, NewCheckRecord, Username,
};

/// Verdict together with the time it was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedVerdict {
    /// Resolver verdict.
    pub verdict: AvailabilityVerdict,
    /// Persistence timestamp of the matching history record.
    pub checked_at: DateTime<Utc>,
}

/// Map a syntax rejection to a client error listing every violation.
pub fn invalid_username_error(error: &InvalidUsername) -> Error {
    let violations = error
        .violations()
        .iter()
        .map(|violation| json!({ "code": violation.code(), "message": violation.message() }))
        .collect::<Vec<_>>();
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": "username",
        "value": error.value(),
        "violations": violations,
    }))
}

/// Service behind the single-check endpoint.
#[derive(Clone)]
pub struct UsernameCheckService {
    resolver: Arc<dyn AvailabilityResolver>,
    history: Arc<dyn CheckHistoryRepository>,
}

impl UsernameCheckService {
    /// Build the service from its ports.
    pub fn new(
        resolver: Arc<dyn AvailabilityResolver>,
        history: Arc<dyn CheckHistoryRepository>,
    ) -> Self {
        Self { resolver, history }
    }

    /// Check one raw candidate and record the outcome.
    ///
    /// # Errors
    /// - `invalid_request` when the candidate fails syntax validation.
    /// - `internal_error` when the outcome cannot be persisted.
    pub async fn check(&self, raw: &str) -> Result<RecordedVerdict, Error> {
        let username = Username::parse(raw).map_err(|err| invalid_username_error(&err))?;
        let verdict = self.resolver.resolve(&username).await;
        let record = self
            .history
            .append(&NewCheckRecord {
                username: verdict.username().to_owned(),
                is_available: verdict.is_available(),
            })
            .await
            .map_err(|err| map_history_error(&err))?;
        Ok(RecordedVerdict {
            verdict,
            checked_at: record.checked_at,
        })
    }
}
