//! Check history records and the read/clear service behind the history API.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::error;

use super::Error;
use super::ports::{CheckHistoryRepository, CheckHistoryRepositoryError};

/// Default number of records returned by [`CheckHistoryService::recent`].
pub const DEFAULT_RECENT_LIMIT: usize = 10;
/// Largest page [`CheckHistoryService::recent`] will return.
pub const MAX_RECENT_LIMIT: usize = 100;

/// One persisted check outcome.
///
/// ## Invariants
/// - `id` is unique and increases with insertion order.
/// - `checked_at` is assigned by the store when the record is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRecord {
    /// Store-assigned sequence number.
    pub id: i64,
    /// Checked username, as normalized by validation.
    pub username: String,
    /// Availability reported by the verdict.
    pub is_available: bool,
    /// Persistence timestamp.
    pub checked_at: DateTime<Utc>,
}

/// Outcome awaiting persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCheckRecord {
    /// Checked username.
    pub username: String,
    /// Availability reported by the verdict.
    pub is_available: bool,
}

/// Aggregate counts over the whole store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckCounts {
    /// Every stored record.
    pub total: u64,
    /// Records marked available.
    pub available: u64,
}

impl CheckCounts {
    /// Records not marked available.
    #[must_use]
    pub const fn taken(&self) -> u64 {
        self.total.saturating_sub(self.available)
    }
}

pub(crate) fn map_history_error(error: &CheckHistoryRepositoryError) -> Error {
    error!(%error, "check history operation failed");
    Error::internal(format!("check history unavailable: {error}"))
}

/// Read and clear operations over the check history.
#[derive(Clone)]
pub struct CheckHistoryService {
    repository: Arc<dyn CheckHistoryRepository>,
}

impl CheckHistoryService {
    /// Wrap a history repository.
    pub fn new(repository: Arc<dyn CheckHistoryRepository>) -> Self {
        Self { repository }
    }

    /// Newest records first; `limit` is capped at [`MAX_RECENT_LIMIT`].
    ///
    /// # Errors
    /// Returns an internal error when the store fails.
    pub async fn recent(&self, limit: usize) -> Result<Vec<CheckRecord>, Error> {
        self.repository
            .recent(limit.min(MAX_RECENT_LIMIT))
            .await
            .map_err(|err| map_history_error(&err))
    }

    /// Aggregate counts over all records.
    ///
    /// # Errors
    /// Returns an internal error when the store fails.
    pub async fn counts(&self) -> Result<CheckCounts, Error> {
        self.repository
            .counts()
            .await
            .map_err(|err| map_history_error(&err))
    }

    /// Delete every record.
    ///
    /// # Errors
    /// Returns an internal error when the store fails.
    pub async fn clear(&self) -> Result<u64, Error> {
        self.repository
            .clear()
            .await
            .map_err(|err| map_history_error(&err))
    }
}
