//! Driven port for the append-only check history.
//!
//! Implementations assign the record id and `checked_at` timestamp at append
//! time. Appends must be safe under concurrent writers; no operation spans
//! more than one record except [`CheckHistoryRepository::clear`].

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{CheckCounts, CheckRecord, NewCheckRecord};

define_port_error! {
    /// Errors raised by check history adapters.
    pub enum CheckHistoryRepositoryError {
        /// The backing store could not be reached.
        Connection { message: String } =>
            "check history connection failed: {message}",
        /// A query failed during execution.
        Query { message: String } =>
            "check history query failed: {message}",
    }
}

/// Port for persisting and querying check records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckHistoryRepository: Send + Sync {
    /// Persist one outcome and return the stored record.
    async fn append(
        &self,
        record: &NewCheckRecord,
    ) -> Result<CheckRecord, CheckHistoryRepositoryError>;

    /// Return at most `limit` records, newest first.
    async fn recent(&self, limit: usize) -> Result<Vec<CheckRecord>, CheckHistoryRepositoryError>;

    /// Aggregate counts over every stored record.
    async fn counts(&self) -> Result<CheckCounts, CheckHistoryRepositoryError>;

    /// Delete every record, returning how many were removed.
    async fn clear(&self) -> Result<u64, CheckHistoryRepositoryError>;
}
