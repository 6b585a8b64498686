//! Check history kept in process memory.
//!
//! Used when no database URL is configured. Contents are lost on restart.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{CheckHistoryRepository, CheckHistoryRepositoryError};
use crate::domain::{CheckCounts, CheckRecord, NewCheckRecord};

#[derive(Default)]
struct HistoryState {
    next_id: i64,
    records: Vec<CheckRecord>,
}

/// Append-only list of check records stamped with the injected clock.
pub struct InMemoryCheckHistory {
    clock: Arc<dyn Clock>,
    state: Mutex<HistoryState>,
}

impl InMemoryCheckHistory {
    /// Create an empty history whose records are stamped by `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: Mutex::new(HistoryState::default()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HistoryState>, CheckHistoryRepositoryError> {
        self.state
            .lock()
            .map_err(|_| CheckHistoryRepositoryError::connection("history state poisoned"))
    }
}

#[async_trait]
impl CheckHistoryRepository for InMemoryCheckHistory {
    async fn append(
        &self,
        record: &NewCheckRecord,
    ) -> Result<CheckRecord, CheckHistoryRepositoryError> {
        let checked_at = self.clock.utc();
        let mut state = self.lock()?;
        state.next_id += 1;
        let stored = CheckRecord {
            id: state.next_id,
            username: record.username.clone(),
            is_available: record.is_available,
            checked_at,
        };
        state.records.push(stored.clone());
        Ok(stored)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<CheckRecord>, CheckHistoryRepositoryError> {
        let state = self.lock()?;
        // Appends are chronological, so reverse insertion order is newest first.
        Ok(state.records.iter().rev().take(limit).cloned().collect())
    }

    async fn counts(&self) -> Result<CheckCounts, CheckHistoryRepositoryError> {
        let state = self.lock()?;
        let total = state.records.len() as u64;
        let available = state.records.iter().filter(|r| r.is_available).count() as u64;
        Ok(CheckCounts { total, available })
    }

    async fn clear(&self) -> Result<u64, CheckHistoryRepositoryError> {
        let mut state = self.lock()?;
        let deleted = state.records.len() as u64;
        state.records.clear();
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MutableClock;
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        let start = Utc
            .with_ymd_and_hms(2026, 1, 5, 8, 0, 0)
            .single()
            .expect("valid timestamp");
        Arc::new(MutableClock::new(start))
    }

    fn record(username: &str, is_available: bool) -> NewCheckRecord {
        NewCheckRecord {
            username: username.to_owned(),
            is_available,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn append_assigns_ids_and_timestamps(clock: Arc<MutableClock>) {
        let history = InMemoryCheckHistory::new(clock.clone());
        let first = history.append(&record("alpha", true)).await.expect("append");
        clock.advance_seconds(5);
        let second = history.append(&record("bravo", false)).await.expect("append");

        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(second.checked_at - first.checked_at, chrono::TimeDelta::seconds(5));
    }

    #[rstest]
    #[tokio::test]
    async fn recent_returns_newest_first(clock: Arc<MutableClock>) {
        let history = InMemoryCheckHistory::new(clock.clone());
        for name in ["alpha", "bravo", "charlie"] {
            history.append(&record(name, true)).await.expect("append");
            clock.advance_seconds(1);
        }

        let recent = history.recent(2).await.expect("recent");
        let names: Vec<_> = recent.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(names, ["charlie", "bravo"]);
    }

    #[rstest]
    #[tokio::test]
    async fn counts_and_clear(clock: Arc<MutableClock>) {
        let history = InMemoryCheckHistory::new(clock);
        history.append(&record("alpha", true)).await.expect("append");
        history.append(&record("bravo", false)).await.expect("append");
        history.append(&record("charlie", false)).await.expect("append");

        let counts = history.counts().await.expect("counts");
        assert_eq!((counts.total, counts.available, counts.taken()), (3, 1, 2));

        assert_eq!(history.clear().await.expect("clear"), 3);
        assert_eq!(history.counts().await.expect("counts"), CheckCounts::default());
        assert!(history.recent(10).await.expect("recent").is_empty());
    }
}
