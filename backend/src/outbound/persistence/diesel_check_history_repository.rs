//! PostgreSQL-backed `CheckHistoryRepository` using Diesel.
//!
//! Inserts are single-row statements, so concurrent appends never need a
//! transaction. `checked_at` comes from the injected clock so the stored
//! timestamp matches what the API reports.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;
use tracing::debug;

use super::models::{NewUsernameCheckRow, UsernameCheckRow};
use super::pool::{DbPool, PoolError};
use super::schema::username_checks;
use crate::domain::ports::{CheckHistoryRepository, CheckHistoryRepositoryError};
use crate::domain::{CheckCounts, CheckRecord, NewCheckRecord};

/// Diesel implementation of the check history port.
#[derive(Clone)]
pub struct DieselCheckHistoryRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselCheckHistoryRepository {
    /// Create a repository over `pool`, stamping records with `clock`.
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn map_pool_error(error: &PoolError) -> CheckHistoryRepositoryError {
    CheckHistoryRepositoryError::connection(error.message())
}

fn map_diesel_error(error: diesel::result::Error) -> CheckHistoryRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            CheckHistoryRepositoryError::connection("database connection error")
        }
        DieselError::QueryBuilderError(_) => {
            CheckHistoryRepositoryError::query("database query error")
        }
        _ => CheckHistoryRepositoryError::query("database error"),
    }
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

#[async_trait]
impl CheckHistoryRepository for DieselCheckHistoryRepository {
    async fn append(
        &self,
        record: &NewCheckRecord,
    ) -> Result<CheckRecord, CheckHistoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| map_pool_error(&err))?;
        let row = NewUsernameCheckRow {
            username: &record.username,
            is_available: record.is_available,
            checked_at: self.clock.utc(),
        };

        diesel::insert_into(username_checks::table)
            .values(&row)
            .returning(UsernameCheckRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(CheckRecord::from)
            .map_err(map_diesel_error)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<CheckRecord>, CheckHistoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| map_pool_error(&err))?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows: Vec<UsernameCheckRow> = username_checks::table
            .order(username_checks::id.desc())
            .limit(limit)
            .select(UsernameCheckRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(CheckRecord::from).collect())
    }

    async fn counts(&self) -> Result<CheckCounts, CheckHistoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| map_pool_error(&err))?;

        let total: i64 = username_checks::table
            .select(count_star())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let available: i64 = username_checks::table
            .filter(username_checks::is_available.eq(true))
            .select(count_star())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(CheckCounts {
            total: to_count(total),
            available: to_count(available),
        })
    }

    async fn clear(&self) -> Result<u64, CheckHistoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| map_pool_error(&err))?;

        let deleted = diesel::delete(username_checks::table)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(u64::try_from(deleted).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    //! Error mapping coverage; queries run against PostgreSQL only in
    //! deployment.

    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    #[rstest]
    fn pool_errors_map_to_connection_failures() {
        let err = map_pool_error(&PoolError::checkout("timed out"));
        assert_eq!(err, CheckHistoryRepositoryError::connection("timed out"));
    }

    #[rstest]
    #[case(DieselError::NotFound, false)]
    #[case(
        DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("closed".to_owned())
        ),
        true
    )]
    fn diesel_errors_map_by_kind(#[case] error: DieselError, #[case] connection: bool) {
        let mapped = map_diesel_error(error);
        assert_eq!(
            matches!(mapped, CheckHistoryRepositoryError::Connection { .. }),
            connection
        );
    }

    #[rstest]
    fn negative_counts_clamp_to_zero() {
        assert_eq!(to_count(-1), 0);
        assert_eq!(to_count(7), 7);
    }
}
