//! Internal Diesel row structs for the check history table.
//!
//! These types never leave the persistence layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::username_checks;
use crate::domain::CheckRecord;

/// Row read back from `username_checks`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = username_checks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UsernameCheckRow {
    pub id: i64,
    pub username: String,
    pub is_available: bool,
    pub checked_at: DateTime<Utc>,
}

impl From<UsernameCheckRow> for CheckRecord {
    fn from(row: UsernameCheckRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            is_available: row.is_available,
            checked_at: row.checked_at,
        }
    }
}

/// Insertable row for a new check outcome.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = username_checks)]
pub(crate) struct NewUsernameCheckRow<'a> {
    pub username: &'a str,
    pub is_available: bool,
    pub checked_at: DateTime<Utc>,
}
