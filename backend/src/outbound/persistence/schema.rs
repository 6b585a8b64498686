//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` when a migration changes the table.

diesel::table! {
    /// Append-only username check history.
    username_checks (id) {
        /// Sequence assigned on insert.
        id -> Int8,
        /// Normalized username that was checked.
        username -> Varchar,
        /// Availability reported by the verdict.
        is_available -> Bool,
        /// Persistence timestamp.
        checked_at -> Timestamptz,
    }
}
