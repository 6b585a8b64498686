//! PostgreSQL persistence adapters using Diesel.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module.
//!
//! ```ignore
//! use namecheck::outbound::persistence::{DbPool, DieselCheckHistoryRepository, PoolConfig};
//!
//! run_pending_migrations(url).await?;
//! let pool = DbPool::new(PoolConfig::new(url)).await?;
//! let history = DieselCheckHistoryRepository::new(pool, clock);
//! ```

mod diesel_check_history_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_check_history_repository::DieselCheckHistoryRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
