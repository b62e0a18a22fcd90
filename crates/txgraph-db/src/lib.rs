//! # txgraph-db
//!
//! SQLite persistence for businesses, the source of truth for business
//! identity and attributes.

pub mod migrations;
pub mod pool;
pub mod queries;
pub mod seed;
pub mod store;

use std::path::Path;

pub use pool::{DbError, DbPool, DbResult};
pub use queries::businesses::{BusinessDetails, BusinessRow};
pub use seed::{SeedBusiness, DEMO_BUSINESSES};
pub use store::{BusinessStore, SqliteBusinessStore};

/// Open the database at `path` and bring its schema up to date.
pub fn init_pool(path: &Path) -> DbResult<DbPool> {
    let pool = DbPool::open(path)?;
    migrations::run_migrations(&pool)?;
    let version = migrations::schema_version(&pool)?;
    tracing::info!(path = %path.display(), schema_version = version, "Using database");
    Ok(pool)
}

/// In-memory pool with the schema applied.
pub fn init_memory_pool() -> DbResult<DbPool> {
    let pool = DbPool::in_memory()?;
    migrations::run_migrations(&pool)?;
    Ok(pool)
}
