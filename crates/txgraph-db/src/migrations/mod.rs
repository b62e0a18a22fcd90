//! Schema bootstrap.
//!
//! One migration creates the `businesses` table; `rusqlite_migration`
//! records it in `PRAGMA user_version` so reopening a file is a no-op.

use rusqlite_migration::{Migrations, M};

use crate::pool::{DbError, DbPool, DbResult};

const BUSINESSES_TABLE: &str = "
CREATE TABLE IF NOT EXISTS businesses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    business_id TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    industry TEXT NOT NULL,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);
";

fn migrations() -> Migrations<'static> {
    Migrations::new(vec![M::up(BUSINESSES_TABLE)])
}

/// Bring the schema behind `pool` up to date.
pub fn run_migrations(pool: &DbPool) -> DbResult<()> {
    let migrations = migrations();
    pool.with_conn_mut(|conn| {
        migrations
            .to_latest(conn)
            .map_err(|e| DbError::Migration(e.to_string()))
    })
}

/// Number of applied migrations.
pub fn schema_version(pool: &DbPool) -> DbResult<i64> {
    pool.with_conn(|conn| Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_creates_businesses_table() {
        let pool = DbPool::in_memory().unwrap();
        assert_eq!(schema_version(&pool).unwrap(), 0);
        run_migrations(&pool).unwrap();
        assert_eq!(schema_version(&pool).unwrap(), 1);

        let columns: Vec<String> = pool
            .with_conn(|conn| {
                let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('businesses')")?;
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(names)
            })
            .unwrap();
        assert_eq!(columns, vec!["id", "business_id", "name", "industry", "created_at"]);
    }

    #[test]
    fn reopening_a_file_keeps_the_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("txgraph.db");

        run_migrations(&DbPool::open(&path).unwrap()).unwrap();
        let reopened = DbPool::open(&path).unwrap();
        run_migrations(&reopened).unwrap();
        assert_eq!(schema_version(&reopened).unwrap(), 1);
    }

    #[test]
    fn migration_list_is_valid() {
        assert!(migrations().validate().is_ok());
    }
}
