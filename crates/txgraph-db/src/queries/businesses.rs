//! Business-related database queries.

use std::collections::{HashMap, HashSet};

use rusqlite::{params, params_from_iter, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::pool::{DbPool, DbResult};
use crate::seed::SeedBusiness;

/// SQLite caps the number of bound parameters per statement.
const IN_LIST_CHUNK: usize = 500;

/// Business row from database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRow {
    pub id: i64,
    pub business_id: String,
    pub name: String,
    pub industry: String,
    pub created_at: Option<String>,
}

/// Name and industry lookups keyed by `business_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BusinessDetails {
    #[serde(rename = "nameMap")]
    pub name_map: HashMap<String, String>,
    #[serde(rename = "industryMap")]
    pub industry_map: HashMap<String, String>,
}

fn row_to_business(row: &rusqlite::Row) -> rusqlite::Result<BusinessRow> {
    Ok(BusinessRow {
        id: row.get(0)?,
        business_id: row.get(1)?,
        name: row.get(2)?,
        industry: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// List all businesses in insertion order.
pub fn list_businesses(pool: &DbPool) -> DbResult<Vec<BusinessRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT id, business_id, name, industry, created_at FROM businesses ORDER BY id",
        )?;
        let rows = stmt.query_map([], row_to_business)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    })
}

/// Get a business by its `business_id`.
pub fn get_business(pool: &DbPool, business_id: &str) -> DbResult<Option<BusinessRow>> {
    pool.with_conn(|conn| {
        let row = conn
            .query_row(
                "SELECT id, business_id, name, industry, created_at
                 FROM businesses WHERE business_id = ?1",
                params![business_id],
                row_to_business,
            )
            .optional()?;
        Ok(row)
    })
}

/// Insert a business and return its row id.
pub fn create_business(pool: &DbPool, business_id: &str, name: &str, industry: &str) -> DbResult<i64> {
    pool.with_conn(|conn| {
        conn.execute(
            "INSERT INTO businesses (business_id, name, industry) VALUES (?1, ?2, ?3)",
            params![business_id, name, industry],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Fetch name and industry for a set of ids.
///
/// An empty set returns empty maps without opening a connection. Ids with no
/// matching row are absent from both maps.
pub fn get_business_details(pool: &DbPool, business_ids: &HashSet<String>) -> DbResult<BusinessDetails> {
    if business_ids.is_empty() {
        return Ok(BusinessDetails::default());
    }

    let ids: Vec<&str> = business_ids.iter().map(String::as_str).collect();
    pool.with_conn(|conn| {
        let mut details = BusinessDetails::default();
        for chunk in ids.chunks(IN_LIST_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(",");
            let sql = format!(
                "SELECT business_id, name, industry FROM businesses WHERE business_id IN ({})",
                placeholders
            );
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(chunk.iter()))?;
            while let Some(row) = rows.next()? {
                let id: String = row.get(0)?;
                details.name_map.insert(id.clone(), row.get(1)?);
                details.industry_map.insert(id, row.get(2)?);
            }
        }
        Ok(details)
    })
}

/// Truncate the businesses table and insert `seed` with fresh ids.
///
/// Runs in a single SQLite transaction. Returns the number of rows inserted.
pub fn reset_businesses(pool: &DbPool, seed: &[SeedBusiness]) -> DbResult<usize> {
    pool.with_conn_mut(|conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM businesses", [])?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO businesses (business_id, name, industry) VALUES (?1, ?2, ?3)")?;
            for business in seed {
                let id = Uuid::new_v4().to_string();
                stmt.execute(params![id, business.name, business.industry])?;
                debug!(business_id = %id, name = business.name, industry = business.industry, "Inserted business");
            }
        }
        tx.commit()?;
        Ok(seed.len())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;
    use crate::seed::DEMO_BUSINESSES;

    fn pool() -> DbPool {
        let pool = DbPool::in_memory().unwrap();
        run_migrations(&pool).unwrap();
        pool
    }

    #[test]
    fn create_then_find() {
        let pool = pool();
        let row_id = create_business(&pool, "b-1", "Apex Industries", "Manufacturing").unwrap();
        assert_eq!(row_id, 1);

        let found = get_business(&pool, "b-1").unwrap().unwrap();
        assert_eq!(found.name, "Apex Industries");
        assert_eq!(found.industry, "Manufacturing");
        assert!(found.created_at.is_some());

        assert!(get_business(&pool, "nope").unwrap().is_none());
    }

    #[test]
    fn duplicate_business_id_is_rejected() {
        let pool = pool();
        create_business(&pool, "b-1", "A", "X").unwrap();
        assert!(create_business(&pool, "b-1", "B", "Y").is_err());
    }

    #[test]
    fn details_contain_only_known_ids() {
        let pool = pool();
        create_business(&pool, "a", "Alpha", "Energy").unwrap();
        create_business(&pool, "b", "Beta", "Retail").unwrap();

        let ids: HashSet<String> = ["a", "b", "ghost"].iter().map(|s| s.to_string()).collect();
        let details = get_business_details(&pool, &ids).unwrap();

        assert_eq!(details.name_map.len(), 2);
        assert_eq!(details.name_map["a"], "Alpha");
        assert_eq!(details.industry_map["b"], "Retail");
        assert!(!details.name_map.contains_key("ghost"));
        assert!(!details.industry_map.contains_key("ghost"));
    }

    #[test]
    fn empty_details_request_skips_the_store() {
        let pool = pool();
        // Any query would fail against a missing table.
        pool.with_conn(|conn| Ok(conn.execute_batch("DROP TABLE businesses")?)).unwrap();

        let details = get_business_details(&pool, &HashSet::new()).unwrap();
        assert_eq!(details, BusinessDetails::default());
    }

    #[test]
    fn details_span_multiple_chunks() {
        let pool = pool();
        let mut ids = HashSet::new();
        for i in 0..(IN_LIST_CHUNK + 20) {
            let id = format!("biz-{i}");
            create_business(&pool, &id, &format!("Business {i}"), "Test").unwrap();
            ids.insert(id);
        }

        let details = get_business_details(&pool, &ids).unwrap();
        assert_eq!(details.name_map.len(), IN_LIST_CHUNK + 20);
    }

    #[test]
    fn reset_replaces_rows_with_fresh_ids() {
        let pool = pool();
        create_business(&pool, "stale", "Stale Co", "Nothing").unwrap();

        let inserted = reset_businesses(&pool, DEMO_BUSINESSES).unwrap();
        assert_eq!(inserted, 12);

        let first = list_businesses(&pool).unwrap();
        assert_eq!(first.len(), 12);
        assert!(first.iter().all(|b| b.business_id != "stale"));
        let unique: HashSet<&str> = first.iter().map(|b| b.business_id.as_str()).collect();
        assert_eq!(unique.len(), 12);

        reset_businesses(&pool, DEMO_BUSINESSES).unwrap();
        let second = list_businesses(&pool).unwrap();
        assert_eq!(second.len(), 12);
        assert!(second.iter().all(|b| !unique.contains(b.business_id.as_str())));
    }
}
