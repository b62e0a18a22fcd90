//! Async access to the business table.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::pool::{DbError, DbPool, DbResult};
use crate::queries::businesses::{self as queries, BusinessDetails, BusinessRow};
use crate::seed::SeedBusiness;

/// Relational access layer used by the services and the startup sync.
#[async_trait]
pub trait BusinessStore: Send + Sync {
    async fn list_all(&self) -> DbResult<Vec<BusinessRow>>;

    async fn find_by_id(&self, business_id: &str) -> DbResult<Option<BusinessRow>>;

    /// Insert a business, returning the relational row id.
    async fn create(&self, business_id: &str, name: &str, industry: &str) -> DbResult<i64>;

    /// Name and industry maps for `business_ids`; unknown ids are left out.
    async fn batch_get_details(&self, business_ids: &HashSet<String>) -> DbResult<BusinessDetails>;

    /// Truncate and reload the table, returning the number of rows inserted.
    async fn reset_and_seed(&self, seed: &[SeedBusiness]) -> DbResult<usize>;
}

/// [`BusinessStore`] backed by SQLite.
///
/// rusqlite is synchronous, so every call hops onto the blocking pool.
#[derive(Clone)]
pub struct SqliteBusinessStore {
    pool: Arc<DbPool>,
}

impl SqliteBusinessStore {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    async fn blocking<T, F>(&self, f: F) -> DbResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&DbPool) -> DbResult<T> + Send + 'static,
    {
        let pool = Arc::clone(&self.pool);
        tokio::task::spawn_blocking(move || f(&pool))
            .await
            .map_err(|e| DbError::Task(e.to_string()))?
    }
}

#[async_trait]
impl BusinessStore for SqliteBusinessStore {
    async fn list_all(&self) -> DbResult<Vec<BusinessRow>> {
        self.blocking(queries::list_businesses).await
    }

    async fn find_by_id(&self, business_id: &str) -> DbResult<Option<BusinessRow>> {
        let id = business_id.to_string();
        self.blocking(move |pool| queries::get_business(pool, &id)).await
    }

    async fn create(&self, business_id: &str, name: &str, industry: &str) -> DbResult<i64> {
        let (id, name, industry) = (business_id.to_string(), name.to_string(), industry.to_string());
        self.blocking(move |pool| queries::create_business(pool, &id, &name, &industry))
            .await
    }

    async fn batch_get_details(&self, business_ids: &HashSet<String>) -> DbResult<BusinessDetails> {
        if business_ids.is_empty() {
            return Ok(BusinessDetails::default());
        }
        let ids = business_ids.clone();
        self.blocking(move |pool| queries::get_business_details(pool, &ids)).await
    }

    async fn reset_and_seed(&self, seed: &[SeedBusiness]) -> DbResult<usize> {
        let seed = seed.to_vec();
        self.blocking(move |pool| queries::reset_businesses(pool, &seed)).await
    }
}
