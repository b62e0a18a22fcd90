//! The store handles shared by every service call.

use std::sync::Arc;

use tracing::info;

use txgraph_db::{BusinessStore, SqliteBusinessStore};
use txgraph_graph::{schema, GraphClient, GraphStore, MemoryGraphStore, Neo4jGraphStore};

use crate::config::{AppConfig, GraphBackend};
use crate::error::TxGraphResult;

/// Relational and graph access layers, built once and passed explicitly.
#[derive(Clone)]
pub struct Stores {
    pub businesses: Arc<dyn BusinessStore>,
    pub graph: Arc<dyn GraphStore>,
}

impl Stores {
    pub fn new(businesses: Arc<dyn BusinessStore>, graph: Arc<dyn GraphStore>) -> Self {
        Self { businesses, graph }
    }

    /// Open the stores named by `config`.
    ///
    /// The Bolt pool is created lazily and the business constraint is
    /// attempted on it; an unreachable graph server only logs a warning here
    /// and surfaces as an error on the first query.
    pub async fn from_config(config: &AppConfig) -> TxGraphResult<Self> {
        let pool = txgraph_db::init_pool(&config.database_path)?;
        let businesses: Arc<dyn BusinessStore> = Arc::new(SqliteBusinessStore::new(Arc::new(pool)));

        let graph: Arc<dyn GraphStore> = match config.graph_backend {
            GraphBackend::Bolt => {
                let store = Neo4jGraphStore::new(GraphClient::new(&config.graph).await?);
                info!(uri = %config.graph.uri, "Using Bolt graph store");
                schema::initialize_schema(store.client()).await;
                Arc::new(store)
            }
            GraphBackend::Memory => {
                info!("Using in-memory graph store");
                Arc::new(MemoryGraphStore::new())
            }
        };

        Ok(Self { businesses, graph })
    }

    /// In-memory SQLite plus an in-memory graph store.
    pub fn in_memory() -> TxGraphResult<Self> {
        let pool = txgraph_db::init_memory_pool()?;
        Ok(Self {
            businesses: Arc::new(SqliteBusinessStore::new(Arc::new(pool))),
            graph: Arc::new(MemoryGraphStore::new()),
        })
    }
}
