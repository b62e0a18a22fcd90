//! SQLite to graph synchronization.
//!
//! The startup routine rebuilds the graph store from the relational store:
//! wipe the graph, reseed SQLite, then replay every business as a node. The
//! steps run strictly in that order and the first failing step aborts the
//! rest.

pub mod business_sync;

use anyhow::{Context, Result};
use tracing::info;

use txgraph_db::{BusinessStore, SeedBusiness};

use crate::store::GraphStore;

pub use business_sync::sync_business_nodes;

/// Result of a sync operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncResult {
    pub businesses_seeded: usize,
    pub nodes_synced: usize,
    pub nodes_failed: usize,
}

impl SyncResult {
    fn merge(&mut self, other: &SyncResult) {
        self.businesses_seeded += other.businesses_seeded;
        self.nodes_synced += other.nodes_synced;
        self.nodes_failed += other.nodes_failed;
    }
}

/// Wipe the graph, reseed the relational store, and replay businesses as nodes.
pub async fn run_startup_sync(
    graph: &dyn GraphStore,
    businesses: &dyn BusinessStore,
    seed: &[SeedBusiness],
) -> Result<SyncResult> {
    info!("Starting startup graph sync");
    let mut total = SyncResult::default();

    graph.clear_all().await.context("Failed to clear graph store")?;

    total.businesses_seeded = businesses
        .reset_and_seed(seed)
        .await
        .context("Failed to reseed businesses")?;
    info!(count = total.businesses_seeded, "Businesses reseeded");

    let replay = sync_business_nodes(graph, businesses).await?;
    total.merge(&replay);

    info!(
        businesses_seeded = total.businesses_seeded,
        nodes_synced = total.nodes_synced,
        nodes_failed = total.nodes_failed,
        "Startup sync complete"
    );
    Ok(total)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use txgraph_db::{init_memory_pool, SqliteBusinessStore, DEMO_BUSINESSES};

    use super::*;
    use crate::model::{EdgeFilter, GraphEdge, GraphNode, Transaction};
    use crate::store::MemoryGraphStore;

    fn businesses() -> SqliteBusinessStore {
        SqliteBusinessStore::new(Arc::new(init_memory_pool().unwrap()))
    }

    #[tokio::test]
    async fn startup_sync_builds_one_node_per_business() {
        let graph = MemoryGraphStore::new();
        let store = businesses();

        // Leftovers from a previous run must not survive.
        graph.find_or_create_node("old-a").await.unwrap();
        graph.find_or_create_node("old-b").await.unwrap();
        graph.create_edge(&Transaction::new("old-a", "old-b", 1.0, "1")).await.unwrap();

        let result = run_startup_sync(&graph, &store, DEMO_BUSINESSES).await.unwrap();
        assert_eq!(result.businesses_seeded, 12);
        assert_eq!(result.nodes_synced, 12);
        assert_eq!(result.nodes_failed, 0);

        let rows = store.list_all().await.unwrap();
        assert_eq!(rows.len(), 12);
        let ids: HashSet<&str> = rows.iter().map(|r| r.business_id.as_str()).collect();
        assert_eq!(ids.len(), 12, "generated ids do not collide");

        assert_eq!(graph.node_count().await, 12);
        assert_eq!(graph.edge_count().await, 0);
        for row in &rows {
            assert_eq!(graph.count_edges_for_node(&row.business_id).await.unwrap(), 0);
        }
        let node_ids: HashSet<String> = graph.list_nodes().await.unwrap().into_iter().map(|n| n.id).collect();
        assert!(rows.iter().all(|r| node_ids.contains(&r.business_id)));
    }

    #[tokio::test]
    async fn replay_is_idempotent() {
        let graph = MemoryGraphStore::new();
        let store = businesses();
        store.reset_and_seed(DEMO_BUSINESSES).await.unwrap();

        sync_business_nodes(&graph, &store).await.unwrap();
        sync_business_nodes(&graph, &store).await.unwrap();
        assert_eq!(graph.node_count().await, 12);
    }

    /// Graph store whose `clear_all` fails and records any later call.
    #[derive(Default)]
    struct BrokenGraph {
        touched_after_failure: AtomicBool,
    }

    #[async_trait]
    impl GraphStore for BrokenGraph {
        async fn find_or_create_node(&self, business_id: &str) -> Result<GraphNode> {
            self.touched_after_failure.store(true, Ordering::SeqCst);
            Ok(GraphNode::new(business_id))
        }
        async fn create_edge(&self, _tx: &Transaction) -> Result<Option<Transaction>> {
            Ok(None)
        }
        async fn list_edges(&self, _filter: &EdgeFilter) -> Result<Vec<Transaction>> {
            Ok(Vec::new())
        }
        async fn list_nodes(&self) -> Result<Vec<GraphNode>> {
            Ok(Vec::new())
        }
        async fn aggregate_edges(&self) -> Result<Vec<GraphEdge>> {
            Ok(Vec::new())
        }
        async fn count_edges_for_node(&self, _business_id: &str) -> Result<u64> {
            Ok(0)
        }
        async fn clear_all(&self) -> Result<()> {
            anyhow::bail!("connection refused")
        }
    }

    #[tokio::test]
    async fn failing_step_aborts_the_rest() {
        let graph = BrokenGraph::default();
        let store = businesses();
        store.create("keep-me", "Survivor", "Testing").await.unwrap();

        let err = run_startup_sync(&graph, &store, DEMO_BUSINESSES).await.unwrap_err();
        assert!(format!("{:#}", err).contains("connection refused"));

        // Neither the reseed nor the replay ran.
        let rows = store.list_all().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].business_id, "keep-me");
        assert!(!graph.touched_after_failure.load(Ordering::SeqCst));
    }
}
