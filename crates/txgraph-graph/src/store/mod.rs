//! Graph access layer.
//!
//! [`GraphStore`] is the seam between the services and the graph database.
//! [`Neo4jGraphStore`] talks Bolt; [`MemoryGraphStore`] keeps the same
//! semantics in process.

pub mod memory;
pub mod neo4j;

use anyhow::Result;
use async_trait::async_trait;

use crate::model::{EdgeFilter, GraphEdge, GraphNode, Transaction};

pub use memory::MemoryGraphStore;
pub use neo4j::Neo4jGraphStore;

#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Upsert the node for `business_id`. Never fails because it already exists.
    async fn find_or_create_node(&self, business_id: &str) -> Result<GraphNode>;

    /// Create one edge between two existing nodes.
    ///
    /// Returns `Ok(None)` without touching the store when either endpoint is
    /// missing.
    async fn create_edge(&self, tx: &Transaction) -> Result<Option<Transaction>>;

    /// Transactions matching `filter`, most recent first.
    async fn list_edges(&self, filter: &EdgeFilter) -> Result<Vec<Transaction>>;

    async fn list_nodes(&self) -> Result<Vec<GraphNode>>;

    /// One entry per (source, target) pair, ids numbered from 1 in result order.
    async fn aggregate_edges(&self) -> Result<Vec<GraphEdge>>;

    /// Incoming plus outgoing edges; 0 for an unknown node.
    async fn count_edges_for_node(&self, business_id: &str) -> Result<u64>;

    /// Delete every edge, then every node.
    async fn clear_all(&self) -> Result<()>;
}
