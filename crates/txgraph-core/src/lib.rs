//! txgraph Core Library
//!
//! Services over the relational and graph stores: businesses, transactions,
//! enrichment and the live-update broadcast.

pub mod business;
pub mod config;
pub mod context;
pub mod error;
pub mod graph;
pub mod notification;
pub mod transaction;

pub use config::{AppConfig, GraphBackend};
pub use context::Stores;
pub use error::{TxGraphError, TxGraphResult};
pub use graph::model::{EnrichedGraph, EnrichedTransaction};
pub use notification::{
    create_broadcast_channel, BroadcastSender, GraphUpdate, PushMessage,
};

#[cfg(test)]
pub(crate) mod testing {
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use txgraph_graph::{EdgeFilter, GraphEdge, GraphNode, GraphStore, Transaction};

    /// Graph store that fails every call.
    pub struct FailingGraph;

    #[async_trait]
    impl GraphStore for FailingGraph {
        async fn find_or_create_node(&self, _business_id: &str) -> Result<GraphNode> {
            bail!("graph store unavailable")
        }
        async fn create_edge(&self, _tx: &Transaction) -> Result<Option<Transaction>> {
            bail!("graph store unavailable")
        }
        async fn list_edges(&self, _filter: &EdgeFilter) -> Result<Vec<Transaction>> {
            bail!("graph store unavailable")
        }
        async fn list_nodes(&self) -> Result<Vec<GraphNode>> {
            bail!("graph store unavailable")
        }
        async fn aggregate_edges(&self) -> Result<Vec<GraphEdge>> {
            bail!("graph store unavailable")
        }
        async fn count_edges_for_node(&self, _business_id: &str) -> Result<u64> {
            bail!("graph store unavailable")
        }
        async fn clear_all(&self) -> Result<()> {
            bail!("graph store unavailable")
        }
    }
}
