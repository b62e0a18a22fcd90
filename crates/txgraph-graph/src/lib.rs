//! # txgraph-graph
//!
//! Graph store integration for txgraph.
//!
//! Holds the transaction topology (`Business` nodes, `TRANSACTION` edges),
//! the access layer over Memgraph/Neo4j or an in-memory store, and the
//! startup synchronization from SQLite.

pub mod client;
pub mod model;
pub mod schema;
pub mod store;
pub mod sync;

pub use client::{GraphClient, GraphConfig, GraphCounts};
pub use model::{EdgeFilter, GraphEdge, GraphNode, Transaction};
pub use store::{GraphStore, MemoryGraphStore, Neo4jGraphStore};
pub use sync::{run_startup_sync, sync_business_nodes, SyncResult};
