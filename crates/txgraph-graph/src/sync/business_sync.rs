//! Business node replay: one `Business` node per relational row.

use anyhow::{Context, Result};
use tracing::{debug, error, info};

use txgraph_db::BusinessStore;

use super::SyncResult;
use crate::store::GraphStore;

/// Find-or-create a graph node for every relational business.
///
/// A failure on one node is logged and counted; the loop keeps going. Only a
/// failure to read the relational store aborts.
pub async fn sync_business_nodes(graph: &dyn GraphStore, businesses: &dyn BusinessStore) -> Result<SyncResult> {
    let rows = businesses
        .list_all()
        .await
        .context("Failed to list businesses for graph sync")?;
    info!(count = rows.len(), "Syncing businesses to graph store");

    let mut result = SyncResult::default();
    for row in &rows {
        match graph.find_or_create_node(&row.business_id).await {
            Ok(_) => {
                result.nodes_synced += 1;
                debug!(business_id = %row.business_id, name = %row.name, "Synced business node");
            }
            Err(e) => {
                result.nodes_failed += 1;
                error!(business_id = %row.business_id, error = %e, "Failed to create business node");
            }
        }
    }
    Ok(result)
}
