//! Live-update broadcast to connected clients.
//!
//! Every mutation pushes the full enriched graph, not a diff. New
//! connections get one `initialData` message first.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;
use txgraph_graph::{GraphEdge, GraphNode, Transaction};

use crate::context::Stores;
use crate::error::TxGraphResult;
use crate::graph::{get_enriched_graph, model::EnrichedGraph};

/// Messages on the push channel.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum PushMessage {
    /// Sent once per connection.
    #[serde(rename = "initialData")]
    InitialData(EnrichedGraph),
    /// Sent to everyone after each transaction.
    #[serde(rename = "graphUpdate")]
    GraphUpdate(GraphUpdate),
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GraphUpdate {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// The triggering transaction, with raw business ids.
    pub new_transaction: Transaction,
}

/// Type alias for the broadcast sender.
pub type BroadcastSender = broadcast::Sender<PushMessage>;

/// Create a new broadcast channel with default capacity.
pub fn create_broadcast_channel() -> BroadcastSender {
    let (tx, _rx) = broadcast::channel(100);
    tx
}

/// The message a client receives right after connecting.
pub async fn initial_data(stores: &Stores) -> TxGraphResult<PushMessage> {
    Ok(PushMessage::InitialData(get_enriched_graph(stores).await?))
}

/// Recompute the enriched graph and push it with `new_transaction`.
///
/// Returns the number of receivers reached. Without a hub nothing is
/// computed and 0 is returned.
pub async fn broadcast_update(
    stores: &Stores,
    hub: Option<&BroadcastSender>,
    new_transaction: &Transaction,
) -> TxGraphResult<usize> {
    let Some(hub) = hub else {
        return Ok(0);
    };

    let graph = get_enriched_graph(stores).await?;
    let message = PushMessage::GraphUpdate(GraphUpdate {
        nodes: graph.nodes,
        edges: graph.edges,
        new_transaction: new_transaction.clone(),
    });

    match hub.send(message) {
        Ok(receivers) => {
            debug!(receivers, "Broadcast graph update");
            Ok(receivers)
        }
        Err(_) => {
            debug!("Graph update not delivered: no connected clients");
            Ok(0)
        }
    }
}
