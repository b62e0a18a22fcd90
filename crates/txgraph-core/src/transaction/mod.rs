//! Transaction management.

use tracing::{info, warn};
use txgraph_graph::{EdgeFilter, Transaction};

use crate::context::Stores;
use crate::error::{TxGraphError, TxGraphResult};
use crate::notification::{broadcast_update, BroadcastSender};

/// Raw transactions between `from` and `to` (either optional), most recent first.
pub async fn list_transactions(
    stores: &Stores,
    from: Option<String>,
    to: Option<String>,
) -> TxGraphResult<Vec<Transaction>> {
    Ok(stores.graph.list_edges(&EdgeFilter::between(from, to)).await?)
}

/// Transactions matching every set field of `filter`, most recent first.
pub async fn filter_transactions(stores: &Stores, filter: &EdgeFilter) -> TxGraphResult<Vec<Transaction>> {
    Ok(stores.graph.list_edges(filter).await?)
}

fn validate(tx: &Transaction) -> TxGraphResult<()> {
    if tx.from.trim().is_empty() || tx.to.trim().is_empty() {
        return Err(TxGraphError::validation("from and to are required"));
    }
    if !tx.amount.is_finite() || tx.amount < 0.0 {
        return Err(TxGraphError::validation("amount must be a non-negative number"));
    }
    if tx.timestamp.trim().is_empty() {
        return Err(TxGraphError::validation("timestamp is required"));
    }
    Ok(())
}

/// Record a transaction edge and push the new graph to `hub`.
///
/// Both endpoints must already have graph nodes. A failed broadcast does not
/// undo the edge; it is logged and the created transaction is still returned.
pub async fn create_transaction(
    stores: &Stores,
    hub: Option<&BroadcastSender>,
    tx: Transaction,
) -> TxGraphResult<Transaction> {
    validate(&tx)?;

    let created = stores
        .graph
        .create_edge(&tx)
        .await?
        .ok_or_else(|| TxGraphError::EndpointNotFound {
            from: tx.from.clone(),
            to: tx.to.clone(),
        })?;
    info!(from = %created.from, to = %created.to, amount = created.amount, "Created transaction");

    if let Err(e) = broadcast_update(stores, hub, &created).await {
        warn!(error = %e, "Transaction stored but graph update broadcast failed");
    }
    Ok(created)
}
