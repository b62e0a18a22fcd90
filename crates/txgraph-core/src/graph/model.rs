//! Enriched view models.

use serde::{Deserialize, Serialize};
use txgraph_graph::{GraphEdge, GraphNode, Transaction};

/// Labelled nodes plus aggregate edges, as pushed to clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichedGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// A transaction with `from`/`to` replaced by business names where known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedTransaction {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub timestamp: String,
}

impl EnrichedTransaction {
    pub(crate) fn resolve<F>(tx: &Transaction, name_of: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            from: name_of(&tx.from).unwrap_or_else(|| tx.from.clone()),
            to: name_of(&tx.to).unwrap_or_else(|| tx.to.clone()),
            amount: tx.amount,
            timestamp: tx.timestamp.clone(),
        }
    }
}
