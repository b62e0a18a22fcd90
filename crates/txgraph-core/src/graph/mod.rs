//! Enrichment: graph results joined with relational names and industries.
//!
//! Joins are best effort. An id the relational store does not know keeps its
//! raw value (transactions) or gets no label (nodes); it never fails the call.

pub mod model;

use std::collections::HashSet;

use tracing::debug;
use txgraph_db::BusinessDetails;
use txgraph_graph::{EdgeFilter, GraphNode};

use crate::context::Stores;
use crate::error::TxGraphResult;
use model::{EnrichedGraph, EnrichedTransaction};

fn label_nodes(nodes: Vec<GraphNode>, details: &BusinessDetails) -> Vec<GraphNode> {
    nodes
        .into_iter()
        .map(|mut node| {
            node.label = details.name_map.get(&node.id).cloned();
            node.industry = details.industry_map.get(&node.id).cloned();
            node
        })
        .collect()
}

async fn details_for_nodes(stores: &Stores, nodes: &[GraphNode]) -> TxGraphResult<BusinessDetails> {
    let ids: HashSet<String> = nodes.iter().map(|n| n.id.clone()).collect();
    Ok(stores.businesses.batch_get_details(&ids).await?)
}

/// All nodes with labels plus all aggregate edges.
pub async fn get_enriched_graph(stores: &Stores) -> TxGraphResult<EnrichedGraph> {
    let (nodes, edges) = tokio::try_join!(stores.graph.list_nodes(), stores.graph.aggregate_edges())?;
    let details = details_for_nodes(stores, &nodes).await?;
    debug!(nodes = nodes.len(), edges = edges.len(), "Enriched graph");

    Ok(EnrichedGraph {
        nodes: label_nodes(nodes, &details),
        edges,
    })
}

/// All nodes with labels, without edges.
pub async fn get_enriched_nodes(stores: &Stores) -> TxGraphResult<Vec<GraphNode>> {
    let nodes = stores.graph.list_nodes().await?;
    let details = details_for_nodes(stores, &nodes).await?;
    Ok(label_nodes(nodes, &details))
}

/// Transactions between `from` and `to` (either optional) with names in
/// place of ids, most recent first.
pub async fn get_enriched_transactions(
    stores: &Stores,
    from: Option<String>,
    to: Option<String>,
) -> TxGraphResult<Vec<EnrichedTransaction>> {
    let transactions = stores.graph.list_edges(&EdgeFilter::between(from, to)).await?;

    let ids: HashSet<String> = transactions
        .iter()
        .flat_map(|t| [t.from.clone(), t.to.clone()])
        .collect();
    let details = stores.businesses.batch_get_details(&ids).await?;

    Ok(transactions
        .iter()
        .map(|t| EnrichedTransaction::resolve(t, |id| details.name_map.get(id).cloned()))
        .collect())
}

#[cfg(test)]
mod tests {
    use txgraph_graph::Transaction;

    use super::*;

    async fn seeded() -> (Stores, String, String) {
        let stores = Stores::in_memory().unwrap();
        for (id, name, industry) in [("a", "Alpha", "Retail"), ("b", "Beta", "Energy")] {
            stores.businesses.create(id, name, industry).await.unwrap();
            stores.graph.find_or_create_node(id).await.unwrap();
        }
        (stores, "a".to_string(), "b".to_string())
    }

    #[tokio::test]
    async fn graph_nodes_carry_names_and_industries() {
        let (stores, a, b) = seeded().await;
        stores.graph.create_edge(&Transaction::new(&a, &b, 10.0, "1")).await.unwrap();
        stores.graph.create_edge(&Transaction::new(&a, &b, 15.0, "2")).await.unwrap();

        let graph = get_enriched_graph(&stores).await.unwrap();
        assert_eq!(graph.nodes.len(), 2);
        let alpha = graph.nodes.iter().find(|n| n.id == a).unwrap();
        assert_eq!(alpha.label.as_deref(), Some("Alpha"));
        assert_eq!(alpha.industry.as_deref(), Some("Retail"));

        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].transaction_count, 2);
        assert_eq!(graph.edges[0].transaction_amount, 25.0);
    }

    #[tokio::test]
    async fn node_without_relational_row_has_no_label() {
        let (stores, _, _) = seeded().await;
        stores.graph.find_or_create_node("orphan").await.unwrap();

        let nodes = get_enriched_nodes(&stores).await.unwrap();
        let orphan = nodes.iter().find(|n| n.id == "orphan").unwrap();
        assert!(orphan.label.is_none());
        assert!(orphan.industry.is_none());
    }

    #[tokio::test]
    async fn empty_graph_enriches_to_empty() {
        let stores = Stores::in_memory().unwrap();
        assert_eq!(get_enriched_graph(&stores).await.unwrap(), EnrichedGraph::default());
    }

    #[tokio::test]
    async fn transactions_use_names_and_fall_back_to_ids() {
        let (stores, a, b) = seeded().await;
        stores.graph.find_or_create_node("ghost").await.unwrap();
        stores.graph.create_edge(&Transaction::new(&a, &b, 5.0, "2025-01-01")).await.unwrap();
        stores.graph.create_edge(&Transaction::new(&a, "ghost", 7.0, "2025-01-02")).await.unwrap();

        let enriched = get_enriched_transactions(&stores, Some(a.clone()), None).await.unwrap();
        assert_eq!(enriched.len(), 2);
        assert_eq!(enriched[0].from, "Alpha");
        assert_eq!(enriched[0].to, "ghost");
        assert_eq!(enriched[1].to, "Beta");

        let only_b = get_enriched_transactions(&stores, None, Some(b)).await.unwrap();
        assert_eq!(only_b.len(), 1);
        assert_eq!(only_b[0].amount, 5.0);
    }
}
