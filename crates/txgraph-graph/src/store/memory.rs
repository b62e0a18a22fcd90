//! In-process graph store.

use std::collections::{BTreeMap, HashSet};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::error;

use super::GraphStore;
use crate::model::{EdgeFilter, GraphEdge, GraphNode, Transaction};

#[derive(Default)]
struct Inner {
    nodes: Vec<String>,
    node_set: HashSet<String>,
    edges: Vec<Transaction>,
}

/// [`GraphStore`] held in memory, with the same semantics as the Bolt store.
///
/// Selected with `GRAPH_BACKEND=memory`; contents are lost on exit.
#[derive(Default)]
pub struct MemoryGraphStore {
    inner: RwLock<Inner>,
}

impl MemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn node_count(&self) -> usize {
        self.inner.read().await.nodes.len()
    }

    pub async fn edge_count(&self) -> usize {
        self.inner.read().await.edges.len()
    }
}

#[async_trait]
impl GraphStore for MemoryGraphStore {
    async fn find_or_create_node(&self, business_id: &str) -> Result<GraphNode> {
        let mut inner = self.inner.write().await;
        if inner.node_set.insert(business_id.to_string()) {
            inner.nodes.push(business_id.to_string());
        }
        Ok(GraphNode::new(business_id))
    }

    async fn create_edge(&self, tx: &Transaction) -> Result<Option<Transaction>> {
        let mut inner = self.inner.write().await;
        if !inner.node_set.contains(&tx.from) || !inner.node_set.contains(&tx.to) {
            error!(
                from = %tx.from,
                to = %tx.to,
                "Transaction creation failed: could not find businesses"
            );
            return Ok(None);
        }
        inner.edges.push(tx.clone());
        Ok(Some(tx.clone()))
    }

    async fn list_edges(&self, filter: &EdgeFilter) -> Result<Vec<Transaction>> {
        let inner = self.inner.read().await;
        let mut edges: Vec<Transaction> = inner.edges.iter().filter(|t| filter.matches(t)).cloned().collect();
        // Stable sort keeps insertion order among equal timestamps.
        edges.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(edges)
    }

    async fn list_nodes(&self) -> Result<Vec<GraphNode>> {
        let inner = self.inner.read().await;
        Ok(inner.nodes.iter().map(|id| GraphNode::new(id.as_str())).collect())
    }

    async fn aggregate_edges(&self) -> Result<Vec<GraphEdge>> {
        let inner = self.inner.read().await;
        let mut groups: BTreeMap<(&str, &str), (u64, f64)> = BTreeMap::new();
        for tx in &inner.edges {
            let entry = groups.entry((tx.from.as_str(), tx.to.as_str())).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += tx.amount;
        }

        Ok(groups
            .into_iter()
            .enumerate()
            .map(|(index, ((source, target), (count, amount)))| GraphEdge {
                id: index as u64 + 1,
                source: source.to_string(),
                target: target.to_string(),
                transaction_count: count,
                transaction_amount: amount,
            })
            .collect())
    }

    async fn count_edges_for_node(&self, business_id: &str) -> Result<u64> {
        let inner = self.inner.read().await;
        let outgoing = inner.edges.iter().filter(|t| t.from == business_id).count();
        let incoming = inner.edges.iter().filter(|t| t.to == business_id).count();
        Ok((outgoing + incoming) as u64)
    }

    async fn clear_all(&self) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.edges.clear();
        inner.nodes.clear();
        inner.node_set.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with(ids: &[&str]) -> MemoryGraphStore {
        let store = MemoryGraphStore::new();
        for id in ids {
            store.find_or_create_node(id).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn find_or_create_is_idempotent() {
        let store = store_with(&["a", "a", "b"]).await;
        assert_eq!(store.node_count().await, 2);
        let ids: Vec<String> = store.list_nodes().await.unwrap().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn created_edge_is_listed_and_counted() {
        let store = store_with(&["a", "b"]).await;
        let before = store.count_edges_for_node("a").await.unwrap();

        let created = store
            .create_edge(&Transaction::new("a", "b", 500.0, "2025-05-01T00:00:00Z"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.amount, 500.0);

        let listed = store
            .list_edges(&EdgeFilter::between(Some("a".into()), None))
            .await
            .unwrap();
        assert_eq!(listed, vec![created]);
        assert_eq!(store.count_edges_for_node("a").await.unwrap(), before + 1);
        assert_eq!(store.count_edges_for_node("b").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn missing_endpoint_creates_nothing() {
        let store = store_with(&["a"]).await;
        let result = store
            .create_edge(&Transaction::new("a", "ghost", 1.0, "1"))
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(store.edge_count().await, 0);
        assert_eq!(store.node_count().await, 1, "no orphan node is created");
    }

    #[tokio::test]
    async fn count_for_unknown_node_is_zero() {
        let store = MemoryGraphStore::new();
        assert_eq!(store.count_edges_for_node("nobody").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn aggregates_one_entry_per_pair() {
        let store = store_with(&["a", "b", "c"]).await;
        for (amount, ts) in [(10.0, "1"), (20.0, "2"), (30.0, "3")] {
            store.create_edge(&Transaction::new("a", "b", amount, ts)).await.unwrap();
        }
        store.create_edge(&Transaction::new("b", "a", 5.0, "4")).await.unwrap();
        store.create_edge(&Transaction::new("a", "c", 7.0, "5")).await.unwrap();

        let edges = store.aggregate_edges().await.unwrap();
        assert_eq!(edges.len(), 3);

        let ab: Vec<&GraphEdge> = edges.iter().filter(|e| e.source == "a" && e.target == "b").collect();
        assert_eq!(ab.len(), 1);
        assert_eq!(ab[0].transaction_count, 3);
        assert_eq!(ab[0].transaction_amount, 60.0);

        let ids: Vec<u64> = edges.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn list_is_most_recent_first() {
        let store = store_with(&["a", "b"]).await;
        for ts in ["2025-01-02", "2025-01-03", "2025-01-01"] {
            store.create_edge(&Transaction::new("a", "b", 1.0, ts)).await.unwrap();
        }
        let stamps: Vec<String> = store
            .list_edges(&EdgeFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.timestamp)
            .collect();
        assert_eq!(stamps, vec!["2025-01-03", "2025-01-02", "2025-01-01"]);
    }

    #[tokio::test]
    async fn contradictory_amount_range_is_empty_not_an_error() {
        let store = store_with(&["a", "b"]).await;
        store.create_edge(&Transaction::new("a", "b", 75.0, "1")).await.unwrap();

        let filter = EdgeFilter {
            min_amount: Some(100.0),
            max_amount: Some(50.0),
            ..EdgeFilter::default()
        };
        assert!(store.list_edges(&filter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn date_range_is_inclusive() {
        let store = store_with(&["a", "b"]).await;
        for ts in ["2025-01-01", "2025-01-15", "2025-02-01"] {
            store.create_edge(&Transaction::new("a", "b", 1.0, ts)).await.unwrap();
        }
        let filter = EdgeFilter {
            start_date: Some("2025-01-01".into()),
            end_date: Some("2025-01-15".into()),
            ..EdgeFilter::default()
        };
        assert_eq!(store.list_edges(&filter).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let store = store_with(&["a", "b"]).await;
        store.create_edge(&Transaction::new("a", "b", 1.0, "1")).await.unwrap();
        store.clear_all().await.unwrap();
        assert_eq!(store.node_count().await, 0);
        assert_eq!(store.edge_count().await, 0);
        assert!(store.create_edge(&Transaction::new("a", "b", 1.0, "2")).await.unwrap().is_none());
    }
}
