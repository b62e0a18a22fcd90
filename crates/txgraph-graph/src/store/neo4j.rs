//! Bolt-backed graph store.

use anyhow::{Context, Result};
use async_trait::async_trait;
use neo4rs::{Query, Row};
use tracing::{debug, error, info};

use super::GraphStore;
use crate::model::{EdgeFilter, GraphEdge, GraphNode, Transaction};
use crate::GraphClient;

const RETURN_TRANSACTION: &str =
    "RETURN a.business_id AS from, b.business_id AS to, t.amount AS amount, t.timestamp AS timestamp";

/// [`GraphStore`] over a [`GraphClient`].
#[derive(Clone)]
pub struct Neo4jGraphStore {
    client: GraphClient,
}

impl Neo4jGraphStore {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &GraphClient {
        &self.client
    }
}

/// Cypher predicates for the set fields of `filter`, in a fixed order.
///
/// Parameter names match the ones bound by [`bind_filter`].
pub(crate) fn filter_predicates(filter: &EdgeFilter) -> Vec<&'static str> {
    let mut predicates = Vec::new();
    if filter.from.is_some() {
        predicates.push("a.business_id = $from");
    }
    if filter.to.is_some() {
        predicates.push("b.business_id = $to");
    }
    if filter.start_date.is_some() {
        predicates.push("t.timestamp >= $start_date");
    }
    if filter.end_date.is_some() {
        predicates.push("t.timestamp <= $end_date");
    }
    if filter.min_amount.is_some() {
        predicates.push("t.amount >= $min_amount");
    }
    if filter.max_amount.is_some() {
        predicates.push("t.amount <= $max_amount");
    }
    predicates
}

pub(crate) fn list_edges_cypher(filter: &EdgeFilter) -> String {
    let predicates = filter_predicates(filter);
    let where_clause = if predicates.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", predicates.join(" AND "))
    };
    format!(
        "MATCH (a:Business)-[t:TRANSACTION]->(b:Business)
         {}
         {}
         ORDER BY t.timestamp DESC",
        where_clause, RETURN_TRANSACTION
    )
}

fn bind_filter(mut query: Query, filter: &EdgeFilter) -> Query {
    if let Some(from) = &filter.from {
        query = query.param("from", from.as_str());
    }
    if let Some(to) = &filter.to {
        query = query.param("to", to.as_str());
    }
    if let Some(start) = &filter.start_date {
        query = query.param("start_date", start.as_str());
    }
    if let Some(end) = &filter.end_date {
        query = query.param("end_date", end.as_str());
    }
    if let Some(min) = filter.min_amount {
        query = query.param("min_amount", min);
    }
    if let Some(max) = filter.max_amount {
        query = query.param("max_amount", max);
    }
    query
}

fn row_to_transaction(row: &Row) -> Result<Transaction> {
    let field = |name: &str| anyhow::anyhow!("Missing field '{}' in transaction row", name);
    Ok(Transaction {
        from: row.get("from").map_err(|_| field("from"))?,
        to: row.get("to").map_err(|_| field("to"))?,
        amount: row.get("amount").map_err(|_| field("amount"))?,
        timestamp: row.get("timestamp").map_err(|_| field("timestamp"))?,
    })
}

fn row_to_node(row: &Row) -> Result<GraphNode> {
    let id: String = row.get("id").context("Missing field 'id' in node row")?;
    Ok(GraphNode::new(id))
}

/// Aggregated edge `index` (0-based) from a `source, target, count, sum` row.
fn row_to_edge(index: usize, row: &Row) -> Result<GraphEdge> {
    let field = |name: &str| format!("Missing field '{}' in edge row {}", name, index + 1);
    let count: i64 = row.get("transactionCount").with_context(|| field("transactionCount"))?;
    Ok(GraphEdge {
        id: index as u64 + 1,
        source: row.get("source").with_context(|| field("source"))?,
        target: row.get("target").with_context(|| field("target"))?,
        transaction_count: count.max(0) as u64,
        transaction_amount: row.get("transactionAmount").with_context(|| field("transactionAmount"))?,
    })
}

#[async_trait]
impl GraphStore for Neo4jGraphStore {
    async fn find_or_create_node(&self, business_id: &str) -> Result<GraphNode> {
        let query = Query::new(
            "MERGE (b:Business {business_id: $business_id})
             RETURN b.business_id AS id"
                .to_string(),
        )
        .param("business_id", business_id);

        let id: Option<String> = self.client.query_scalar(query, "id").await?;
        debug!(business_id, "Merged business node");
        Ok(GraphNode::new(id.unwrap_or_else(|| business_id.to_string())))
    }

    async fn create_edge(&self, tx: &Transaction) -> Result<Option<Transaction>> {
        let query = Query::new(format!(
            "MATCH (a:Business {{business_id: $from}}), (b:Business {{business_id: $to}})
             CREATE (a)-[t:TRANSACTION {{amount: $amount, timestamp: $timestamp}}]->(b)
             {}",
            RETURN_TRANSACTION
        ))
        .param("from", tx.from.as_str())
        .param("to", tx.to.as_str())
        .param("amount", tx.amount)
        .param("timestamp", tx.timestamp.as_str());

        let rows = self.client.query(query).await.context("Failed to create transaction edge")?;
        match rows.first() {
            Some(row) => Ok(Some(row_to_transaction(row)?)),
            None => {
                error!(
                    from = %tx.from,
                    to = %tx.to,
                    "Transaction creation failed: could not find businesses"
                );
                Ok(None)
            }
        }
    }

    async fn list_edges(&self, filter: &EdgeFilter) -> Result<Vec<Transaction>> {
        let query = bind_filter(Query::new(list_edges_cypher(filter)), filter);
        let rows = self.client.query(query).await?;
        rows.iter().map(row_to_transaction).collect()
    }

    async fn list_nodes(&self) -> Result<Vec<GraphNode>> {
        let query = Query::new("MATCH (b:Business) RETURN b.business_id AS id".to_string());
        let rows = self.client.query(query).await.context("Failed to fetch nodes")?;
        rows.iter().map(row_to_node).collect()
    }

    async fn aggregate_edges(&self) -> Result<Vec<GraphEdge>> {
        let query = Query::new(
            "MATCH (a:Business)-[t:TRANSACTION]->(b:Business)
             RETURN a.business_id AS source,
                    b.business_id AS target,
                    count(t) AS transactionCount,
                    sum(t.amount) AS transactionAmount
             ORDER BY source, target"
                .to_string(),
        );
        let rows = self.client.query(query).await.context("Failed to fetch edges")?;
        rows.iter()
            .enumerate()
            .map(|(index, row)| row_to_edge(index, row))
            .collect()
    }

    async fn count_edges_for_node(&self, business_id: &str) -> Result<u64> {
        let query = Query::new(
            "MATCH (b:Business {business_id: $business_id})
             OPTIONAL MATCH (b)-[outgoing:TRANSACTION]->()
             OPTIONAL MATCH ()-[incoming:TRANSACTION]->(b)
             RETURN count(DISTINCT outgoing) + count(DISTINCT incoming) AS transactionCount"
                .to_string(),
        )
        .param("business_id", business_id);

        let count: Option<i64> = self.client.query_scalar(query, "transactionCount").await?;
        Ok(count.unwrap_or(0).max(0) as u64)
    }

    async fn clear_all(&self) -> Result<()> {
        self.client
            .execute(Query::new("MATCH ()-[r]->() DELETE r".to_string()))
            .await
            .context("Failed to clear relationships")?;
        info!("Cleared all graph relationships");

        self.client
            .execute(Query::new("MATCH (n) DELETE n".to_string()))
            .await
            .context("Failed to clear nodes")?;
        info!("Cleared all graph nodes");
        Ok(())
    }
}
