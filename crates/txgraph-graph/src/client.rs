//! Bolt connection client for Memgraph / Neo4j.

use anyhow::{Context, Result};
use neo4rs::{ConfigBuilder, Graph, Query};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Configuration for connecting to the graph store.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    /// Database name; Memgraph ignores it, Neo4j defaults to `neo4j`.
    pub db: Option<String>,
    pub max_connections: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: String::new(),
            password: String::new(),
            db: None,
            max_connections: 8,
        }
    }
}

/// Client for graph store operations.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Build the connection pool without touching the server.
    ///
    /// neo4rs creates its pool lazily, so an unreachable server only shows up
    /// on the first query.
    pub async fn new(config: &GraphConfig) -> Result<Self> {
        let mut builder = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str())
            .max_connections(config.max_connections)
            .fetch_size(200);
        if let Some(db) = &config.db {
            builder = builder.db(db.as_str());
        }
        let neo4j_config = builder.build().context("Failed to build graph store config")?;

        let graph = Graph::connect(neo4j_config)
            .await
            .context("Failed to create graph store connection pool")?;

        Ok(Self { graph })
    }

    /// Build the pool and ping the server with `RETURN 1`.
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        let client = Self::new(config).await?;
        client
            .graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .with_context(|| format!("Graph store at {} is not responding to queries", config.uri))?;
        Ok(client)
    }

    /// Execute a Cypher query that returns no results.
    pub async fn execute(&self, query: Query) -> Result<()> {
        self.graph.run(query).await.context("Graph query execution failed")?;
        Ok(())
    }

    /// Execute a Cypher query and return results as rows.
    pub async fn query(&self, query: Query) -> Result<Vec<neo4rs::Row>> {
        let mut result = self.graph.execute(query).await.context("Graph query failed")?;

        let mut rows = Vec::new();
        while let Some(row) = result.next().await.context("Failed to read graph query result")? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Execute a Cypher query and return a single scalar value.
    pub async fn query_scalar<T: DeserializeOwned>(&self, query: Query, field: &str) -> Result<Option<T>> {
        let rows = self.query(query).await?;
        if let Some(row) = rows.into_iter().next() {
            let val: T = row
                .get(field)
                .map_err(|e| anyhow::anyhow!("Failed to get field '{}': {:?}", field, e))?;
            Ok(Some(val))
        } else {
            Ok(None)
        }
    }

    /// Node and relationship counts for status display.
    pub async fn get_counts(&self) -> Result<GraphCounts> {
        let node_query = Query::new("MATCH (n) RETURN count(n) as count".to_string());
        let rel_query = Query::new("MATCH ()-[r]->() RETURN count(r) as count".to_string());

        let node_count: i64 = self.query_scalar(node_query, "count").await?.unwrap_or(0);
        let rel_count: i64 = self.query_scalar(rel_query, "count").await?.unwrap_or(0);

        Ok(GraphCounts {
            nodes: node_count as usize,
            relationships: rel_count as usize,
        })
    }
}

/// Node and relationship counts.
#[derive(Debug, Clone)]
pub struct GraphCounts {
    pub nodes: usize,
    pub relationships: usize,
}
