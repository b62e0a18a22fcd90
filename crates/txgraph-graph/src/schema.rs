//! Graph schema initialization.

use neo4rs::Query;
use tracing::{debug, info, warn};

use crate::GraphClient;

/// Uniqueness of `Business.business_id`, in Memgraph and Neo4j dialects.
///
/// Each server rejects the other's syntax, so one failure is expected.
const CONSTRAINT_STATEMENTS: &[&str] = &[
    "CREATE CONSTRAINT ON (b:Business) ASSERT b.business_id IS UNIQUE",
    "CREATE CONSTRAINT business_id IF NOT EXISTS FOR (b:Business) REQUIRE b.business_id IS UNIQUE",
];

/// Try to create the business uniqueness constraint.
///
/// Returns whether any dialect was accepted. Never fails: `MERGE` keeps nodes
/// unique without the constraint, it only makes lookups faster.
pub async fn initialize_schema(client: &GraphClient) -> bool {
    for statement in CONSTRAINT_STATEMENTS {
        match client.execute(Query::new(statement.to_string())).await {
            Ok(()) => {
                info!(statement, "Graph schema initialized");
                return true;
            }
            Err(e) => debug!(statement, error = %e, "Constraint statement rejected"),
        }
    }
    warn!("No constraint dialect accepted; continuing without a business_id constraint");
    false
}
