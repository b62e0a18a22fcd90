//! Business management.

pub mod model;

use tracing::{error, info};
use uuid::Uuid;

use crate::context::Stores;
use crate::error::{TxGraphError, TxGraphResult};
use model::{Business, CreatedBusiness, TransactionCount};

/// List all businesses.
pub async fn list_businesses(stores: &Stores) -> TxGraphResult<Vec<Business>> {
    let rows = stores.businesses.list_all().await?;
    Ok(rows.into_iter().map(Business::from_row).collect())
}

/// Get a business by its `business_id`.
pub async fn get_business(stores: &Stores, business_id: &str) -> TxGraphResult<Business> {
    stores
        .businesses
        .find_by_id(business_id)
        .await?
        .map(Business::from_row)
        .ok_or_else(|| TxGraphError::BusinessNotFound(business_id.to_string()))
}

/// Create a business in the relational store, then its graph node.
///
/// The two writes are independent. If the graph write fails the relational
/// row stays in place and the error is returned.
pub async fn create_business(stores: &Stores, name: &str, industry: &str) -> TxGraphResult<CreatedBusiness> {
    let (name, industry) = (name.trim(), industry.trim());
    if name.is_empty() || industry.is_empty() {
        return Err(TxGraphError::validation("Name and industry are required"));
    }

    let business_id = Uuid::new_v4().to_string();
    let id = stores.businesses.create(&business_id, name, industry).await?;

    if let Err(e) = stores.graph.find_or_create_node(&business_id).await {
        error!(
            business_id = %business_id,
            error = %e,
            "Business stored but graph node creation failed"
        );
        return Err(e.into());
    }

    info!(business_id = %business_id, name, industry, "Created business");
    Ok(CreatedBusiness { id, business_id })
}

/// Number of transactions in or out of `business_id`; 0 for unknown ids.
pub async fn transaction_count(stores: &Stores, business_id: &str) -> TxGraphResult<TransactionCount> {
    if business_id.trim().is_empty() {
        return Err(TxGraphError::validation("Business id is required"));
    }
    let transaction_count = stores.graph.count_edges_for_node(business_id).await?;
    Ok(TransactionCount {
        business_id: business_id.to_string(),
        transaction_count,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use txgraph_graph::Transaction;

    use super::*;
    use crate::testing::FailingGraph;

    #[tokio::test]
    async fn create_writes_both_stores() {
        let stores = Stores::in_memory().unwrap();
        let created = create_business(&stores, "Acme Corp", "Manufacturing").await.unwrap();

        let business = get_business(&stores, &created.business_id).await.unwrap();
        assert_eq!(business.id, created.id);
        assert_eq!(business.name, "Acme Corp");

        let nodes = stores.graph.list_nodes().await.unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id, created.business_id);
    }

    #[tokio::test]
    async fn create_requires_name_and_industry() {
        let stores = Stores::in_memory().unwrap();
        let err = create_business(&stores, "Acme", "   ").await.unwrap_err();
        assert!(matches!(err, TxGraphError::ValidationError(_)));
        assert!(list_businesses(&stores).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn graph_failure_leaves_relational_row_behind() {
        let relational = Stores::in_memory().unwrap();
        let stores = Stores::new(relational.businesses.clone(), Arc::new(FailingGraph));

        let err = create_business(&stores, "Acme", "Retail").await.unwrap_err();
        assert!(matches!(err, TxGraphError::Graph(_)));
        assert_eq!(list_businesses(&stores).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_business_is_not_found() {
        let stores = Stores::in_memory().unwrap();
        let err = get_business(&stores, "missing").await.unwrap_err();
        assert!(matches!(err, TxGraphError::BusinessNotFound(id) if id == "missing"));
    }

    #[tokio::test]
    async fn transaction_count_covers_both_directions() {
        let stores = Stores::in_memory().unwrap();
        let a = create_business(&stores, "A", "Retail").await.unwrap().business_id;
        let b = create_business(&stores, "B", "Retail").await.unwrap().business_id;
        stores.graph.create_edge(&Transaction::new(&a, &b, 1.0, "1")).await.unwrap();
        stores.graph.create_edge(&Transaction::new(&b, &a, 2.0, "2")).await.unwrap();

        assert_eq!(transaction_count(&stores, &a).await.unwrap().transaction_count, 2);
        assert_eq!(transaction_count(&stores, "nobody").await.unwrap().transaction_count, 0);
        assert!(matches!(
            transaction_count(&stores, " ").await,
            Err(TxGraphError::ValidationError(_))
        ));
    }
}
