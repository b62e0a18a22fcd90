//! Transaction route handlers.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use txgraph_core::transaction;
use txgraph_graph::{model::deserialize_optional_timestamp, EdgeFilter, GraphEdge, GraphNode, Transaction};

use super::businesses::PairQuery;
use super::{non_blank, ok, ApiError, ApiResult};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateTransactionRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    pub amount: Option<f64>,
    /// ISO-8601 string or epoch milliseconds; defaults to now.
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub timestamp: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub min_amount: Option<String>,
    pub max_amount: Option<String>,
}

/// A bound that does not parse becomes NaN, which no amount satisfies.
fn parse_amount(value: Option<String>) -> Option<f64> {
    non_blank(value).map(|raw| raw.trim().parse::<f64>().unwrap_or(f64::NAN))
}

impl FilterQuery {
    pub fn into_filter(self) -> EdgeFilter {
        EdgeFilter {
            from: non_blank(self.from),
            to: non_blank(self.to),
            start_date: non_blank(self.start_date),
            end_date: non_blank(self.end_date),
            min_amount: parse_amount(self.min_amount),
            max_amount: parse_amount(self.max_amount),
        }
    }
}

pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<PairQuery>,
) -> ApiResult<Vec<Transaction>> {
    let transactions =
        transaction::list_transactions(&state.stores, non_blank(query.from), non_blank(query.to)).await?;
    Ok(ok(transactions))
}

pub async fn list_nodes(State(state): State<AppState>) -> ApiResult<Vec<GraphNode>> {
    Ok(ok(txgraph_core::graph::get_enriched_nodes(&state.stores).await?))
}

pub async fn list_edges(State(state): State<AppState>) -> ApiResult<Vec<GraphEdge>> {
    let edges = state
        .stores
        .graph
        .aggregate_edges()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(ok(edges))
}

pub async fn filter_transactions(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> ApiResult<Vec<Transaction>> {
    let filter = query.into_filter();
    Ok(ok(transaction::filter_transactions(&state.stores, &filter).await?))
}

pub async fn create_transaction(
    State(state): State<AppState>,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> ApiResult<Transaction> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let (Some(from), Some(to), Some(amount)) = (req.from, req.to, req.amount) else {
        return Err(ApiError::BadRequest("from, to and amount are required".to_string()));
    };
    let timestamp = req
        .timestamp
        .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));

    let created = transaction::create_transaction(
        &state.stores,
        Some(&state.tx),
        Transaction::new(from, to, amount, timestamp),
    )
    .await?;
    Ok(ok(created))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(min: Option<&str>, max: Option<&str>) -> FilterQuery {
        FilterQuery {
            from: Some(String::new()),
            to: None,
            start_date: Some("2025-01-01".into()),
            end_date: None,
            min_amount: min.map(String::from),
            max_amount: max.map(String::from),
        }
    }

    #[test]
    fn blank_parameters_are_unset() {
        let filter = query(Some(""), None).into_filter();
        assert_eq!(filter.from, None);
        assert_eq!(filter.min_amount, None);
        assert_eq!(filter.start_date.as_deref(), Some("2025-01-01"));
    }

    #[test]
    fn amounts_are_parsed() {
        let filter = query(Some("100"), Some(" 50.5 ")).into_filter();
        assert_eq!(filter.min_amount, Some(100.0));
        assert_eq!(filter.max_amount, Some(50.5));
    }

    #[test]
    fn unparsable_amount_matches_nothing() {
        let filter = query(Some("lots"), None).into_filter();
        assert!(filter.min_amount.is_some_and(f64::is_nan));

        let tx = Transaction::new("a", "b", 10.0, "2025-02-01");
        assert!(!filter.matches(&tx));
    }
}
