//! Business route handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use txgraph_core::business::{
    self,
    model::{Business, CreatedBusiness, TransactionCount},
};
use txgraph_core::EnrichedTransaction;

use super::{non_blank, ok, ApiError, ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateBusinessRequest {
    pub name: Option<String>,
    pub industry: Option<String>,
}

#[derive(Deserialize)]
pub struct PairQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

pub async fn list_businesses(State(state): State<AppState>) -> ApiResult<Vec<Business>> {
    Ok(ok(business::list_businesses(&state.stores).await?))
}

pub async fn get_business(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Business> {
    Ok(ok(business::get_business(&state.stores, &id).await?))
}

pub async fn create_business(
    State(state): State<AppState>,
    payload: Result<Json<CreateBusinessRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedBusiness>>), ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let created = business::create_business(
        &state.stores,
        req.name.as_deref().unwrap_or_default(),
        req.industry.as_deref().unwrap_or_default(),
    )
    .await?;
    Ok((StatusCode::CREATED, ok(created)))
}

pub async fn transaction_count(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<TransactionCount> {
    Ok(ok(business::transaction_count(&state.stores, &id).await?))
}

pub async fn enriched_transactions(
    State(state): State<AppState>,
    Query(query): Query<PairQuery>,
) -> ApiResult<Vec<EnrichedTransaction>> {
    let transactions = txgraph_core::graph::get_enriched_transactions(
        &state.stores,
        non_blank(query.from),
        non_blank(query.to),
    )
    .await?;
    Ok(ok(transactions))
}
