//! Route handlers and the JSON envelope they share.

pub mod businesses;
pub mod transactions;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::error;
use txgraph_core::TxGraphError;

/// `{ "success": true, "data": ... }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { success: true, data })
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Error rendered as `{ "success": false, "error": ... }`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<TxGraphError> for ApiError {
    fn from(err: TxGraphError) -> Self {
        match err {
            TxGraphError::ValidationError(msg) => ApiError::BadRequest(msg),
            e @ (TxGraphError::BusinessNotFound(_) | TxGraphError::EndpointNotFound { .. }) => {
                ApiError::NotFound(e.to_string())
            }
            e => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => {
                error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        (status, Json(json!({ "success": false, "error": message }))).into_response()
    }
}

/// Query values that are absent or blank are treated the same.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
