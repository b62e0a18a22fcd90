//! Centralized error types for txgraph.

use thiserror::Error;

/// Main error type for txgraph operations.
#[derive(Error, Debug)]
pub enum TxGraphError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Business not found: {0}")]
    BusinessNotFound(String),

    /// One or both transaction endpoints have no graph node.
    #[error("Transaction creation failed: could not find businesses '{from}' and '{to}'")]
    EndpointNotFound { from: String, to: String },

    #[error("Database error: {0}")]
    Database(#[from] txgraph_db::DbError),

    #[error(transparent)]
    Graph(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for txgraph operations.
pub type TxGraphResult<T> = Result<T, TxGraphError>;

impl TxGraphError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
