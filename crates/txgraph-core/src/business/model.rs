//! Business domain models.

use serde::{Deserialize, Serialize};
use txgraph_db::BusinessRow;

/// A business as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub id: i64,
    pub business_id: String,
    pub name: String,
    pub industry: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Business {
    /// Create a Business from a database row.
    pub fn from_row(row: BusinessRow) -> Self {
        Self {
            id: row.id,
            business_id: row.business_id,
            name: row.name,
            industry: row.industry,
            created_at: row.created_at,
        }
    }
}

/// Identifiers of a freshly created business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedBusiness {
    pub id: i64,
    pub business_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCount {
    pub business_id: String,
    pub transaction_count: u64,
}
