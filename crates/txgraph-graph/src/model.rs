//! Graph-side data model.

use serde::{Deserialize, Deserializer, Serialize};

/// One transaction edge between two businesses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: String,
    pub to: String,
    pub amount: f64,
    /// ISO-8601 or epoch milliseconds; integers are accepted on input and
    /// kept as their decimal string.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: String,
}

impl Transaction {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: f64, timestamp: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
            timestamp: timestamp.into(),
        }
    }

    /// Key shared with [`GraphEdge::key`] for the pair this transaction belongs to.
    pub fn edge_key(&self) -> String {
        format!("{}-{}", self.from, self.to)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Millis(i64),
    Float(f64),
}

fn timestamp_to_string(raw: RawTimestamp) -> String {
    match raw {
        RawTimestamp::Text(s) => s,
        RawTimestamp::Millis(ms) => ms.to_string(),
        RawTimestamp::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => (f as i64).to_string(),
        RawTimestamp::Float(f) => f.to_string(),
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawTimestamp::deserialize(deserializer).map(timestamp_to_string)
}

/// Deserialize an optional timestamp with the same rules as [`Transaction`].
pub fn deserialize_optional_timestamp<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawTimestamp>::deserialize(deserializer).map(|raw| raw.map(timestamp_to_string))
}

/// A business node. `label` and `industry` are only set by enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            industry: None,
        }
    }
}

/// All transactions between one ordered node pair, summarized.
///
/// `id` follows result enumeration order and is not stable between calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub id: u64,
    pub source: String,
    pub target: String,
    pub transaction_count: u64,
    pub transaction_amount: f64,
}

impl GraphEdge {
    pub fn key(&self) -> String {
        format!("{}-{}", self.source, self.target)
    }
}

/// Conjunctive filter over transaction edges. Unset fields match everything;
/// a NaN amount bound matches nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeFilter {
    pub from: Option<String>,
    pub to: Option<String>,
    /// Inclusive lower bound on the timestamp string.
    pub start_date: Option<String>,
    /// Inclusive upper bound on the timestamp string.
    pub end_date: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

impl EdgeFilter {
    pub fn between(from: Option<String>, to: Option<String>) -> Self {
        Self {
            from,
            to,
            ..Self::default()
        }
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        self.from.as_deref().map_or(true, |f| tx.from == f)
            && self.to.as_deref().map_or(true, |t| tx.to == t)
            && self.start_date.as_deref().map_or(true, |s| tx.timestamp.as_str() >= s)
            && self.end_date.as_deref().map_or(true, |e| tx.timestamp.as_str() <= e)
            && self.min_amount.map_or(true, |min| tx.amount >= min)
            && self.max_amount.map_or(true, |max| tx.amount <= max)
    }
}
