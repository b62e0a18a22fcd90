//! Per-business transaction counts with row highlighting.

use std::time::Instant;

use txgraph_core::business::model::Business;
use txgraph_graph::Transaction;

use crate::highlight::HighlightTracker;

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub business_id: String,
    pub name: String,
    pub industry: String,
    pub total_transactions: u64,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionTable {
    rows: Vec<TableRow>,
    highlights: HighlightTracker,
}

impl TransactionTable {
    pub fn from_businesses(businesses: Vec<Business>) -> Self {
        let rows = businesses
            .into_iter()
            .map(|b| TableRow {
                business_id: b.business_id,
                name: b.name,
                industry: b.industry,
                total_transactions: 0,
            })
            .collect();
        Self {
            rows,
            highlights: HighlightTracker::default(),
        }
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn set_count(&mut self, business_id: &str, count: u64) {
        if let Some(row) = self.rows.iter_mut().find(|r| r.business_id == business_id) {
            row.total_transactions = count;
        }
    }

    /// Count `tx` against both endpoints and light up the sender's row.
    ///
    /// Returns false when neither endpoint is in the table.
    pub fn apply_transaction(&mut self, tx: &Transaction, now: Instant) -> bool {
        let mut touched = false;
        for row in self.rows.iter_mut() {
            if row.business_id == tx.from || row.business_id == tx.to {
                row.total_transactions += 1;
                touched = true;
            }
        }
        if self.rows.iter().any(|r| r.business_id == tx.from) {
            self.highlights.mark_at(tx.from.clone(), now, true);
        }
        touched
    }

    pub fn is_highlighted(&self, business_id: &str, now: Instant) -> bool {
        self.highlights.progress_at(business_id, now).is_some()
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        self.highlights.prune_at(now);
        self.highlights.has_entries()
    }
}
