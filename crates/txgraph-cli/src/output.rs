//! Terminal output formatting.

use std::time::Instant;

use colored::Colorize;
use txgraph_client::style::format_currency;
use txgraph_client::TransactionTable;
use txgraph_graph::{GraphCounts, SyncResult, Transaction};

/// Print a sync summary.
pub fn print_sync_result(result: &SyncResult) {
    println!("\n{}", "Sync complete:".green().bold());
    println!("  Businesses seeded: {}", result.businesses_seeded);
    println!("  Nodes synced:      {}", result.nodes_synced);
    if result.nodes_failed > 0 {
        println!("  Nodes failed:      {}", result.nodes_failed.to_string().red());
    }
}

pub fn print_graph_counts(uri: &str, counts: &GraphCounts) {
    println!("{}", "Graph Status".bold());
    println!("{}", "─".repeat(40));
    println!("  {:<14} {}", "Server", uri.cyan());
    println!("  {:<14} {}", "Nodes", counts.nodes);
    println!("  {:<14} {}", "Transactions", counts.relationships);
}

/// One line per live transaction.
pub fn print_transaction(tx: &Transaction, from_name: &str, to_name: &str) {
    println!(
        "  {} {} {} {}  {}",
        from_name.cyan(),
        "→".dimmed(),
        to_name.cyan(),
        format_currency(tx.amount).yellow().bold(),
        tx.timestamp.dimmed()
    );
}

/// Print the per-business totals, highlighting recent senders.
pub fn print_transaction_table(table: &TransactionTable, now: Instant) {
    let rows = table.rows();
    if rows.is_empty() {
        println!("{}", "No businesses found.".dimmed());
        return;
    }

    println!("{:<10} {:<30} {:<24} {:>8}", "ID", "Name", "Industry", "Total");
    println!("{}", "─".repeat(75));

    for row in rows {
        let line = format!(
            "{:<10} {:<30} {:<24} {:>8}",
            truncate(&row.business_id, 8),
            truncate(&row.name, 28),
            truncate(&row.industry, 22),
            row.total_transactions
        );
        if table.is_highlighted(&row.business_id, now) {
            println!("{}", line.black().on_green());
        } else {
            println!("{}", line);
        }
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
