//! Live update follower.

use std::collections::HashMap;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use tracing::warn;
use txgraph_client::{LiveClient, LiveConfig, TransactionTable, ViewEvent};
use txgraph_core::AppConfig;

use crate::api::ApiClient;
use crate::output;

#[derive(Args)]
pub struct WatchArgs {
    /// Reprint the per-business totals after every transaction
    #[arg(long)]
    pub table: bool,
}

pub async fn execute(args: WatchArgs, config: &AppConfig) -> Result<()> {
    let api = ApiClient::new(&config.api_url);
    let mut table = load_table(&api).await?;
    let names: HashMap<String, String> = table
        .rows()
        .iter()
        .map(|row| (row.business_id.clone(), row.name.clone()))
        .collect();
    let name_of = |id: &str| names.get(id).cloned().unwrap_or_else(|| id.to_string());

    if args.table {
        output::print_transaction_table(&table, Instant::now());
    }

    let live = LiveConfig::for_api(api.base_url());
    println!("{} {}", "Watching".bold(), live.url.cyan());
    let mut client = LiveClient::spawn(live);

    loop {
        let event = tokio::select! {
            event = client.next_event() => event,
            _ = tokio::signal::ctrl_c() => {
                println!("{}", "Stopped.".dimmed());
                return Ok(());
            }
        };

        match event {
            Some(ViewEvent::Connected) => println!("{}", "Connected.".green()),
            Some(ViewEvent::InitialData { nodes, edges }) => {
                println!("  {} businesses, {} connections", nodes, edges);
            }
            Some(ViewEvent::GraphUpdate { new_transaction, new_nodes }) => {
                table.apply_transaction(&new_transaction, Instant::now());
                output::print_transaction(&new_transaction, &name_of(&new_transaction.from), &name_of(&new_transaction.to));
                if new_nodes > 0 {
                    println!("  {} new business node(s)", new_nodes.to_string().yellow());
                }
                if args.table {
                    output::print_transaction_table(&table, Instant::now());
                }
            }
            Some(ViewEvent::Tick) => {
                table.tick(Instant::now());
            }
            Some(ViewEvent::Disconnected) => println!("{}", "Disconnected, retrying...".yellow()),
            Some(ViewEvent::GaveUp) | None => bail!("Lost connection to {}", api.base_url()),
        }
    }
}

/// Businesses with their current totals.
async fn load_table(api: &ApiClient) -> Result<TransactionTable> {
    let businesses = api.list_businesses().await?;
    let ids: Vec<String> = businesses.iter().map(|b| b.business_id.clone()).collect();
    let mut table = TransactionTable::from_businesses(businesses);

    for id in ids {
        match api.transaction_count(&id).await {
            Ok(count) => table.set_count(&id, count),
            Err(e) => warn!(business_id = %id, error = %e, "Failed to load transaction count"),
        }
    }
    Ok(table)
}
