//! Graph sync command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use txgraph_core::{AppConfig, Stores};
use txgraph_db::DEMO_BUSINESSES;
use txgraph_graph::{run_startup_sync, sync_business_nodes};

use crate::output;

#[derive(Args)]
pub struct SyncArgs {
    /// Only recreate graph nodes for the stored businesses; nothing is deleted
    #[arg(long)]
    pub replay_only: bool,
}

pub async fn execute(args: SyncArgs, config: &AppConfig) -> Result<()> {
    let stores = Stores::from_config(config).await?;

    let result = if args.replay_only {
        println!("{}", "Replaying business nodes...".bold());
        sync_business_nodes(stores.graph.as_ref(), stores.businesses.as_ref()).await?
    } else {
        println!("{}", "Resetting graph and demo businesses...".bold());
        run_startup_sync(stores.graph.as_ref(), stores.businesses.as_ref(), DEMO_BUSINESSES).await?
    };

    output::print_sync_result(&result);
    Ok(())
}
