//! Graph store CLI commands.

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use txgraph_core::{AppConfig, GraphBackend};
use txgraph_graph::{schema, GraphClient};

use crate::output;

#[derive(Subcommand)]
pub enum GraphCommands {
    /// Show node and transaction counts
    Status,

    /// Create the business_id uniqueness constraint
    Schema,
}

pub async fn execute(cmd: GraphCommands, config: &AppConfig) -> Result<()> {
    if config.graph_backend == GraphBackend::Memory {
        bail!("The in-memory graph backend lives inside `txgraph serve`; use --graph-backend bolt");
    }

    let client = GraphClient::connect(&config.graph).await?;

    match cmd {
        GraphCommands::Status => {
            let counts = client.get_counts().await?;
            output::print_graph_counts(&config.graph.uri, &counts);
        }
        GraphCommands::Schema => {
            if schema::initialize_schema(&client).await {
                println!("{}", "Constraint in place.".green());
            } else {
                println!("{}", "Server accepted no constraint statement.".yellow());
            }
        }
    }
    Ok(())
}
