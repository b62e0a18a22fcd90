//! Web server command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tracing::{error, info};
use txgraph_core::{AppConfig, GraphBackend, Stores};
use txgraph_db::DEMO_BUSINESSES;
use txgraph_graph::run_startup_sync;
use txgraph_web::state::AppState;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on [env: PORT]
    #[arg(long)]
    pub port: Option<u16>,

    /// Host to bind to [env: HOST]
    #[arg(long)]
    pub host: Option<String>,

    /// Also write logs to this file
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Keep existing data instead of wiping and reseeding at startup
    #[arg(long)]
    pub no_sync: bool,
}

pub async fn execute(args: ServeArgs, mut config: AppConfig) -> Result<()> {
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let stores = Stores::from_config(&config).await?;

    if args.no_sync {
        info!("Startup sync skipped");
    } else {
        match run_startup_sync(stores.graph.as_ref(), stores.businesses.as_ref(), DEMO_BUSINESSES).await {
            Ok(result) => info!(
                seeded = result.businesses_seeded,
                synced = result.nodes_synced,
                failed = result.nodes_failed,
                "Startup sync complete"
            ),
            Err(e) => error!(error = ?e, "Startup sync failed; serving existing data"),
        }
    }

    print_banner(&config);

    txgraph_web::run_server(AppState::new(stores), &config.bind_address()).await
}

fn print_banner(config: &AppConfig) {
    let base = config.bind_address();

    println!();
    println!("  {} {}", "txgraph".cyan().bold(), "Transaction Server".bold());
    println!();
    println!("  {}        http://{}/api", "API".green(), base);
    println!("  {}  ws://{}/ws", "WebSocket".green(), base);
    println!("  {}      {}", "Graph".green(), graph_label(config));
    println!("  {}   {}", "Database".green(), config.database_path.display());
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();
}

fn graph_label(config: &AppConfig) -> String {
    match config.graph_backend {
        GraphBackend::Bolt => config.graph.uri.clone(),
        GraphBackend::Memory => "in-memory".to_string(),
    }
}
