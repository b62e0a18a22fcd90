//! CLI command definitions.

pub mod graph;
pub mod serve;
pub mod simulate;
pub mod sync;
pub mod watch;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use txgraph_core::{AppConfig, GraphBackend};

#[derive(Parser)]
#[command(name = "txgraph")]
#[command(author, version, about = "Business transaction network visualizer", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// SQLite database file [env: DATABASE_PATH]
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Bolt URL of Memgraph or Neo4j [env: MEMGRAPH_URL]
    #[arg(long, global = true, value_name = "URL")]
    pub graph_url: Option<String>,

    /// Graph backend: bolt or memory [env: GRAPH_BACKEND]
    #[arg(long, global = true, value_name = "BACKEND")]
    pub graph_backend: Option<String>,

    /// Base URL of a running server [env: TXGRAPH_API_URL]
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API and live update server
    Serve(serve::ServeArgs),

    /// Wipe the graph, reseed the demo businesses and replay their nodes
    Sync(sync::SyncArgs),

    /// Post random transactions to a running server
    Simulate(simulate::SimulateArgs),

    /// Follow live updates from a running server
    Watch(watch::WatchArgs),

    /// Graph store commands
    #[command(subcommand)]
    Graph(graph::GraphCommands),
}

impl Cli {
    /// Environment configuration with the global flags applied on top.
    pub fn config(&self) -> Result<AppConfig> {
        let config = AppConfig::from_env()?;
        self.apply_overrides(config)
    }

    fn apply_overrides(&self, mut config: AppConfig) -> Result<AppConfig> {
        if let Some(db) = &self.db {
            config.database_path = db.clone();
        }
        if let Some(url) = &self.graph_url {
            config.graph.uri = url.clone();
        }
        if let Some(backend) = &self.graph_backend {
            config.graph_backend = backend.parse::<GraphBackend>()?;
        }
        if let Some(url) = &self.api_url {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        Ok(config)
    }

    pub async fn execute(self) -> Result<()> {
        let config = self.config()?;

        match self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Sync(args) => sync::execute(args, &config).await,
            Commands::Simulate(args) => simulate::execute(args, &config).await,
            Commands::Watch(args) => watch::execute(args, &config).await,
            Commands::Graph(cmd) => graph::execute(cmd, &config).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_override_configuration() {
        let cli = Cli::try_parse_from([
            "txgraph",
            "sync",
            "--db",
            "/tmp/other.db",
            "--graph-backend",
            "memory",
            "--api-url",
            "http://10.0.0.5:3000/",
        ])
        .unwrap();

        let config = cli.apply_overrides(AppConfig::default()).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/other.db"));
        assert_eq!(config.graph_backend, GraphBackend::Memory);
        assert_eq!(config.api_url, "http://10.0.0.5:3000");
        assert_eq!(config.graph.uri, "bolt://localhost:7687");
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let cli = Cli::try_parse_from(["txgraph", "--graph-backend", "postgres", "sync"]).unwrap();
        assert!(cli.apply_overrides(AppConfig::default()).is_err());
    }

    #[test]
    fn serve_accepts_log_file() {
        let cli = Cli::try_parse_from(["txgraph", "serve", "--port", "4000", "--log", "logs/serve.log"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(4000));
                assert_eq!(args.log, Some(PathBuf::from("logs/serve.log")));
                assert!(!args.no_sync);
            }
            _ => panic!("expected serve"),
        }
    }
}
