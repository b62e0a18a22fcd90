//! Process configuration read from the environment.

use std::path::PathBuf;
use std::str::FromStr;

use txgraph_graph::GraphConfig;

use crate::error::{TxGraphError, TxGraphResult};

pub const DEFAULT_DATABASE_PATH: &str = "database/txgraph.db";
pub const DEFAULT_GRAPH_URL: &str = "bolt://localhost:7687";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";

/// Which [`GraphStore`](txgraph_graph::GraphStore) implementation to run against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GraphBackend {
    /// Memgraph or Neo4j over Bolt.
    #[default]
    Bolt,
    /// In-process store; nothing survives a restart.
    Memory,
}

impl FromStr for GraphBackend {
    type Err = TxGraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bolt" | "memgraph" | "neo4j" => Ok(Self::Bolt),
            "memory" => Ok(Self::Memory),
            other => Err(TxGraphError::config(format!(
                "Unknown graph backend '{}' (expected 'bolt' or 'memory')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub graph: GraphConfig,
    pub graph_backend: GraphBackend,
    pub host: String,
    pub port: u16,
    /// Base URL of a running server, for the simulator and the watcher.
    pub api_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            graph: GraphConfig {
                uri: DEFAULT_GRAPH_URL.to_string(),
                ..GraphConfig::default()
            },
            graph_backend: GraphBackend::default(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl AppConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> TxGraphResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from `lookup`, falling back to the local
    /// defaults for every unset or blank variable.
    pub fn from_lookup<F>(lookup: F) -> TxGraphResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get("DATABASE_PATH") {
            config.database_path = PathBuf::from(path);
        }
        if let Some(url) = get("MEMGRAPH_URL") {
            config.graph.uri = url;
        }
        if let Some(user) = get("MEMGRAPH_USER") {
            config.graph.user = user;
        }
        if let Some(password) = get("MEMGRAPH_PASSWORD") {
            config.graph.password = password;
        }
        if let Some(backend) = get("GRAPH_BACKEND") {
            config.graph_backend = backend.parse()?;
        }
        if let Some(host) = get("HOST") {
            config.host = host;
        }
        if let Some(port) = get("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| TxGraphError::config(format!("Invalid PORT '{}'", port)))?;
        }
        if let Some(url) = get("TXGRAPH_API_URL") {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> TxGraphResult<AppConfig> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_path, PathBuf::from("database/txgraph.db"));
        assert_eq!(config.graph.uri, "bolt://localhost:7687");
        assert_eq!(config.graph_backend, GraphBackend::Bolt);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.api_url, "http://127.0.0.1:3000");
    }

    #[test]
    fn variables_override_defaults() {
        let config = config_from(&[
            ("DATABASE_PATH", "/tmp/biz.db"),
            ("MEMGRAPH_URL", "bolt://graph:7687"),
            ("GRAPH_BACKEND", "Memory"),
            ("PORT", "8080"),
            ("TXGRAPH_API_URL", "http://api:8080/"),
        ])
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/biz.db"));
        assert_eq!(config.graph.uri, "bolt://graph:7687");
        assert_eq!(config.graph_backend, GraphBackend::Memory);
        assert_eq!(config.port, 8080);
        assert_eq!(config.api_url, "http://api:8080");
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config_from(&[("PORT", "  "), ("DATABASE_PATH", "")]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DATABASE_PATH));
    }

    #[test]
    fn bad_values_are_config_errors() {
        assert!(matches!(config_from(&[("PORT", "eighty")]), Err(TxGraphError::Config(_))));
        assert!(matches!(config_from(&[("GRAPH_BACKEND", "redis")]), Err(TxGraphError::Config(_))));
    }
}
