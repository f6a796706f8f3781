use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level service configuration: where to listen, and how the snapshot
/// engine behaves. Loaded from a TOML file at `CONFIG_PATH` if one exists,
/// otherwise from environment variables, otherwise built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub snapshot: SnapshotConfigToml,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfigToml {
    pub path: PathBuf,
    pub tmp_path: PathBuf,
    pub interval_secs: u64,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());

        let config = if PathBuf::from(&config_path).exists() {
            Self::from_file(&config_path)?
        } else {
            Self::from_env()
        };

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {path}"))?;
        toml::from_str(&content).context("failed to parse config file")
    }

    fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            snapshot: SnapshotConfigToml {
                path: std::env::var("SNAPSHOT_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("queue_snapshot.json")),
                tmp_path: std::env::var("SNAPSHOT_TMP_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("queue_snapshot.tmp")),
                interval_secs: std::env::var("SNAPSHOT_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            },
        }
    }
}

impl SnapshotConfigToml {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
