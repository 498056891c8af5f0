//! CLI configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable overriding the config directory
pub const HOME_ENV: &str = "CALLFORGE_HOME";

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// RPC endpoint URL
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Chain ID
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    /// Block tag or number for read calls
    #[serde(default = "default_block")]
    pub block: String,
}

fn default_rpc_url() -> String {
    "http://localhost:8545".to_string()
}

fn default_chain_id() -> u64 {
    1
}

fn default_block() -> String {
    "latest".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            chain_id: default_chain_id(),
            block: default_block(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        match std::env::var_os(HOME_ENV) {
            Some(dir) => Some(PathBuf::from(dir)),
            None => dirs::home_dir().map(|h| h.join(".callforge")),
        }
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load config from file or return default
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| {
                if path.exists() {
                    std::fs::read_to_string(&path).ok()
                } else {
                    None
                }
            })
            .and_then(|content| toml::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<(), std::io::Error> {
        let path = Self::config_path().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "Cannot determine config path")
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;

        std::fs::write(path, content)
    }
}
