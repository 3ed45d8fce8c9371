//! Server configuration.
//!
//! Read from a JSON file whose path comes from `KANBAN_CONFIG` or the first
//! command-line argument. `KANBAN_PORT` and `KANBAN_BIND` override the file.

use crate::{error::Result, storage::Storage};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

pub const CONFIG_ENV: &str = "KANBAN_CONFIG";
pub const PORT_ENV: &str = "KANBAN_PORT";
pub const BIND_ENV: &str = "KANBAN_BIND";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Which backend holds the boards
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StorageConfig {
    #[default]
    Memory,
    #[cfg(feature = "file-storage")]
    File { root: PathBuf },
    #[cfg(feature = "sqlite-storage")]
    Sqlite { path: PathBuf },
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            storage: StorageConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Applies `KANBAN_PORT` / `KANBAN_BIND` style overrides from `lookup`
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(port) = lookup(PORT_ENV) {
            match port.trim().parse() {
                Ok(port) => self.port = port,
                Err(e) => log::warn!("Ignoring {}={} ({})", PORT_ENV, port, e),
            }
        }
        if let Some(bind) = lookup(BIND_ENV).filter(|b| !b.trim().is_empty()) {
            self.bind_address = bind.trim().to_string();
        }
        self
    }
}

/// Config path from `KANBAN_CONFIG`, else the given CLI argument
pub fn config_path(arg: Option<String>) -> Option<PathBuf> {
    std::env::var(CONFIG_ENV).ok().or(arg).map(PathBuf::from)
}

/// Load config from path. Returns default if the file doesn't exist or can't be parsed.
pub fn load_config(path: &Path) -> ServerConfig {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Failed to parse config {}: {}", path.display(), e);
            ServerConfig::default()
        }),
        Err(_) => {
            log::info!("No config at {}, using defaults", path.display());
            ServerConfig::default()
        }
    }
}

/// Opens and initializes the configured backend
pub async fn open_storage(config: &StorageConfig) -> Result<Arc<dyn Storage>> {
    let storage: Arc<dyn Storage> = match config {
        StorageConfig::Memory => Arc::new(crate::storage::MemoryStorage::new()),
        #[cfg(feature = "file-storage")]
        StorageConfig::File { root } => Arc::new(crate::storage::FileStorage::new(root)),
        #[cfg(feature = "sqlite-storage")]
        StorageConfig::Sqlite { path } => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            Arc::new(crate::storage::SqliteStorage::open(path)?)
        }
    };
    storage.initialize().await?;
    Ok(storage)
}
