//! # Storage Configuration
//!
//! Chooses the backend and its settings once, at process start.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`SHOPLIST_*`, legacy `USE_MOCK_DATA`)
//! 2. Defaults (this file)
//!
//! ## Environment Variables
//! - `SHOPLIST_STORAGE`: `memory` or `sqlite`
//! - `USE_MOCK_DATA`: `false` selects `sqlite` when `SHOPLIST_STORAGE` is unset
//! - `SHOPLIST_DATABASE_PATH`: SQLite file (default `./shoplist.db`)
//! - `SHOPLIST_AWID`: workspace id stamped on every record
//! - `SHOPLIST_MAX_CONNECTIONS`: SQLite pool size
//! - `SHOPLIST_SEED`: `true`/`false`, seed demo data on open (memory only)

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shoplist_core::DEFAULT_AWID;

/// Path marker for a private in-memory SQLite database.
pub const SQLITE_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Backend
// =============================================================================

/// The storage backend a process runs on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Process-local maps. Default, used by tests and demos.
    #[default]
    Memory,
    /// Durable SQLite database.
    Sqlite,
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mock" => Ok(Backend::Memory),
            "sqlite" | "durable" => Ok(Backend::Sqlite),
            _ => Err(ConfigError::InvalidValue("SHOPLIST_STORAGE".to_string())),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Memory => f.write_str("memory"),
            Backend::Sqlite => f.write_str("sqlite"),
        }
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Storage configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StorageConfig::sqlite("/path/to/shoplist.db")
///     .max_connections(5)
///     .awid("shoppinglist-main");
/// let storage = Storage::open(config).await?;
/// ```
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Which backend to open.
    pub backend: Backend,

    /// Workspace id stamped on, and filtered by, every record.
    pub awid: String,

    /// Seed the demo list on open. Honoured by the memory backend.
    pub seed_demo_data: bool,

    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            backend: Backend::Memory,
            awid: DEFAULT_AWID.to_string(),
            seed_demo_data: true,
            database_path: PathBuf::from("./shoplist.db"),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }
}

impl StorageConfig {
    /// In-memory backend, seeded with demo data.
    pub fn memory() -> Self {
        StorageConfig::default()
    }

    /// SQLite backend at `path`. The file is created if missing.
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        StorageConfig {
            backend: Backend::Sqlite,
            database_path: path.into(),
            seed_demo_data: false,
            ..StorageConfig::default()
        }
    }

    /// SQLite backend on a private in-memory database (for testing).
    ///
    /// Uses a single connection that never idles out, so the database
    /// lives exactly as long as the pool.
    pub fn sqlite_in_memory() -> Self {
        StorageConfig {
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            ..StorageConfig::sqlite(SQLITE_MEMORY_PATH)
        }
    }

    /// Returns true when the SQLite path denotes an in-memory database.
    pub fn is_sqlite_in_memory(&self) -> bool {
        self.database_path.as_os_str() == SQLITE_MEMORY_PATH
    }

    pub fn awid(mut self, awid: impl Into<String>) -> Self {
        self.awid = awid.into();
        self
    }

    pub fn seed_demo_data(mut self, seed: bool) -> Self {
        self.seed_demo_data = seed;
        self
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        StorageConfig::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup("SHOPLIST_STORAGE") {
            Some(value) => value.parse()?,
            // Mock data stays the default unless explicitly turned off.
            None => match lookup("USE_MOCK_DATA").as_deref().map(str::trim) {
                Some("false") => Backend::Sqlite,
                _ => Backend::Memory,
            },
        };

        let mut config = match backend {
            Backend::Memory => StorageConfig::memory(),
            Backend::Sqlite => StorageConfig::sqlite(
                lookup("SHOPLIST_DATABASE_PATH").unwrap_or_else(|| "./shoplist.db".to_string()),
            ),
        };

        if let Some(awid) = lookup("SHOPLIST_AWID") {
            let awid = awid.trim();
            if awid.is_empty() {
                return Err(ConfigError::InvalidValue("SHOPLIST_AWID".to_string()));
            }
            config.awid = awid.to_string();
        }

        if let Some(max) = lookup("SHOPLIST_MAX_CONNECTIONS") {
            config.max_connections = max
                .trim()
                .parse()
                .ok()
                .filter(|n: &u32| *n > 0)
                .ok_or_else(|| ConfigError::InvalidValue("SHOPLIST_MAX_CONNECTIONS".to_string()))?;
            config.min_connections = config.min_connections.min(config.max_connections);
        }

        if let Some(seed) = lookup("SHOPLIST_SEED") {
            config.seed_demo_data = seed
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SHOPLIST_SEED".to_string()))?;
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_memory_is_default() {
        let config = StorageConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.backend, Backend::Memory);
        assert!(config.seed_demo_data);
        assert_eq!(config.awid, DEFAULT_AWID);

        let config = StorageConfig::from_lookup(lookup(&[("USE_MOCK_DATA", "true")])).unwrap();
        assert_eq!(config.backend, Backend::Memory);
    }

    #[test]
    fn test_use_mock_data_false_selects_sqlite() {
        let config = StorageConfig::from_lookup(lookup(&[
            ("USE_MOCK_DATA", "false"),
            ("SHOPLIST_DATABASE_PATH", "/tmp/lists.db"),
        ]))
        .unwrap();
        assert_eq!(config.backend, Backend::Sqlite);
        assert_eq!(config.database_path, PathBuf::from("/tmp/lists.db"));
        assert!(!config.seed_demo_data);
    }

    #[test]
    fn test_explicit_backend_wins_over_legacy_flag() {
        let config = StorageConfig::from_lookup(lookup(&[
            ("SHOPLIST_STORAGE", "memory"),
            ("USE_MOCK_DATA", "false"),
        ]))
        .unwrap();
        assert_eq!(config.backend, Backend::Memory);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = StorageConfig::from_lookup(lookup(&[("SHOPLIST_STORAGE", "mongo")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidValue("SHOPLIST_STORAGE".to_string()));

        let err =
            StorageConfig::from_lookup(lookup(&[("SHOPLIST_MAX_CONNECTIONS", "0")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue("SHOPLIST_MAX_CONNECTIONS".to_string())
        );

        let err = StorageConfig::from_lookup(lookup(&[("SHOPLIST_SEED", "maybe")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidValue("SHOPLIST_SEED".to_string()));
    }

    #[test]
    fn test_config_builder() {
        let config = StorageConfig::sqlite("/tmp/test.db")
            .max_connections(10)
            .min_connections(2)
            .awid("tenant-b");

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.awid, "tenant-b");
        assert!(!config.is_sqlite_in_memory());
        assert!(StorageConfig::sqlite_in_memory().is_sqlite_in_memory());
    }
}
