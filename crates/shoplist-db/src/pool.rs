//! # SQLite Pool Management
//!
//! Connection pool creation for the durable backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  StorageConfig::sqlite(path)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  connect(&config) ← Create pool + run migrations                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │                           │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │  (max_connections)        │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Concurrent requests each borrow a connection                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! File databases run in WAL mode: readers don't block the writer and the
//! writer doesn't block readers. In-memory databases keep SQLite's default
//! journal.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{debug, info};

use crate::config::StorageConfig;
use crate::error::{DbError, DbResult};
use crate::migrations;

/// Opens a pool for `config` and, when enabled, applies migrations.
///
/// ## What This Does
/// 1. Creates the database file if it doesn't exist
/// 2. Configures SQLite: WAL journal, NORMAL synchronous
/// 3. Creates the connection pool
/// 4. Runs migrations (if enabled)
pub async fn connect(config: &StorageConfig) -> DbResult<SqlitePool> {
    info!(
        path = %config.database_path.display(),
        "Initializing database connection"
    );

    let in_memory = config.is_sqlite_in_memory();

    let connect_options = if in_memory {
        // Each parse of ":memory:" yields a uniquely named shared-cache database
        SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
    } else {
        SqliteConnectOptions::new()
            .filename(&config.database_path)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true)
    };

    debug!(in_memory, "Connection options configured");

    let mut pool_options = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout);

    pool_options = if in_memory {
        // Closing the last connection would drop the database
        pool_options.idle_timeout(None).max_lifetime(None)
    } else {
        pool_options.idle_timeout(Some(config.idle_timeout))
    };

    let pool = pool_options
        .connect_with(connect_options)
        .await
        .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

    info!(
        max_connections = config.max_connections,
        "Database pool created"
    );

    if config.run_migrations {
        migrations::run_migrations(&pool).await?;
    }

    Ok(pool)
}

/// Checks if the database can execute queries.
pub async fn health_check(pool: &SqlitePool) -> bool {
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}
