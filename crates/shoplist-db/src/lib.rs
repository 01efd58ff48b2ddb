//! # shoplist-db: Storage Layer for Shoplist
//!
//! One storage contract for shopping lists and their items, with two
//! interchangeable backends.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shoplist Data Flow                               │
//! │                                                                         │
//! │  Route handler (validated input, acting user id)                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   shoplist-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Storage     │    │    Stores     │    │  Migrations  │  │   │
//! │  │   │ (storage.rs)  │    │  (store/*)    │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ backend chosen│───►│ MemoryStore   │    │ 001_initial  │  │   │
//! │  │   │ at startup    │    │ SqliteStore   │    │ _schema.sql  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Process memory  or  SQLite database file                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The `ShoppingListStore` contract and both backends
//! - [`storage`] - Backend selection and the façade callers hold
//! - [`config`] - `StorageConfig`, from builders or the environment
//! - [`pool`] - SQLite connection pool creation
//! - [`migrations`] - Embedded database migrations
//! - [`seed`] - Demo data
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shoplist_db::{ShoppingListStore, Storage, StorageConfig};
//! use shoplist_core::{ListFilter, NewShoppingList, PageInfo};
//!
//! let storage = Storage::open(StorageConfig::from_env()?).await?;
//!
//! let list = storage.create_list(NewShoppingList::new("u1", "Groceries")).await?;
//! let page = storage.list_lists(&ListFilter::new("u1"), PageInfo::default()).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod seed;
pub mod storage;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{Backend, ConfigError, StorageConfig};
pub use error::{DbError, DbResult};
pub use seed::SeedIds;
pub use storage::Storage;
pub use store::{MemoryStore, ShoppingListStore, SqliteStore};
