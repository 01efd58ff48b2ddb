//! # shoplist-core: Domain Model for Shoplist
//!
//! This crate holds the entity model and the list-query semantics shared by
//! every storage backend. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shoplist Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Route layer (request validation, status codes)     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ acting user id + validated input       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    shoplist-db (Storage façade)                 │   │
//! │  │          MemoryStore  ◄── one of ──►  SqliteStore               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ shoplist-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   query   │  │ validation│  │   error   │  │   │
//! │  │   │ List/Item │  │ ListFilter│  │   names   │  │ CoreError │  │   │
//! │  │   │   Role    │  │ PageInfo  │  │ quantity  │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (ShoppingList, Item) and derived values (Role, Membership)
//! - [`query`] - List filters, pagination and ordering
//! - [`validation`] - Input checks used by the route layer
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use shoplist_core::{Role, ShoppingList};
//!
//! let list = ShoppingList::new("list-1", "shoppinglist-main", "u1", "Groceries", vec![], Utc::now());
//!
//! assert_eq!(list.role_of("u1"), Role::Owner);
//! assert_eq!(list.role_of("u2"), Role::Viewer);
//! assert!(!list.is_archived);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod query;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use query::{ListFilter, Page, PageInfo};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default application workspace id.
///
/// The deployment is single-tenant, but every record carries an `awid` so
/// that stores can be scoped per workspace later without a schema change.
pub const DEFAULT_AWID: &str = "shoppinglist-main";

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Largest page size the caller-facing contract accepts.
pub const MAX_PAGE_SIZE: u32 = 200;

/// Longest accepted list or item name, in characters.
pub const MAX_NAME_LENGTH: usize = 200;
