//! # Storage Contract
//!
//! The operations every backend implements, with identical behavior.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation              Success                  Failure                │
//! │  ─────────────────────  ───────────────────────  ──────────────────     │
//! │  create_list            full record              -                      │
//! │  get_list               Some(record) | None      -                      │
//! │  list_lists             Page { items, total }    -                      │
//! │  delete_list            existed: bool            -                      │
//! │  add/remove_member      Some(membership) | None  -                      │
//! │  update_list_name       updated record           NotFound (+not owner)  │
//! │  update_list_archived   updated record           NotFound (+not owner)  │
//! │  add_item               full record              InvalidInput, NotFound │
//! │  update_item            updated record           InvalidInput, NotFound │
//! │  delete_item            ()                       NotFound               │
//! │  set_item_completed     updated record           NotFound               │
//! │  list_items_by_list     records, oldest first    -                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `InvalidInput` means a quantity that is not finite and positive; it is
//! checked before the record is looked up. Any other `DbError` is a backend
//! failure passed through unchanged.
//!
//! Each operation touches one record and is atomic on its own. Nothing
//! spans a list and its items: `delete_list` leaves the list's items in
//! place.

pub mod memory;
pub mod query;
pub mod sqlite;

use async_trait::async_trait;
use shoplist_core::{
    Item, ListFilter, Membership, NewItem, NewShoppingList, Page, PageInfo, ShoppingList,
};
use std::fmt::Debug;

use crate::error::DbResult;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Shopping-list and item storage.
///
/// Callers pass the acting user's id where an operation depends on it;
/// the store never authenticates it.
#[async_trait]
pub trait ShoppingListStore: Send + Sync + Debug {
    /// Creates an active list with a fresh id.
    async fn create_list(&self, input: NewShoppingList) -> DbResult<ShoppingList>;

    /// Looks a list up by id. Absence is `Ok(None)`, not an error.
    async fn get_list(&self, id: &str) -> DbResult<Option<ShoppingList>>;

    /// Filters, orders newest first, and pages the workspace's lists.
    async fn list_lists(&self, filter: &ListFilter, page: PageInfo) -> DbResult<Page<ShoppingList>>;

    /// Deletes a list. Returns whether it existed. Items are not touched.
    async fn delete_list(&self, id: &str) -> DbResult<bool>;

    /// Adds `member_id` to the list. Already a member is a no-op success.
    async fn add_member(&self, list_id: &str, member_id: &str) -> DbResult<Option<Membership>>;

    /// Removes `member_id` from the list. Not a member is a no-op success.
    async fn remove_member(&self, list_id: &str, member_id: &str) -> DbResult<Option<Membership>>;

    /// Renames a list owned by `acting_user_id`.
    async fn update_list_name(
        &self,
        id: &str,
        acting_user_id: &str,
        name: &str,
    ) -> DbResult<ShoppingList>;

    /// Archives or restores a list owned by `acting_user_id`.
    async fn update_list_archived(
        &self,
        id: &str,
        acting_user_id: &str,
        archived: bool,
    ) -> DbResult<ShoppingList>;

    /// Adds an open item under an existing list. Quantity must be finite and positive.
    async fn add_item(&self, input: NewItem) -> DbResult<Item>;

    /// Replaces an item's name and quantity. Status is untouched.
    async fn update_item(&self, id: &str, name: &str, quantity: f64) -> DbResult<Item>;

    async fn delete_item(&self, id: &str) -> DbResult<()>;

    /// Sets (not toggles) an item's completion state.
    async fn set_item_completed(
        &self,
        id: &str,
        completed: bool,
        acting_user_id: &str,
    ) -> DbResult<Item>;

    /// All items of a list, oldest first.
    async fn list_items_by_list(&self, list_id: &str) -> DbResult<Vec<Item>>;

    /// Returns true when the backend can serve requests.
    async fn health_check(&self) -> bool {
        true
    }

    /// Releases backend resources. Later operations may fail.
    async fn close(&self) {}
}

/// Generates a new record id.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
