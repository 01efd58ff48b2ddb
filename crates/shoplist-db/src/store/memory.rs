//! # In-Memory Store
//!
//! Map-backed implementation of the storage contract.
//!
//! ## State
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  MemoryStore (Clone = another handle to the same state)                │
//! │                                                                         │
//! │  Arc<RwLock<MemoryState>>                                               │
//! │  ├── lists: HashMap<id, Stored<ShoppingList>>                          │
//! │  ├── items: HashMap<id, Stored<Item>>                                  │
//! │  └── next_seq: insertion counter (ordering tie-break)                  │
//! │                                                                         │
//! │  Arc<Mutex<Option<SeedIds>>>   ← seed guard, Some once seeded          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Semantics
//! Mutations clone the stored record, change the clone, and put it back
//! under the write lock. Callers always receive owned copies, so nothing
//! they hold changes after the call returns, and readers never see a
//! half-applied update.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use shoplist_core::validation::validate_quantity;
use shoplist_core::{
    CoreError, Item, ListFilter, Membership, NewItem, NewShoppingList, Page, PageInfo,
    ShoppingList, DEFAULT_AWID,
};

use super::{generate_id, ShoppingListStore};
use crate::error::{DbError, DbResult};
use crate::seed::{seed_demo_data, SeedIds};

#[derive(Debug, Clone)]
struct Stored<T> {
    seq: u64,
    record: T,
}

#[derive(Debug, Default)]
struct MemoryState {
    lists: HashMap<String, Stored<ShoppingList>>,
    items: HashMap<String, Stored<Item>>,
    next_seq: u64,
}

impl MemoryState {
    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn list_mut(&mut self, id: &str) -> DbResult<&mut Stored<ShoppingList>> {
        self.lists
            .get_mut(id)
            .ok_or_else(|| DbError::not_found("ShoppingList", id))
    }

    fn item_mut(&mut self, id: &str) -> DbResult<&mut Stored<Item>> {
        self.items
            .get_mut(id)
            .ok_or_else(|| DbError::not_found("Item", id))
    }
}

/// Process-local store.
///
/// ## Usage
/// ```rust,ignore
/// let store = MemoryStore::new();
/// let ids = store.seed().await?;       // idempotent
/// let ids = store.reset().await?;      // clear + reseed, for test setup
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStore {
    awid: String,
    state: Arc<RwLock<MemoryState>>,
    seeded: Arc<Mutex<Option<SeedIds>>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new()
    }
}

impl MemoryStore {
    /// Creates an empty store in the default workspace.
    pub fn new() -> Self {
        MemoryStore::with_awid(DEFAULT_AWID)
    }

    /// Creates an empty store whose records carry `awid`.
    pub fn with_awid(awid: impl Into<String>) -> Self {
        MemoryStore {
            awid: awid.into(),
            state: Arc::new(RwLock::new(MemoryState::default())),
            seeded: Arc::new(Mutex::new(None)),
        }
    }

    pub fn awid(&self) -> &str {
        &self.awid
    }

    /// Inserts the demo data unless this store has already been seeded.
    ///
    /// Returns the ids of the seeded list and item either way.
    pub async fn seed(&self) -> DbResult<SeedIds> {
        let mut seeded = self.seeded.lock().await;
        if let Some(ids) = seeded.as_ref() {
            return Ok(ids.clone());
        }

        let ids = seed_demo_data(self).await?;
        info!(list_id = %ids.list_id, item_id = %ids.item_id, "Memory store seeded");
        *seeded = Some(ids.clone());
        Ok(ids)
    }

    /// Empties both collections and forgets the seed.
    pub async fn clear(&self) {
        let mut seeded = self.seeded.lock().await;
        let mut state = self.state.write().await;
        *state = MemoryState::default();
        *seeded = None;
    }

    /// Clears everything and seeds again. Used by test setup for isolation.
    pub async fn reset(&self) -> DbResult<SeedIds> {
        info!("Resetting memory store");
        self.clear().await;
        self.seed().await
    }

    /// Number of stored `(lists, items)`.
    pub async fn counts(&self) -> (usize, usize) {
        let state = self.state.read().await;
        (state.lists.len(), state.items.len())
    }
}

#[async_trait]
impl ShoppingListStore for MemoryStore {
    async fn create_list(&self, input: NewShoppingList) -> DbResult<ShoppingList> {
        let list = ShoppingList::new(
            generate_id(),
            self.awid.as_str(),
            input.owner_id,
            input.name,
            input.members,
            Utc::now(),
        );

        debug!(id = %list.id, owner_id = %list.owner_id, "Creating shopping list");

        let mut state = self.state.write().await;
        let seq = state.next_seq();
        state.lists.insert(
            list.id.clone(),
            Stored {
                seq,
                record: list.clone(),
            },
        );
        Ok(list)
    }

    async fn get_list(&self, id: &str) -> DbResult<Option<ShoppingList>> {
        let state = self.state.read().await;
        Ok(state.lists.get(id).map(|stored| stored.record.clone()))
    }

    async fn list_lists(
        &self,
        filter: &ListFilter,
        page: PageInfo,
    ) -> DbResult<Page<ShoppingList>> {
        debug!(?filter, ?page, "Listing shopping lists");

        let state = self.state.read().await;
        let mut matching: Vec<&Stored<ShoppingList>> = state
            .lists
            .values()
            .filter(|stored| filter.matches(&stored.record))
            .collect();

        // Newest first; later insertions win ties
        matching.sort_by(|a, b| {
            b.record
                .created_at
                .cmp(&a.record.created_at)
                .then(b.seq.cmp(&a.seq))
        });

        let sorted: Vec<ShoppingList> = matching.into_iter().map(|s| s.record.clone()).collect();
        Ok(page.paginate(sorted))
    }

    async fn delete_list(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting shopping list");

        let mut state = self.state.write().await;
        Ok(state.lists.remove(id).is_some())
    }

    async fn add_member(&self, list_id: &str, member_id: &str) -> DbResult<Option<Membership>> {
        debug!(list_id = %list_id, member_id = %member_id, "Adding member");

        let mut state = self.state.write().await;
        let Some(stored) = state.lists.get_mut(list_id) else {
            return Ok(None);
        };

        let mut updated = stored.record.clone();
        if updated.add_member(member_id) {
            stored.record = updated.clone();
        }
        Ok(Some(updated.membership()))
    }

    async fn remove_member(&self, list_id: &str, member_id: &str) -> DbResult<Option<Membership>> {
        debug!(list_id = %list_id, member_id = %member_id, "Removing member");

        let mut state = self.state.write().await;
        let Some(stored) = state.lists.get_mut(list_id) else {
            return Ok(None);
        };

        let mut updated = stored.record.clone();
        if updated.remove_member(member_id) {
            stored.record = updated.clone();
        }
        Ok(Some(updated.membership()))
    }

    async fn update_list_name(
        &self,
        id: &str,
        acting_user_id: &str,
        name: &str,
    ) -> DbResult<ShoppingList> {
        debug!(id = %id, acting_user_id = %acting_user_id, "Renaming shopping list");

        let mut state = self.state.write().await;
        let stored = state.list_mut(id)?;

        let mut updated = stored.record.clone();
        updated.rename(acting_user_id, name)?;
        stored.record = updated.clone();
        Ok(updated)
    }

    async fn update_list_archived(
        &self,
        id: &str,
        acting_user_id: &str,
        archived: bool,
    ) -> DbResult<ShoppingList> {
        debug!(id = %id, acting_user_id = %acting_user_id, archived, "Updating archived flag");

        let mut state = self.state.write().await;
        let stored = state.list_mut(id)?;

        let mut updated = stored.record.clone();
        updated.set_archived(acting_user_id, archived)?;
        stored.record = updated.clone();
        Ok(updated)
    }

    async fn add_item(&self, input: NewItem) -> DbResult<Item> {
        debug!(list_id = %input.list_id, name = %input.name, "Adding item");

        validate_quantity(input.quantity).map_err(CoreError::from)?;

        let mut state = self.state.write().await;
        if !state.lists.contains_key(&input.list_id) {
            return Err(DbError::not_found("ShoppingList", input.list_id));
        }

        let item = Item::new(generate_id(), self.awid.as_str(), input, Utc::now());
        let seq = state.next_seq();
        state.items.insert(
            item.id.clone(),
            Stored {
                seq,
                record: item.clone(),
            },
        );
        Ok(item)
    }

    async fn update_item(&self, id: &str, name: &str, quantity: f64) -> DbResult<Item> {
        debug!(id = %id, "Updating item");

        validate_quantity(quantity).map_err(CoreError::from)?;

        let mut state = self.state.write().await;
        let stored = state.item_mut(id)?;

        let mut updated = stored.record.clone();
        updated.update_details(name, quantity);
        stored.record = updated.clone();
        Ok(updated)
    }

    async fn delete_item(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting item");

        let mut state = self.state.write().await;
        state
            .items
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DbError::not_found("Item", id))
    }

    async fn set_item_completed(
        &self,
        id: &str,
        completed: bool,
        acting_user_id: &str,
    ) -> DbResult<Item> {
        debug!(id = %id, completed, acting_user_id = %acting_user_id, "Setting item completion");

        let mut state = self.state.write().await;
        let stored = state.item_mut(id)?;

        let mut updated = stored.record.clone();
        updated.set_completed(completed, acting_user_id, Utc::now());
        stored.record = updated.clone();
        Ok(updated)
    }

    async fn list_items_by_list(&self, list_id: &str) -> DbResult<Vec<Item>> {
        let state = self.state.read().await;
        let mut items: Vec<&Stored<Item>> = state
            .items
            .values()
            .filter(|stored| stored.record.list_id == list_id)
            .collect();

        // Oldest first; earlier insertions win ties
        items.sort_by(|a, b| {
            a.record
                .created_at
                .cmp(&b.record.created_at)
                .then(a.seq.cmp(&b.seq))
        });

        Ok(items.into_iter().map(|s| s.record.clone()).collect())
    }
}
