//! # Storage Façade
//!
//! Resolves one backend at process start and exposes it behind the
//! storage contract.
//!
//! ```text
//! StorageConfig ──► Storage::open ──┬── Backend::Memory ──► MemoryStore (seeded)
//!                                   └── Backend::Sqlite ──► pool::connect ──► SqliteStore
//! ```
//!
//! There is no runtime switch: a `Storage` keeps the backend it was opened
//! with for its whole life.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use shoplist_core::{
    Item, ListFilter, Membership, NewItem, NewShoppingList, Page, PageInfo, ShoppingList,
};

use crate::config::{Backend, StorageConfig};
use crate::error::DbResult;
use crate::seed::SeedIds;
use crate::store::{MemoryStore, ShoppingListStore, SqliteStore};

/// The store callers hold.
#[derive(Debug, Clone)]
pub struct Storage {
    backend: Backend,
    store: Arc<dyn ShoppingListStore>,
    memory: Option<MemoryStore>,
}

impl Storage {
    /// Opens the backend `config` selects.
    pub async fn open(config: StorageConfig) -> DbResult<Self> {
        info!(backend = %config.backend, awid = %config.awid, "Opening storage");

        match config.backend {
            Backend::Memory => {
                let store = MemoryStore::with_awid(config.awid.as_str());
                if config.seed_demo_data {
                    store.seed().await?;
                }
                Ok(Storage::from_memory(store))
            }
            Backend::Sqlite => {
                let store = SqliteStore::connect(&config).await?;
                Ok(Storage::from_sqlite(store))
            }
        }
    }

    pub fn from_memory(store: MemoryStore) -> Self {
        Storage {
            backend: Backend::Memory,
            store: Arc::new(store.clone()),
            memory: Some(store),
        }
    }

    pub fn from_sqlite(store: SqliteStore) -> Self {
        Storage {
            backend: Backend::Sqlite,
            store: Arc::new(store),
            memory: None,
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// The underlying store as a trait object.
    pub fn store(&self) -> Arc<dyn ShoppingListStore> {
        Arc::clone(&self.store)
    }

    /// Clears and reseeds the in-memory backend.
    ///
    /// Returns `None` on the durable backend, which is never reset.
    pub async fn reset(&self) -> DbResult<Option<SeedIds>> {
        match &self.memory {
            Some(memory) => memory.reset().await.map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ShoppingListStore for Storage {
    async fn create_list(&self, input: NewShoppingList) -> DbResult<ShoppingList> {
        self.store.create_list(input).await
    }

    async fn get_list(&self, id: &str) -> DbResult<Option<ShoppingList>> {
        self.store.get_list(id).await
    }

    async fn list_lists(
        &self,
        filter: &ListFilter,
        page: PageInfo,
    ) -> DbResult<Page<ShoppingList>> {
        self.store.list_lists(filter, page).await
    }

    async fn delete_list(&self, id: &str) -> DbResult<bool> {
        self.store.delete_list(id).await
    }

    async fn add_member(&self, list_id: &str, member_id: &str) -> DbResult<Option<Membership>> {
        self.store.add_member(list_id, member_id).await
    }

    async fn remove_member(&self, list_id: &str, member_id: &str) -> DbResult<Option<Membership>> {
        self.store.remove_member(list_id, member_id).await
    }

    async fn update_list_name(
        &self,
        id: &str,
        acting_user_id: &str,
        name: &str,
    ) -> DbResult<ShoppingList> {
        self.store.update_list_name(id, acting_user_id, name).await
    }

    async fn update_list_archived(
        &self,
        id: &str,
        acting_user_id: &str,
        archived: bool,
    ) -> DbResult<ShoppingList> {
        self.store
            .update_list_archived(id, acting_user_id, archived)
            .await
    }

    async fn add_item(&self, input: NewItem) -> DbResult<Item> {
        self.store.add_item(input).await
    }

    async fn update_item(&self, id: &str, name: &str, quantity: f64) -> DbResult<Item> {
        self.store.update_item(id, name, quantity).await
    }

    async fn delete_item(&self, id: &str) -> DbResult<()> {
        self.store.delete_item(id).await
    }

    async fn set_item_completed(
        &self,
        id: &str,
        completed: bool,
        acting_user_id: &str,
    ) -> DbResult<Item> {
        self.store
            .set_item_completed(id, completed, acting_user_id)
            .await
    }

    async fn list_items_by_list(&self, list_id: &str) -> DbResult<Vec<Item>> {
        self.store.list_items_by_list(list_id).await
    }

    async fn health_check(&self) -> bool {
        self.store.health_check().await
    }

    async fn close(&self) {
        info!(backend = %self.backend, "Closing storage");
        self.store.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::DEMO_OWNER_ID;

    #[tokio::test]
    async fn test_open_memory_seeds_by_default() {
        let storage = Storage::open(StorageConfig::memory()).await.unwrap();
        assert_eq!(storage.backend(), Backend::Memory);

        let page = storage
            .list_lists(&ListFilter::new(DEMO_OWNER_ID), PageInfo::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "BBQ party");
    }

    #[tokio::test]
    async fn test_open_memory_without_seed_is_empty() {
        let config = StorageConfig::memory().seed_demo_data(false);
        let storage = Storage::open(config).await.unwrap();

        let page = storage
            .list_lists(&ListFilter::new(DEMO_OWNER_ID), PageInfo::default())
            .await
            .unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_reset_only_applies_to_memory() {
        let memory = Storage::open(StorageConfig::memory()).await.unwrap();
        memory
            .create_list(NewShoppingList::new("u1", "Extra"))
            .await
            .unwrap();

        let ids = memory.reset().await.unwrap().unwrap();
        let page = memory
            .list_lists(&ListFilter::new("u1"), PageInfo::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, ids.list_id);

        let sqlite = Storage::open(StorageConfig::sqlite_in_memory())
            .await
            .unwrap();
        assert_eq!(sqlite.backend(), Backend::Sqlite);
        assert!(sqlite.reset().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_health_check_and_close() {
        let storage = Storage::open(StorageConfig::sqlite_in_memory())
            .await
            .unwrap();
        assert!(storage.health_check().await);

        storage.close().await;
        assert!(!storage.health_check().await);
    }
}
