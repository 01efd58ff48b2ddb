//! # SQLite Store
//!
//! Durable implementation of the storage contract.
//!
//! ## Document Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  shopping_lists                                                         │
//! │  seq │ id │ awid │ owner_id │ name │ members (JSON) │ is_archived │ ts  │
//! │                                                                         │
//! │  items                                                                  │
//! │  seq │ id │ awid │ list_id │ name │ quantity │ status │ created_by │ …  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomicity
//! Every mutation is a single statement. `list_lists` runs its count and
//! page queries inside one transaction so `total` matches the slice. Owner-gated updates put the owner
//! in the WHERE clause, so "not the owner" and "no such list" both match
//! zero rows and both surface as `NotFound`. Membership edits rewrite the
//! JSON array inside the UPDATE itself.
//!
//! Ids are UUID v4 strings; there is no secondary identifier.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use shoplist_core::query::fold_name;
use shoplist_core::validation::validate_quantity;
use shoplist_core::{
    CoreError, Item, ItemStatus, ListFilter, Membership, NewItem, NewShoppingList, Page,
    PageInfo, ShoppingList,
};

use super::query::{self, ITEM_COLUMNS, LIST_COLUMNS};
use super::{generate_id, ShoppingListStore};
use crate::config::StorageConfig;
use crate::error::{DbError, DbResult};
use crate::pool;

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ShoppingListRow {
    id: String,
    awid: String,
    owner_id: String,
    name: String,
    members: String,
    is_archived: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<ShoppingListRow> for ShoppingList {
    type Error = DbError;

    fn try_from(row: ShoppingListRow) -> DbResult<Self> {
        Ok(ShoppingList {
            awid: row.awid,
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            members: serde_json::from_str(&row.members)?,
            is_archived: row.is_archived,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MembershipRow {
    id: String,
    awid: String,
    members: String,
}

impl TryFrom<MembershipRow> for Membership {
    type Error = DbError;

    fn try_from(row: MembershipRow) -> DbResult<Self> {
        Ok(Membership {
            awid: row.awid,
            id: row.id,
            members: serde_json::from_str(&row.members)?,
        })
    }
}

// =============================================================================
// Store
// =============================================================================

/// SQLite-backed store.
///
/// ## Usage
/// ```rust,ignore
/// let store = SqliteStore::connect(&StorageConfig::sqlite("./shoplist.db")).await?;
/// let list = store.create_list(NewShoppingList::new("u1", "Groceries")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    awid: String,
}

impl SqliteStore {
    /// Wraps an existing pool. Migrations must already be applied.
    pub fn new(pool: SqlitePool, awid: impl Into<String>) -> Self {
        SqliteStore {
            pool,
            awid: awid.into(),
        }
    }

    /// Opens a pool for `config`, runs migrations, and wraps it.
    pub async fn connect(config: &StorageConfig) -> DbResult<Self> {
        let pool = pool::connect(config).await?;
        Ok(SqliteStore::new(pool, config.awid.as_str()))
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn awid(&self) -> &str {
        &self.awid
    }

    async fn fetch_list(&self, id: &str) -> DbResult<Option<ShoppingList>> {
        let sql = format!("SELECT {LIST_COLUMNS} FROM shopping_lists WHERE id = ? AND awid = ?");
        let row = sqlx::query_as::<_, ShoppingListRow>(&sql)
            .bind(id)
            .bind(&self.awid)
            .fetch_optional(&self.pool)
            .await?;

        row.map(ShoppingList::try_from).transpose()
    }
}

/// Maps the row an owner-gated UPDATE returned, or `NotFound` when the
/// list is missing or owned by someone else.
fn owned_list(row: Option<ShoppingListRow>, id: &str) -> DbResult<ShoppingList> {
    match row {
        Some(row) => row.try_into(),
        None => Err(DbError::not_found("ShoppingList", id)),
    }
}

#[async_trait]
impl ShoppingListStore for SqliteStore {
    async fn create_list(&self, input: NewShoppingList) -> DbResult<ShoppingList> {
        let list = ShoppingList::new(
            generate_id(),
            self.awid.as_str(),
            input.owner_id,
            input.name,
            input.members,
            Utc::now(),
        );

        debug!(id = %list.id, owner_id = %list.owner_id, "Inserting shopping list");

        let members = serde_json::to_string(&list.members)?;

        sqlx::query(
            r#"
            INSERT INTO shopping_lists (
                id, awid, owner_id, name, name_folded, members, is_archived, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&list.id)
        .bind(&list.awid)
        .bind(&list.owner_id)
        .bind(&list.name)
        .bind(fold_name(&list.name))
        .bind(members)
        .bind(list.is_archived)
        .bind(list.created_at)
        .execute(&self.pool)
        .await?;

        Ok(list)
    }

    async fn get_list(&self, id: &str) -> DbResult<Option<ShoppingList>> {
        self.fetch_list(id).await
    }

    async fn list_lists(
        &self,
        filter: &ListFilter,
        page: PageInfo,
    ) -> DbResult<Page<ShoppingList>> {
        debug!(?filter, ?page, "Listing shopping lists");

        // Count and page read one snapshot
        let mut tx = self.pool.begin().await?;

        let total: i64 = query::count_lists(&self.awid, filter)
            .build_query_scalar()
            .fetch_one(&mut *tx)
            .await?;

        let rows: Vec<ShoppingListRow> = query::select_lists_page(&self.awid, filter, page)
            .build_query_as()
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        let items = rows
            .into_iter()
            .map(ShoppingList::try_from)
            .collect::<DbResult<Vec<_>>>()?;

        debug!(count = items.len(), total, "Listing returned lists");

        Ok(Page {
            items,
            page_info: page,
            total: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn delete_list(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting shopping list");

        let result = sqlx::query("DELETE FROM shopping_lists WHERE id = ? AND awid = ?")
            .bind(id)
            .bind(&self.awid)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_member(&self, list_id: &str, member_id: &str) -> DbResult<Option<Membership>> {
        debug!(list_id = %list_id, member_id = %member_id, "Adding member");

        // Append only when absent, so repeated adds leave the array unchanged
        let row = sqlx::query_as::<_, MembershipRow>(
            r#"
            UPDATE shopping_lists
            SET members = CASE
                WHEN EXISTS (
                    SELECT 1 FROM json_each(shopping_lists.members)
                    WHERE json_each.value = ?
                ) THEN members
                ELSE json_insert(members, '$[#]', ?)
            END
            WHERE id = ? AND awid = ?
            RETURNING id, awid, members
            "#,
        )
        .bind(member_id)
        .bind(member_id)
        .bind(list_id)
        .bind(&self.awid)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Membership::try_from).transpose()
    }

    async fn remove_member(&self, list_id: &str, member_id: &str) -> DbResult<Option<Membership>> {
        debug!(list_id = %list_id, member_id = %member_id, "Removing member");

        let row = sqlx::query_as::<_, MembershipRow>(
            r#"
            UPDATE shopping_lists
            SET members = (
                SELECT json_group_array(json_each.value)
                FROM json_each(shopping_lists.members)
                WHERE json_each.value <> ?
            )
            WHERE id = ? AND awid = ?
            RETURNING id, awid, members
            "#,
        )
        .bind(member_id)
        .bind(list_id)
        .bind(&self.awid)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Membership::try_from).transpose()
    }

    async fn update_list_name(
        &self,
        id: &str,
        acting_user_id: &str,
        name: &str,
    ) -> DbResult<ShoppingList> {
        debug!(id = %id, acting_user_id = %acting_user_id, "Renaming shopping list");

        let sql = format!(
            "UPDATE shopping_lists SET name = ?, name_folded = ? \
             WHERE id = ? AND awid = ? AND owner_id = ? \
             RETURNING {LIST_COLUMNS}"
        );

        let row = sqlx::query_as::<_, ShoppingListRow>(&sql)
            .bind(name)
            .bind(fold_name(name))
            .bind(id)
            .bind(&self.awid)
            .bind(acting_user_id)
            .fetch_optional(&self.pool)
            .await?;

        owned_list(row, id)
    }

    async fn update_list_archived(
        &self,
        id: &str,
        acting_user_id: &str,
        archived: bool,
    ) -> DbResult<ShoppingList> {
        debug!(id = %id, acting_user_id = %acting_user_id, archived, "Updating archived flag");

        let sql = format!(
            "UPDATE shopping_lists SET is_archived = ? \
             WHERE id = ? AND awid = ? AND owner_id = ? \
             RETURNING {LIST_COLUMNS}"
        );

        let row = sqlx::query_as::<_, ShoppingListRow>(&sql)
            .bind(archived)
            .bind(id)
            .bind(&self.awid)
            .bind(acting_user_id)
            .fetch_optional(&self.pool)
            .await?;

        owned_list(row, id)
    }

    async fn add_item(&self, input: NewItem) -> DbResult<Item> {
        debug!(list_id = %input.list_id, name = %input.name, "Inserting item");

        validate_quantity(input.quantity).map_err(CoreError::from)?;

        let item = Item::new(generate_id(), self.awid.as_str(), input, Utc::now());

        // The parent check and the insert are one statement
        let result = sqlx::query(
            r#"
            INSERT INTO items (
                id, awid, list_id, name, quantity, status,
                created_by, completed_by, created_at, completed_at
            )
            SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
            WHERE EXISTS (
                SELECT 1 FROM shopping_lists WHERE id = ? AND awid = ?
            )
            "#,
        )
        .bind(&item.id)
        .bind(&item.awid)
        .bind(&item.list_id)
        .bind(&item.name)
        .bind(item.quantity)
        .bind(item.status)
        .bind(&item.created_by)
        .bind(&item.completed_by)
        .bind(item.created_at)
        .bind(item.completed_at)
        .bind(&item.list_id)
        .bind(&self.awid)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("ShoppingList", &item.list_id));
        }

        Ok(item)
    }

    async fn update_item(&self, id: &str, name: &str, quantity: f64) -> DbResult<Item> {
        debug!(id = %id, "Updating item");

        validate_quantity(quantity).map_err(CoreError::from)?;

        let sql = format!(
            "UPDATE items SET name = ?, quantity = ? WHERE id = ? AND awid = ? \
             RETURNING {ITEM_COLUMNS}"
        );

        sqlx::query_as::<_, Item>(&sql)
            .bind(name)
            .bind(quantity)
            .bind(id)
            .bind(&self.awid)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Item", id))
    }

    async fn delete_item(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting item");

        let result = sqlx::query("DELETE FROM items WHERE id = ? AND awid = ?")
            .bind(id)
            .bind(&self.awid)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        Ok(())
    }

    async fn set_item_completed(
        &self,
        id: &str,
        completed: bool,
        acting_user_id: &str,
    ) -> DbResult<Item> {
        debug!(id = %id, completed, acting_user_id = %acting_user_id, "Setting item completion");

        let (status, completed_by, completed_at) = if completed {
            (ItemStatus::Completed, Some(acting_user_id), Some(Utc::now()))
        } else {
            (ItemStatus::Open, None, None)
        };

        let sql = format!(
            "UPDATE items SET status = ?, completed_by = ?, completed_at = ? \
             WHERE id = ? AND awid = ? \
             RETURNING {ITEM_COLUMNS}"
        );

        sqlx::query_as::<_, Item>(&sql)
            .bind(status)
            .bind(completed_by)
            .bind(completed_at)
            .bind(id)
            .bind(&self.awid)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Item", id))
    }

    async fn list_items_by_list(&self, list_id: &str) -> DbResult<Vec<Item>> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM items \
             WHERE awid = ? AND list_id = ? \
             ORDER BY created_at ASC, seq ASC"
        );

        let items = sqlx::query_as::<_, Item>(&sql)
            .bind(&self.awid)
            .bind(list_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    async fn health_check(&self) -> bool {
        pool::health_check(&self.pool).await
    }

    async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }
}
