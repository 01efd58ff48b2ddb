//! # Demo Data
//!
//! The fixed data set the in-memory store starts with, written through the
//! storage contract so it works against any backend.

use shoplist_core::{NewItem, NewShoppingList};
use tracing::info;

use crate::error::DbResult;
use crate::store::ShoppingListStore;

/// Owner of the demo list.
pub const DEMO_OWNER_ID: &str = "6770b0cd123456789000001";

/// Members of the demo list besides the owner.
pub const DEMO_MEMBER_IDS: [&str; 2] = ["6770b0cd123456789000002", "6770b0cd123456789000003"];

pub const DEMO_LIST_NAME: &str = "BBQ party";
pub const DEMO_ITEM_NAME: &str = "Milk";
pub const DEMO_ITEM_QUANTITY: f64 = 2.0;

/// Ids of the records created by [`seed_demo_data`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedIds {
    pub list_id: String,
    pub item_id: String,
}

/// Creates the demo list and its single open item.
///
/// Not idempotent by itself; [`crate::MemoryStore::seed`] guards it.
pub async fn seed_demo_data<S>(store: &S) -> DbResult<SeedIds>
where
    S: ShoppingListStore + ?Sized,
{
    let members = std::iter::once(DEMO_OWNER_ID).chain(DEMO_MEMBER_IDS);

    let list = store
        .create_list(NewShoppingList::new(DEMO_OWNER_ID, DEMO_LIST_NAME).with_members(members))
        .await?;

    let item = store
        .add_item(NewItem::new(
            &list.id,
            DEMO_ITEM_NAME,
            DEMO_ITEM_QUANTITY,
            DEMO_OWNER_ID,
        ))
        .await?;

    info!(list_id = %list.id, item_id = %item.id, "Demo data created");

    Ok(SeedIds {
        list_id: list.id,
        item_id: item.id,
    })
}
