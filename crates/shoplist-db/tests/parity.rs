//! Backend parity: every scenario runs against both backends through the
//! `Storage` façade and must observe identical outcomes.

use shoplist_core::{ItemStatus, ListFilter, NewItem, NewShoppingList, PageInfo, Role};
use shoplist_db::seed::{DEMO_MEMBER_IDS, DEMO_OWNER_ID};
use shoplist_db::{Backend, DbError, ShoppingListStore, Storage, StorageConfig};

async fn backends() -> Vec<Storage> {
    vec![
        Storage::open(StorageConfig::memory().seed_demo_data(false))
            .await
            .unwrap(),
        Storage::open(StorageConfig::sqlite_in_memory())
            .await
            .unwrap(),
    ]
}

fn active(user: &str) -> ListFilter {
    ListFilter::new(user)
}

// =============================================================================
// Lists
// =============================================================================

#[tokio::test]
async fn create_then_get_returns_equal_record() {
    for storage in backends().await {
        let created = storage
            .create_list(NewShoppingList::new("u1", "Groceries").with_members(["u2"]))
            .await
            .unwrap();

        assert!(!created.id.is_empty());
        assert_eq!(created.owner_id, "u1");
        assert!(!created.is_archived);

        let fetched = storage.get_list(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created, "backend {}", storage.backend());
        assert_eq!(fetched.role_of("u1"), Role::Owner);
        assert_eq!(fetched.role_of("u2"), Role::Member);
        assert_eq!(fetched.role_of("u9"), Role::Viewer);
    }
}

#[tokio::test]
async fn get_unknown_list_is_none() {
    for storage in backends().await {
        assert!(storage.get_list("does-not-exist").await.unwrap().is_none());
    }
}

#[tokio::test]
async fn groceries_scenario() {
    for storage in backends().await {
        let list = storage
            .create_list(NewShoppingList::new("u1", "Groceries"))
            .await
            .unwrap();

        let page = storage
            .list_lists(&active("u1"), PageInfo::new(0, 10))
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, list.id);

        let renamed = storage
            .update_list_name(&list.id, "u1", "Weekly groceries")
            .await
            .unwrap();
        assert_eq!(renamed.name, "Weekly groceries");

        let archived = storage
            .update_list_archived(&list.id, "u1", true)
            .await
            .unwrap();
        assert!(archived.is_archived);

        let page = storage
            .list_lists(&active("u1"), PageInfo::default())
            .await
            .unwrap();
        assert_eq!(page.total, 0);

        let page = storage
            .list_lists(&active("u1").include_archived(true), PageInfo::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "Weekly groceries");
    }
}

#[tokio::test]
async fn archive_toggle_round_trips() {
    for storage in backends().await {
        let list = storage
            .create_list(NewShoppingList::new("u1", "Party"))
            .await
            .unwrap();

        storage
            .update_list_archived(&list.id, "u1", true)
            .await
            .unwrap();
        let restored = storage
            .update_list_archived(&list.id, "u1", false)
            .await
            .unwrap();

        assert_eq!(restored, list);
    }
}

#[tokio::test]
async fn non_owner_mutations_look_like_missing_lists() {
    for storage in backends().await {
        let list = storage
            .create_list(NewShoppingList::new("u1", "Mine").with_members(["u2"]))
            .await
            .unwrap();

        let err = storage
            .update_list_name(&list.id, "u2", "Hijacked")
            .await
            .unwrap_err();
        assert!(err.is_not_found(), "backend {}: {err}", storage.backend());

        let err = storage
            .update_list_archived(&list.id, "u2", true)
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = storage
            .update_list_name("missing", "u1", "Anything")
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let unchanged = storage.get_list(&list.id).await.unwrap().unwrap();
        assert_eq!(unchanged, list);
    }
}

#[tokio::test]
async fn delete_list_reports_existence_and_leaves_items() {
    for storage in backends().await {
        let list = storage
            .create_list(NewShoppingList::new("u1", "Temp"))
            .await
            .unwrap();
        let item = storage
            .add_item(NewItem::new(&list.id, "Bread", 1.0, "u1"))
            .await
            .unwrap();

        assert!(storage.delete_list(&list.id).await.unwrap());
        assert!(!storage.delete_list(&list.id).await.unwrap());
        assert!(storage.get_list(&list.id).await.unwrap().is_none());

        let orphans = storage.list_items_by_list(&list.id).await.unwrap();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].id, item.id);

        let err = storage
            .add_item(NewItem::new(&list.id, "Late", 1.0, "u1"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}

// =============================================================================
// Membership
// =============================================================================

#[tokio::test]
async fn membership_edits_are_idempotent() {
    for storage in backends().await {
        let list = storage
            .create_list(NewShoppingList::new("u1", "Shared"))
            .await
            .unwrap();

        let once = storage.add_member(&list.id, "u2").await.unwrap().unwrap();
        let twice = storage.add_member(&list.id, "u2").await.unwrap().unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice.members, vec!["u2"]);
        assert_eq!(twice.id, list.id);

        let removed = storage
            .remove_member(&list.id, "u9")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(removed.members, vec!["u2"]);

        let removed = storage
            .remove_member(&list.id, "u2")
            .await
            .unwrap()
            .unwrap();
        assert!(removed.members.is_empty());

        assert!(storage.add_member("missing", "u2").await.unwrap().is_none());
        assert!(storage
            .remove_member("missing", "u2")
            .await
            .unwrap()
            .is_none());
    }
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn listing_is_newest_first_and_pages_concatenate() {
    for storage in backends().await {
        let mut ids = Vec::new();
        for n in 0..7 {
            let list = storage
                .create_list(NewShoppingList::new("u1", format!("List {n}")))
                .await
                .unwrap();
            ids.push(list.id);
        }
        ids.reverse();

        let full = storage
            .list_lists(&active("u1"), PageInfo::new(0, 50))
            .await
            .unwrap();
        let full_ids: Vec<_> = full.items.iter().map(|l| l.id.clone()).collect();
        assert_eq!(full_ids, ids, "backend {}", storage.backend());

        let mut paged = Vec::new();
        for index in 0..3 {
            let page = storage
                .list_lists(&active("u1"), PageInfo::new(index, 3))
                .await
                .unwrap();
            assert_eq!(page.total, 7);
            paged.extend(page.items.into_iter().map(|l| l.id));
        }
        assert_eq!(paged, ids);
    }
}

#[tokio::test]
async fn page_past_the_end_is_empty_with_total() {
    for storage in backends().await {
        for name in ["A", "B"] {
            storage
                .create_list(NewShoppingList::new("u1", name))
                .await
                .unwrap();
        }

        let page = storage
            .list_lists(&active("u1"), PageInfo::new(999, 10))
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 2);
        assert_eq!(page.page_info, PageInfo::new(999, 10));
    }
}

#[tokio::test]
async fn filters_combine() {
    for storage in backends().await {
        storage
            .create_list(NewShoppingList::new("u1", "BBQ Party").with_members(["u2"]))
            .await
            .unwrap();
        storage
            .create_list(NewShoppingList::new("u2", "Office party").with_members(["u1"]))
            .await
            .unwrap();
        storage
            .create_list(NewShoppingList::new("u1", "Groceries"))
            .await
            .unwrap();

        let by_name = storage
            .list_lists(&active("u1").name("PARTY"), PageInfo::default())
            .await
            .unwrap();
        assert_eq!(by_name.total, 2, "backend {}", storage.backend());

        let owned = storage
            .list_lists(&active("u1").owned_only(true), PageInfo::default())
            .await
            .unwrap();
        assert_eq!(owned.total, 2);
        assert!(owned.items.iter().all(|l| l.owner_id == "u1"));

        let with_member = storage
            .list_lists(&active("u1").member_id("u2"), PageInfo::default())
            .await
            .unwrap();
        assert_eq!(with_member.total, 1);
        assert_eq!(with_member.items[0].name, "BBQ Party");

        let combined = storage
            .list_lists(
                &active("u1").owned_only(true).name("party"),
                PageInfo::default(),
            )
            .await
            .unwrap();
        assert_eq!(combined.total, 1);

        let blank = storage
            .list_lists(&active("u1").name("   "), PageInfo::default())
            .await
            .unwrap();
        assert_eq!(blank.total, 3);
    }
}

#[tokio::test]
async fn name_filter_folds_non_ascii_case() {
    for storage in backends().await {
        let list = storage
            .create_list(NewShoppingList::new("u1", "ČESNEK a Šunka"))
            .await
            .unwrap();
        storage
            .create_list(NewShoppingList::new("u1", "Groceries"))
            .await
            .unwrap();

        for needle in ["česnek", "ŠUNKA", "a šun"] {
            let page = storage
                .list_lists(&active("u1").name(needle), PageInfo::default())
                .await
                .unwrap();
            assert_eq!(page.total, 1, "backend {}, needle {needle}", storage.backend());
            assert_eq!(page.items[0].id, list.id);
        }

        storage
            .update_list_name(&list.id, "u1", "Řepa")
            .await
            .unwrap();
        let page = storage
            .list_lists(&active("u1").name("řEPA"), PageInfo::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1, "backend {}", storage.backend());

        let page = storage
            .list_lists(&active("u1").name("česnek"), PageInfo::default())
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }
}

// =============================================================================
// Items
// =============================================================================

#[tokio::test]
async fn invalid_quantities_are_rejected_alike() {
    for storage in backends().await {
        let list = storage
            .create_list(NewShoppingList::new("u1", "Groceries"))
            .await
            .unwrap();

        for quantity in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = storage
                .add_item(NewItem::new(&list.id, "Milk", quantity, "u1"))
                .await
                .unwrap_err();
            assert!(
                matches!(err, DbError::InvalidInput(_)),
                "backend {}, quantity {quantity}: {err}",
                storage.backend()
            );
        }
        assert!(storage.list_items_by_list(&list.id).await.unwrap().is_empty());

        let milk = storage
            .add_item(NewItem::new(&list.id, "Milk", 2.0, "u1"))
            .await
            .unwrap();
        let err = storage.update_item(&milk.id, "Milk", 0.0).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidInput(_)));

        // Checked before the lookup, so a missing item reports the quantity too
        let err = storage.update_item("missing", "X", -2.0).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidInput(_)));

        let items = storage.list_items_by_list(&list.id).await.unwrap();
        assert_eq!(items, vec![milk]);
    }
}

#[tokio::test]
async fn milk_item_lifecycle() {
    for storage in backends().await {
        let list = storage
            .create_list(NewShoppingList::new("u1", "Groceries"))
            .await
            .unwrap();

        let milk = storage
            .add_item(NewItem::new(&list.id, "Milk", 2.0, "u1"))
            .await
            .unwrap();
        assert_eq!(milk.status, ItemStatus::Open);
        assert_eq!(milk.created_by, "u1");
        assert!(milk.completed_by.is_none());

        let done = storage
            .set_item_completed(&milk.id, true, "u2")
            .await
            .unwrap();
        assert_eq!(done.status, ItemStatus::Completed);
        assert_eq!(done.completed_by.as_deref(), Some("u2"));
        assert!(done.completed_at.is_some());

        let again = storage
            .set_item_completed(&milk.id, true, "u2")
            .await
            .unwrap();
        assert!(again.is_completed());

        let reopened = storage
            .set_item_completed(&milk.id, false, "u2")
            .await
            .unwrap();
        assert_eq!(reopened, milk, "backend {}", storage.backend());

        let updated = storage.update_item(&milk.id, "Oat milk", 3.0).await.unwrap();
        assert_eq!(updated.name, "Oat milk");
        assert_eq!(updated.quantity, 3.0);
        assert_eq!(updated.status, ItemStatus::Open);

        storage.delete_item(&milk.id).await.unwrap();
        assert!(storage.list_items_by_list(&list.id).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn unknown_items_are_not_found() {
    for storage in backends().await {
        assert!(storage
            .update_item("missing", "X", 1.0)
            .await
            .unwrap_err()
            .is_not_found());
        assert!(storage.delete_item("missing").await.unwrap_err().is_not_found());
        assert!(storage
            .set_item_completed("missing", true, "u1")
            .await
            .unwrap_err()
            .is_not_found());
        assert!(storage
            .add_item(NewItem::new("missing", "X", 1.0, "u1"))
            .await
            .unwrap_err()
            .is_not_found());
        assert!(storage.list_items_by_list("missing").await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn items_are_listed_oldest_first_per_list() {
    for storage in backends().await {
        let a = storage
            .create_list(NewShoppingList::new("u1", "A"))
            .await
            .unwrap();
        let b = storage
            .create_list(NewShoppingList::new("u1", "B"))
            .await
            .unwrap();

        for name in ["Eggs", "Bread", "Apples"] {
            storage
                .add_item(NewItem::new(&a.id, name, 1.0, "u1"))
                .await
                .unwrap();
        }
        storage
            .add_item(NewItem::new(&b.id, "Charcoal", 1.0, "u1"))
            .await
            .unwrap();

        let names: Vec<_> = storage
            .list_items_by_list(&a.id)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Eggs", "Bread", "Apples"]);
    }
}

// =============================================================================
// Seed
// =============================================================================

#[tokio::test]
async fn memory_backend_starts_with_demo_list() {
    let storage = Storage::open(StorageConfig::memory()).await.unwrap();
    assert_eq!(storage.backend(), Backend::Memory);

    let page = storage
        .list_lists(&active(DEMO_OWNER_ID), PageInfo::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);

    let list = &page.items[0];
    assert_eq!(list.name, "BBQ party");
    assert_eq!(list.members.len(), 3);
    assert!(list.has_member(DEMO_OWNER_ID));
    assert!(DEMO_MEMBER_IDS.iter().all(|m| list.has_member(m)));

    let items = storage.list_items_by_list(&list.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Milk");
    assert_eq!(items[0].quantity, 2.0);
    assert_eq!(items[0].status, ItemStatus::Open);
}
