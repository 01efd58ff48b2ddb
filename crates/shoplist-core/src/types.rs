//! # Domain Types
//!
//! Entities stored by every Shoplist backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐  1      *  ┌─────────────────────┐            │
//! │  │    ShoppingList     │◄───────────│        Item         │            │
//! │  │  ─────────────────  │  list_id   │  ─────────────────  │            │
//! │  │  id (UUID)          │            │  id (UUID)          │            │
//! │  │  owner_id (fixed)   │            │  name, quantity     │            │
//! │  │  name               │            │  status             │            │
//! │  │  members[]          │            │  created_by         │            │
//! │  │  is_archived        │            │  completed_by/_at   │            │
//! │  └─────────────────────┘            └─────────────────────┘            │
//! │                                                                         │
//! │  Derived (never stored):  Role = Owner | Member | Viewer               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! A list has exactly one owner, fixed at creation. The owner does not need
//! to appear in `members`; role derivation treats the owner as privileged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Role
// =============================================================================

/// A user's relationship to a list, derived from the list's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Created the list. May rename, archive and manage members.
    Owner,
    /// Listed in `members`. May edit items.
    Member,
    /// Anyone else. Read-only.
    Viewer,
}

impl Role {
    /// Returns true for roles allowed to add, edit and complete items.
    pub fn can_edit_items(self) -> bool {
        matches!(self, Role::Owner | Role::Member)
    }
}

// =============================================================================
// Shopping List
// =============================================================================

/// A named collection of items with one owner and a set of members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingList {
    /// Application workspace the list belongs to.
    pub awid: String,

    /// Unique identifier (UUID v4), assigned by the store.
    pub id: String,

    /// The single owner. Never changes.
    pub owner_id: String,

    /// Display name.
    pub name: String,

    /// Member user ids, in the order they were added. No duplicates.
    pub members: Vec<String>,

    /// Archived lists are hidden from default listings.
    pub is_archived: bool,

    /// When the list was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl ShoppingList {
    /// Builds a fresh, active list.
    ///
    /// Duplicate entries in `members` are dropped, keeping the first
    /// occurrence.
    pub fn new(
        id: impl Into<String>,
        awid: impl Into<String>,
        owner_id: impl Into<String>,
        name: impl Into<String>,
        members: Vec<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut list = ShoppingList {
            awid: awid.into(),
            id: id.into(),
            owner_id: owner_id.into(),
            name: name.into(),
            members: Vec::with_capacity(members.len()),
            is_archived: false,
            created_at,
        };
        for member in members {
            list.add_member(&member);
        }
        list
    }

    /// Derives the role of `user_id` on this list.
    ///
    /// ```text
    /// user_id == owner_id        → Owner
    /// user_id ∈ members          → Member
    /// otherwise                  → Viewer
    /// ```
    pub fn role_of(&self, user_id: &str) -> Role {
        if self.is_owned_by(user_id) {
            Role::Owner
        } else if self.has_member(user_id) {
            Role::Member
        } else {
            Role::Viewer
        }
    }

    #[inline]
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }

    #[inline]
    pub fn has_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m == user_id)
    }

    /// Fails with [`CoreError::NotOwner`] unless `user_id` owns the list.
    pub fn ensure_owner(&self, user_id: &str) -> CoreResult<()> {
        if self.is_owned_by(user_id) {
            Ok(())
        } else {
            Err(CoreError::NotOwner {
                list_id: self.id.clone(),
                user_id: user_id.to_string(),
            })
        }
    }

    /// Adds a member. Returns false when already present (no-op).
    pub fn add_member(&mut self, member_id: &str) -> bool {
        if self.has_member(member_id) {
            return false;
        }
        self.members.push(member_id.to_string());
        true
    }

    /// Removes a member. Returns false when not present (no-op).
    pub fn remove_member(&mut self, member_id: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m != member_id);
        self.members.len() != before
    }

    /// Renames the list on behalf of `acting_user_id`.
    pub fn rename(&mut self, acting_user_id: &str, name: impl Into<String>) -> CoreResult<()> {
        self.ensure_owner(acting_user_id)?;
        self.name = name.into();
        Ok(())
    }

    /// Archives or restores the list on behalf of `acting_user_id`.
    pub fn set_archived(&mut self, acting_user_id: &str, archived: bool) -> CoreResult<()> {
        self.ensure_owner(acting_user_id)?;
        self.is_archived = archived;
        Ok(())
    }

    /// Snapshot of the membership view of this list.
    pub fn membership(&self) -> Membership {
        Membership {
            awid: self.awid.clone(),
            id: self.id.clone(),
            members: self.members.clone(),
        }
    }
}

/// Input for creating a list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewShoppingList {
    pub owner_id: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

impl NewShoppingList {
    pub fn new(owner_id: impl Into<String>, name: impl Into<String>) -> Self {
        NewShoppingList {
            owner_id: owner_id.into(),
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn with_members<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members = members.into_iter().map(Into::into).collect();
        self
    }
}

/// Result of a membership edit: the list id and its member set after the edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub awid: String,
    pub id: String,
    pub members: Vec<String>,
}

// =============================================================================
// Item Status
// =============================================================================

/// Completion state of an item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Still to buy.
    #[default]
    Open,
    /// Bought.
    Completed,
}

impl ItemStatus {
    /// Wire name, as stored and serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Open => "open",
            ItemStatus::Completed => "completed",
        }
    }
}

// =============================================================================
// Item
// =============================================================================

/// A named, quantified, completable entry belonging to one list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Application workspace the item belongs to.
    pub awid: String,

    /// Unique identifier (UUID v4), assigned by the store.
    pub id: String,

    /// Parent list. Not re-checked after creation.
    pub list_id: String,

    pub name: String,

    /// Strictly positive amount.
    pub quantity: f64,

    pub status: ItemStatus,

    /// User who added the item.
    pub created_by: String,

    /// User who completed the item; `None` while open.
    pub completed_by: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Set together with `completed_by`.
    #[ts(as = "Option<String>")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Item {
    /// Builds a fresh, open item.
    pub fn new(
        id: impl Into<String>,
        awid: impl Into<String>,
        input: NewItem,
        created_at: DateTime<Utc>,
    ) -> Self {
        Item {
            awid: awid.into(),
            id: id.into(),
            list_id: input.list_id,
            name: input.name,
            quantity: input.quantity,
            status: ItemStatus::Open,
            created_by: input.created_by,
            completed_by: None,
            created_at,
            completed_at: None,
        }
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.status == ItemStatus::Completed
    }

    /// Replaces name and quantity. Status is untouched.
    pub fn update_details(&mut self, name: impl Into<String>, quantity: f64) {
        self.name = name.into();
        self.quantity = quantity;
    }

    /// Sets the completion state.
    ///
    /// This is a reset, not a toggle: `true` always stamps the acting user
    /// and `at`, `false` always clears both.
    pub fn set_completed(&mut self, completed: bool, acting_user_id: &str, at: DateTime<Utc>) {
        if completed {
            self.status = ItemStatus::Completed;
            self.completed_by = Some(acting_user_id.to_string());
            self.completed_at = Some(at);
        } else {
            self.status = ItemStatus::Open;
            self.completed_by = None;
            self.completed_at = None;
        }
    }
}

/// Input for adding an item to a list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub list_id: String,
    pub name: String,
    pub quantity: f64,
    /// Acting user, recorded as the item's creator.
    pub created_by: String,
}

impl NewItem {
    pub fn new(
        list_id: impl Into<String>,
        name: impl Into<String>,
        quantity: f64,
        created_by: impl Into<String>,
    ) -> Self {
        NewItem {
            list_id: list_id.into(),
            name: name.into(),
            quantity,
            created_by: created_by.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_list() -> ShoppingList {
        ShoppingList::new(
            "list-1",
            "awid",
            "u1",
            "Groceries",
            vec!["u2".to_string(), "u2".to_string(), "u3".to_string()],
            Utc::now(),
        )
    }

    #[test]
    fn test_new_list_is_active_and_deduplicates_members() {
        let list = sample_list();
        assert!(!list.is_archived);
        assert_eq!(list.members, vec!["u2", "u3"]);
    }

    #[test]
    fn test_role_derivation() {
        let list = sample_list();
        assert_eq!(list.role_of("u1"), Role::Owner);
        assert_eq!(list.role_of("u2"), Role::Member);
        assert_eq!(list.role_of("u9"), Role::Viewer);
        assert!(Role::Member.can_edit_items());
        assert!(!Role::Viewer.can_edit_items());
    }

    #[test]
    fn test_owner_in_members_is_still_owner() {
        let mut list = sample_list();
        list.add_member("u1");
        assert_eq!(list.role_of("u1"), Role::Owner);
    }

    #[test]
    fn test_membership_edits_are_idempotent() {
        let mut list = sample_list();
        assert!(list.add_member("u4"));
        assert!(!list.add_member("u4"));
        assert_eq!(list.members.len(), 3);

        assert!(!list.remove_member("nobody"));
        assert_eq!(list.members.len(), 3);
        assert!(list.remove_member("u4"));
        assert_eq!(list.members, vec!["u2", "u3"]);
    }

    #[test]
    fn test_only_owner_can_rename_or_archive() {
        let mut list = sample_list();

        let err = list.rename("u2", "Hacked").unwrap_err();
        assert!(matches!(err, CoreError::NotOwner { .. }));
        assert_eq!(list.name, "Groceries");

        let err = list.set_archived("u2", true).unwrap_err();
        assert!(matches!(err, CoreError::NotOwner { .. }));
        assert!(!list.is_archived);

        list.rename("u1", "Weekly").unwrap();
        list.set_archived("u1", true).unwrap();
        assert_eq!(list.name, "Weekly");
        assert!(list.is_archived);
    }

    #[test]
    fn test_item_completion_is_a_reset() {
        let now = Utc::now();
        let mut item = Item::new("item-1", "awid", NewItem::new("list-1", "Milk", 2.0, "u1"), now);
        assert_eq!(item.status, ItemStatus::Open);
        assert!(item.completed_by.is_none());

        item.set_completed(true, "u2", now);
        item.set_completed(true, "u2", now);
        assert!(item.is_completed());
        assert_eq!(item.completed_by.as_deref(), Some("u2"));
        assert_eq!(item.completed_at, Some(now));

        item.set_completed(false, "u2", now);
        assert_eq!(item.status, ItemStatus::Open);
        assert!(item.completed_by.is_none());
        assert!(item.completed_at.is_none());
    }

    #[test]
    fn test_update_details_keeps_status() {
        let now = Utc::now();
        let mut item = Item::new("item-1", "awid", NewItem::new("list-1", "Milk", 2.0, "u1"), now);
        item.set_completed(true, "u1", now);
        item.update_details("Oat milk", 3.0);
        assert_eq!(item.name, "Oat milk");
        assert_eq!(item.quantity, 3.0);
        assert!(item.is_completed());
    }

    #[test]
    fn test_serializes_camel_case_with_iso_timestamps() {
        let list = sample_list();
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["ownerId"], "u1");
        assert_eq!(json["isArchived"], false);
        let created_at = json["createdAt"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(created_at).is_ok());

        let status = serde_json::to_value(ItemStatus::Completed).unwrap();
        assert_eq!(status, "completed");
    }
}
