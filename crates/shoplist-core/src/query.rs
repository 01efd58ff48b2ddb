//! # List Queries
//!
//! Filter and pagination semantics for `list_lists`, shared by all backends.
//!
//! ## Evaluation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  all lists in the workspace                                            │
//! │       │                                                                 │
//! │       ▼  ListFilter (logical AND of every supplied field)              │
//! │  owned_only?        owner_id == acting_user_id                         │
//! │  !include_archived  is_archived == false                               │
//! │  name?              case-insensitive substring of list name            │
//! │  member_id?         member_id ∈ members                                │
//! │       │                                                                 │
//! │       ▼  total = count(matching)                                       │
//! │  order: created_at DESC, insertion order DESC on ties                  │
//! │       │                                                                 │
//! │       ▼  PageInfo                                                       │
//! │  skip page_index * page_size, take page_size                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Name matching folds full Unicode case through [`fold_name`]. The SQLite
//! backend stores the folded name next to the original, so both backends
//! agree on every input.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::ShoppingList;
use crate::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

// =============================================================================
// Filter
// =============================================================================

/// Filter for `list_lists`.
///
/// ## Example
/// ```rust
/// use shoplist_core::ListFilter;
///
/// let filter = ListFilter::new("u1")
///     .owned_only(true)
///     .include_archived(true)
///     .name("  groc ");
///
/// assert_eq!(filter.name.as_deref(), Some("groc"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilter {
    /// The user on whose behalf the listing runs. Only consulted by `owned_only`.
    pub acting_user_id: String,

    /// Restrict to lists owned by the acting user.
    #[serde(default)]
    pub owned_only: bool,

    /// Include archived lists. Off by default.
    #[serde(default)]
    pub include_archived: bool,

    /// Case-insensitive substring of the list name. Trimmed; blank means absent.
    #[serde(default)]
    pub name: Option<String>,

    /// The list's members must contain this id. Trimmed; blank means absent.
    #[serde(default)]
    pub member_id: Option<String>,
}

impl ListFilter {
    /// Filter matching every active list, run on behalf of `acting_user_id`.
    pub fn new(acting_user_id: impl Into<String>) -> Self {
        ListFilter {
            acting_user_id: acting_user_id.into(),
            ..Default::default()
        }
    }

    pub fn owned_only(mut self, owned_only: bool) -> Self {
        self.owned_only = owned_only;
        self
    }

    pub fn include_archived(mut self, include_archived: bool) -> Self {
        self.include_archived = include_archived;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = non_blank(name.into());
        self
    }

    pub fn member_id(mut self, member_id: impl Into<String>) -> Self {
        self.member_id = non_blank(member_id.into());
        self
    }

    /// Trimmed name needle, if one applies.
    pub fn name_needle(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Trimmed member id, if one applies.
    pub fn member_needle(&self) -> Option<&str> {
        self.member_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Returns true when `list` passes every supplied condition.
    pub fn matches(&self, list: &ShoppingList) -> bool {
        if self.owned_only && !list.is_owned_by(&self.acting_user_id) {
            return false;
        }
        if !self.include_archived && list.is_archived {
            return false;
        }
        if let Some(needle) = self.name_needle() {
            if !fold_name(&list.name).contains(&fold_name(needle)) {
                return false;
            }
        }
        if let Some(member) = self.member_needle() {
            if !list.has_member(member) {
                return false;
            }
        }
        true
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Case-folded form of a list name, used for name matching.
///
/// Folds full Unicode case, so "ČESNEK" and "česnek" compare equal.
pub fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

// =============================================================================
// Pagination
// =============================================================================

/// Requested page: 0-based index and positive size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page_index: u32,
    pub page_size: u32,
}

impl Default for PageInfo {
    fn default() -> Self {
        PageInfo {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageInfo {
    pub fn new(page_index: u32, page_size: u32) -> Self {
        PageInfo {
            page_index,
            page_size,
        }
    }

    /// Same page with the size forced into `1..=MAX_PAGE_SIZE`.
    pub fn clamped(self) -> Self {
        PageInfo {
            page_index: self.page_index,
            page_size: self.page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Number of records skipped before this page.
    #[inline]
    pub fn offset(&self) -> u64 {
        u64::from(self.page_index) * u64::from(self.page_size)
    }

    #[inline]
    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }

    /// Cuts this page out of an already filtered and ordered result.
    ///
    /// An index past the end yields an empty page; `total` always counts
    /// every record in `sorted`.
    pub fn paginate<T>(&self, sorted: Vec<T>) -> Page<T> {
        let total = sorted.len() as u64;
        let skip = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(self.limit()).unwrap_or(usize::MAX);
        let items = sorted.into_iter().skip(skip).take(take).collect();
        Page {
            items,
            page_info: *self,
            total,
        }
    }
}

/// One page of results plus the pre-pagination match count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(rename = "itemList")]
    pub items: Vec<T>,
    pub page_info: PageInfo,
    pub total: u64,
}

impl<T> Page<T> {
    /// Number of pages needed to show `total` records.
    pub fn page_count(&self) -> u64 {
        let size = self.page_info.limit().max(1);
        self.total.div_ceil(size)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
