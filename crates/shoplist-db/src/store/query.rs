//! # SQL List Queries
//!
//! Translates a [`ListFilter`] and [`PageInfo`] into SQLite statements that
//! match [`ListFilter::matches`] row for row.
//!
//! ```text
//! ListFilter field        SQL predicate
//! ─────────────────────   ──────────────────────────────────────────────
//! (always)                awid = ?
//! owned_only              owner_id = ?                (acting user)
//! !include_archived       is_archived = 0
//! name                    instr(name_folded, ?) > 0   (needle folded)
//! member_id               EXISTS (… json_each(members) … value = ?)
//!
//! ORDER BY created_at DESC, seq DESC  LIMIT ? OFFSET ?
//! ```
//!
//! `name_folded` is written by the store with [`fold_name`], and the needle
//! goes through the same function, so matching agrees with the in-process
//! matcher for non-ASCII names too.

use shoplist_core::query::fold_name;
use shoplist_core::{ListFilter, PageInfo};
use sqlx::{QueryBuilder, Sqlite};

/// Columns selected for a full list record, in `ShoppingListRow` order.
pub const LIST_COLUMNS: &str = "id, awid, owner_id, name, members, is_archived, created_at";

/// Columns selected for a full item record.
pub const ITEM_COLUMNS: &str =
    "id, awid, list_id, name, quantity, status, created_by, completed_by, created_at, completed_at";

fn push_list_filter<'a>(qb: &mut QueryBuilder<'a, Sqlite>, awid: &'a str, filter: &'a ListFilter) {
    qb.push(" WHERE awid = ").push_bind(awid);

    if filter.owned_only {
        qb.push(" AND owner_id = ")
            .push_bind(filter.acting_user_id.as_str());
    }

    if !filter.include_archived {
        qb.push(" AND is_archived = 0");
    }

    if let Some(needle) = filter.name_needle() {
        qb.push(" AND instr(name_folded, ")
            .push_bind(fold_name(needle))
            .push(") > 0");
    }

    if let Some(member) = filter.member_needle() {
        qb.push(
            " AND EXISTS (SELECT 1 FROM json_each(shopping_lists.members) \
             WHERE json_each.value = ",
        )
        .push_bind(member)
        .push(")");
    }
}

/// `SELECT COUNT(*)` over every list matching `filter`.
pub fn count_lists<'a>(awid: &'a str, filter: &'a ListFilter) -> QueryBuilder<'a, Sqlite> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM shopping_lists");
    push_list_filter(&mut qb, awid, filter);
    qb
}

/// One ordered page of lists matching `filter`.
pub fn select_lists_page<'a>(
    awid: &'a str,
    filter: &'a ListFilter,
    page: PageInfo,
) -> QueryBuilder<'a, Sqlite> {
    let mut qb = QueryBuilder::new(format!("SELECT {LIST_COLUMNS} FROM shopping_lists"));
    push_list_filter(&mut qb, awid, filter);

    let limit = i64::try_from(page.limit()).unwrap_or(i64::MAX);
    let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);

    qb.push(" ORDER BY created_at DESC, seq DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
    qb
}
