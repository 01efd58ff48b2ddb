//! # Validation Module
//!
//! Input checks for the layer in front of the stores.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Route handler                                                 │
//! │  ├── Type checks (deserialization)                                     │
//! │  └── THIS MODULE: names, quantities, page info                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Storage (shoplist-db)                                        │
//! │  ├── Quantity (finite, positive)                                       │
//! │  ├── Entity existence                                                  │
//! │  └── Ownership on rename/archive                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stores apply [`validate_quantity`] themselves; the other checks are left
//! to the caller.
//!
//! ## Usage
//! ```rust
//! use shoplist_core::validation::{validate_list_name, validate_quantity};
//!
//! validate_list_name("Groceries").unwrap();
//! assert!(validate_quantity(0.0).is_err());
//! ```

use crate::error::ValidationError;
use crate::query::PageInfo;
use crate::{MAX_NAME_LENGTH, MAX_PAGE_SIZE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates a shopping list name: non-blank, at most 200 characters.
pub fn validate_list_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name)
}

/// Validates an item name: non-blank, at most 200 characters.
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name)
}

/// Validates a user or entity id: non-blank.
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates an item quantity: finite and strictly positive.
///
/// ## Example
/// ```rust
/// use shoplist_core::validation::validate_quantity;
///
/// assert!(validate_quantity(2.0).is_ok());
/// assert!(validate_quantity(-1.0).is_err());
/// assert!(validate_quantity(f64::NAN).is_err());
/// ```
pub fn validate_quantity(quantity: f64) -> ValidationResult<()> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates page info: `page_size` must be within `1..=200`.
///
/// `page_index` is unsigned, so any value is accepted; an index past the
/// last record simply produces an empty page.
pub fn validate_page_info(page: &PageInfo) -> ValidationResult<()> {
    if page.page_size == 0 || page.page_size > MAX_PAGE_SIZE {
        return Err(ValidationError::OutOfRange {
            field: "pageSize".to_string(),
            min: 1,
            max: i64::from(MAX_PAGE_SIZE),
        });
    }
    Ok(())
}
