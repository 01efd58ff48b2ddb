//! # Error Types
//!
//! Domain-specific error types for shoplist-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shoplist-core errors (this file)                                      │
//! │  ├── CoreError        - Ownership rule violations                      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  shoplist-db errors (separate crate)                                   │
//! │  └── DbError          - NotFound + backend failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → route layer status      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain rule violations raised by entity methods.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The acting user is not the owner of the list.
    ///
    /// ## When This Occurs
    /// - Renaming a list owned by someone else
    /// - Archiving/unarchiving a list owned by someone else
    ///
    /// The storage layer reports this as `NotFound` so that a forbidden
    /// update looks the same as a missing list on every backend.
    #[error("User {user_id} is not the owner of shopping list {list_id}")]
    NotOwner { list_id: String, user_id: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Produced by [`crate::validation`]. Stores raise only the quantity check,
/// wrapped in [`CoreError::Validation`].
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
