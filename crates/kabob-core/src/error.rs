//! # Error Types
//!
//! Domain-specific error types for kabob-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kabob-core errors (this file)                                         │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  kabob-api errors (separate crate)                                     │
//! │  └── ApiError         - Transport / decoding failures                  │
//! │                                                                         │
//! │  kabob-session errors (separate crate)                                 │
//! │  └── SessionError     - Controller-level refusals                      │
//! │                                                                         │
//! │  Remote failures never surface as errors to the user: they are         │
//! │  reduced to a NormalizedError (see `normalize`).                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item id, field, limit)
//! 3. Errors are enum variants, never String
//! 4. `ValidationError` messages are shown to the user verbatim

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The requested catalog item is not in the loaded catalog.
    #[error("Menu item not found: {0}")]
    ItemNotFound(String),

    /// The catalog lists the item but marks it unavailable.
    #[error("{name} is currently unavailable")]
    ItemUnavailable { id: String, name: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// `field` is the user-facing label ("Name", "Email"), so `to_string()` can
/// be displayed next to the form field as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or whitespace-only.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format.
    #[error("{field} {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is on a block list (e.g. disposable email domain).
    #[error("{field} from '{value}' is not accepted")]
    Blocked { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
