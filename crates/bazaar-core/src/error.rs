//! # Error Types
//!
//! Domain-specific error types for bazaar-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bazaar-core errors (this file)                                        │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Catalog input validation failures              │
//! │                                                                         │
//! │  bazaar-store errors (separate crate)                                  │
//! │  ├── ConfigError      - Config file failures                           │
//! │  └── ApiError         - What screens see (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Screen alert           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! Cart mutations never fail. Removing or updating an id that is not in the
//! cart is a no-op, and a quantity of zero or less removes the line. The
//! only fallible surface is turning raw catalog data into a [`CartEntry`].
//!
//! [`CartEntry`]: crate::types::CartEntry

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A catalog price could not be represented as money.
    ///
    /// ## When This Occurs
    /// - Backend sent `NaN` or infinity
    /// - Backend sent a negative price
    /// - Price is too large to represent
    #[error("Invalid price for item {item_id}: {reason}")]
    InvalidPrice { item_id: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Catalog record was not valid JSON or had the wrong shape.
    #[error("Malformed catalog record: {0}")]
    Decode(#[from] serde_json::Error),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised while building a cart entry from catalog data, before the store
/// ever sees it.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g. a non-finite number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
