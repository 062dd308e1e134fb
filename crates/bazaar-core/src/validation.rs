//! # Validation Module
//!
//! Boundary checks for catalog data entering the cart.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Where Validation Happens                           │
//! │                                                                         │
//! │  Catalog API JSON ──► CatalogItem (serde) ──► THIS MODULE ──► CartEntry│
//! │                                                    │                    │
//! │                                          Err → screen shows alert      │
//! │                                                                         │
//! │  Cart (store) ◄── CartEntry                                            │
//! │  Never validates again: a CartEntry is valid by construction.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bazaar_core::validation::{validate_item_id, validate_display_name};
//!
//! assert_eq!(validate_item_id("  m1 ").unwrap(), "m1");
//! assert!(validate_display_name("name", "").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted catalog or vendor identifier.
pub const MAX_ID_LEN: usize = 128;

/// Longest accepted display name.
pub const MAX_NAME_LEN: usize = 200;

// =============================================================================
// Identifier Validators
// =============================================================================

fn validate_identifier(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > MAX_ID_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_ID_LEN,
        });
    }

    Ok(value.to_string())
}

/// Validates a catalog item id (menu item, product or medicine).
///
/// ## Returns
/// The trimmed id.
pub fn validate_item_id(id: &str) -> ValidationResult<String> {
    validate_identifier("id", id)
}

/// Validates the id of the vendor that owns an item.
///
/// Every line item belongs to exactly one vendor, so this is never optional.
pub fn validate_vendor_id(vendor_id: &str) -> ValidationResult<String> {
    validate_identifier("vendorId", vendor_id)
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (item name, vendor name).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
pub fn validate_display_name(field: &str, name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Normalizes an optional text field: blank strings become `None`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price.
///
/// Zero is allowed (free items, promotional add-ons).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}
