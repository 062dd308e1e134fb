//! # Error Types
//!
//! Errors surfaced to screens, plus config loading errors.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Bazaar                                 │
//! │                                                                         │
//! │  Screen                      Rust                                       │
//! │  ──────                      ────                                       │
//! │                                                                         │
//! │  CartEntry::from_catalog ─── ValidationError / CoreError ──┐           │
//! │  MarketConfig::load ──────── ConfigError ──────────────────┤           │
//! │  checkout() ──────────────── empty cart / order failures ──┤           │
//! │                                                            ▼           │
//! │                                                        ApiError        │
//! │                                                            │           │
//! │  Alert.alert(e.message) ◄──────────────────────────────────┘           │
//! │                                                                         │
//! │  Cart mutations never produce an ApiError.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use bazaar_core::{CoreError, ValidationError};

// =============================================================================
// API Error
// =============================================================================

/// Error handed to screens.
///
/// ## Serialization
/// ```json
/// {
///   "code": "CHECKOUT_FAILED",
///   "message": "Orders failed for: City Pharmacy (1 of 2 placed)"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Error, PartialEq)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for screen-facing errors.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Catalog data could not become a cart entry
    ValidationError,

    /// Checkout requested with nothing in the cart
    CartEmpty,

    /// The order API rejected a single vendor order
    OrderFailed,

    /// At least one vendor order failed; the cart was kept
    CheckoutFailed,

    /// Config file unreadable or malformed
    ConfigError,

    /// Anything else
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates the error for checking out an empty cart.
    pub fn cart_empty() -> Self {
        ApiError::new(ErrorCode::CartEmpty, "Cart is empty")
    }

    /// Creates an error for one rejected vendor order.
    pub fn order_failed(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::OrderFailed, message)
    }

    /// Creates the error for a checkout where some vendor orders failed.
    pub fn checkout_failed(failed_vendors: &[String], placed: usize, total: usize) -> Self {
        ApiError::new(
            ErrorCode::CheckoutFailed,
            format!(
                "Orders failed for: {} ({} of {} placed)",
                failed_vendors.join(", "),
                placed,
                total
            ),
        )
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidPrice { .. } | CoreError::Validation(_) => {
                ApiError::validation(err.to_string())
            }
            CoreError::Decode(e) => {
                // Log the parser detail but keep the screen message short
                tracing::error!("Catalog record decode failed: {}", e);
                ApiError::validation("Item data is malformed")
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

// =============================================================================
// Config Error
// =============================================================================

/// Errors while loading `bazaar.toml`.
///
/// A missing file is not an error; defaults apply.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serializes_code_and_message() {
        let err = ApiError::cart_empty();
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "CART_EMPTY");
        assert_eq!(json["message"], "Cart is empty");
    }

    #[test]
    fn test_checkout_failed_message_names_vendors() {
        let err = ApiError::checkout_failed(&["City Pharmacy".to_string()], 1, 2);
        assert_eq!(err.code, ErrorCode::CheckoutFailed);
        assert_eq!(err.to_string(), "Orders failed for: City Pharmacy (1 of 2 placed)");
    }

    #[test]
    fn test_core_error_maps_to_validation() {
        let err: ApiError = CoreError::from(ValidationError::Required {
            field: "vendorId".to_string(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("vendorId is required"));
    }

    #[test]
    fn test_decode_error_hides_parser_detail() {
        let decode = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: ApiError = CoreError::from(decode).into();
        assert_eq!(err, ApiError::validation("Item data is malformed"));
    }
}
