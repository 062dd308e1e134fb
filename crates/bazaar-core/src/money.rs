//! # Money Module
//!
//! Provides the `Money` type for handling prices and cart totals.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The catalog API sends prices as JSON numbers:                          │
//! │    { "price": 12.9 }   { "price": 0.005 }                               │
//! │                                                                         │
//! │  Summing them as floats drifts:                                         │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │                                                                         │
//! │  Rounding each unit price to cents compounds with quantity:             │
//! │    0.005 -> 0.01, x1000 = 10.00 (should be 5.00)                        │
//! │                                                                         │
//! │  OUR SOLUTION: convert ONCE to an exact decimal, round ONLY on output  │
//! │    12.9  ──try_from_major──►  Decimal 12.9                              │
//! │    every cart total is an exact decimal sum                             │
//! │    cents() / Display round to two decimals when shown or sent           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bazaar_core::money::Money;
//!
//! let price = Money::from_cents(1099); // $10.99
//!
//! let doubled = price * 2;
//! assert_eq!(doubled.cents(), 2198);
//!
//! // Catalog prices arrive in major units
//! let from_api = Money::try_from_major(10.99).unwrap();
//! assert_eq!(from_api, price);
//!
//! // Sub-cent prices stay exact until presentation
//! let grain = Money::try_from_major(0.005).unwrap();
//! assert_eq!((grain * 1000).cents(), 500);
//! ```

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use ts_rs::TS;

use crate::error::ValidationError;

/// Decimal places used when a value leaves the cart (cents).
const PRESENTATION_DP: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// An exact monetary value in major units (dollars).
///
/// Serialized as a decimal string (`"10.99"`) so no precision is lost on
/// the wire.
///
/// ## Where Money Flows
/// ```text
/// CatalogItem.price (f64) ──► CartEntry.price ──► CartLineItem.line_total
///                                                        │
///                        Cart.total_amount ◄─────────────┤
///                        VendorGroup.subtotal ◄──────────┘
///                                │
///                           cents() / Display   (rounded here only)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, PRESENTATION_DP))
    }

    /// Wraps an exact decimal amount in major units.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Converts a catalog price in major units into Money.
    ///
    /// This is the only place a float becomes money. The shortest decimal
    /// that round-trips the float is kept; nothing is rounded to cents.
    ///
    /// ## Errors
    /// - `InvalidFormat` if the value is NaN, infinite, or too large
    /// - `MustBeNonNegative` if the value is below zero
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::money::Money;
    ///
    /// assert_eq!(Money::try_from_major(2.5).unwrap().cents(), 250);
    /// assert_eq!(Money::try_from_major(0.1 + 0.2).unwrap().cents(), 30);
    /// assert!(Money::try_from_major(-1.0).is_err());
    /// ```
    pub fn try_from_major(major: f64) -> Result<Self, ValidationError> {
        if !major.is_finite() {
            return Err(ValidationError::InvalidFormat {
                field: "price".to_string(),
                reason: "must be a finite number".to_string(),
            });
        }

        if major < 0.0 {
            return Err(ValidationError::MustBeNonNegative {
                field: "price".to_string(),
            });
        }

        let Some(amount) = Decimal::from_f64(major) else {
            return Err(ValidationError::InvalidFormat {
                field: "price".to_string(),
                reason: "is too large".to_string(),
            });
        };

        Ok(Money(amount))
    }

    /// Returns the exact amount in major units.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns the value rounded to whole cents (half away from zero).
    ///
    /// This is a presentation/wire value. Sum `Money`, not cents.
    /// Saturates at the `i64` bounds.
    pub fn cents(&self) -> i64 {
        let rounded = self.rounded();
        rounded
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|c| c.to_i64())
            .unwrap_or(if rounded.is_sign_negative() {
                i64::MIN
            } else {
                i64::MAX
            })
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// Saturates instead of overflowing; a cart that large is not a real cart.
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    pub fn multiply_quantity(&self, qty: i64) -> Self {
        let factor = Decimal::from(qty);
        Money(self.0.checked_mul(factor).unwrap_or_else(|| {
            if self.0.is_sign_negative() != factor.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            }
        }))
    }

    fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(PRESENTATION_DP, RoundingStrategy::MidpointAwayFromZero)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly display (`$10.99`), rounded to cents.
///
/// Screens use `MarketConfig::format_currency` for the configured symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.rounded();
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let mut magnitude = rounded.abs();
        magnitude.rescale(PRESENTATION_DP);
        write!(f, "{}${}", sign, magnitude)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.checked_add(other.0).unwrap_or(if other.0.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
