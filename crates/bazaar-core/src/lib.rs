//! # bazaar-core: Pure Cart Logic for the Bazaar Marketplace
//!
//! This crate holds the shopping cart every marketplace screen shares:
//! restaurant menus, shop products and pharmacy items all land in the same
//! cart, and checkout splits it into one order per vendor.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bazaar Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile Screens                               │   │
//! │  │  Menu ──► Product Detail ──► Cart ──► Checkout                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │         bazaar-store (CartStore, MarketConfig, checkout)        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bazaar-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │ CartEntry │  │   Money   │  │   Cart    │  │  catalog  │  │   │
//! │  │   │ LineItem  │  │  (cents)  │  │ VendorPart│  │   input   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cart`] - The cart, its invariants, totals and vendor partition
//! - [`types`] - Catalog records, cart entries, line items
//! - [`money`] - Exact decimal money, rounded to cents on output
//! - [`error`] - Domain error types
//! - [`validation`] - Catalog input checks
//!
//! ## Example Usage
//!
//! ```rust
//! use bazaar_core::{Cart, CartEntry, Money};
//!
//! let mut cart = Cart::new();
//! let biryani = CartEntry::new("m1", "Biryani", Money::from_cents(100), "r1", "Spice House").unwrap();
//! let aspirin = CartEntry::new("p1", "Aspirin", Money::from_cents(50), "ph1", "City Pharmacy").unwrap();
//!
//! cart.add_to_cart(biryani.clone());
//! cart.add_to_cart(biryani);
//! cart.add_to_cart(aspirin);
//!
//! assert_eq!(cart.total_quantity(), 3);
//! assert_eq!(cart.total_amount().cents(), 250);
//! assert_eq!(cart.cart_by_vendor().len(), 2); // two orders at checkout
//! ```

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, VendorGroup, VendorPartition};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
