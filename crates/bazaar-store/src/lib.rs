//! # bazaar-store: Session Cart Store
//!
//! The layer marketplace screens talk to. It owns the session's cart,
//! loads display/fee config, and runs checkout against the order API.
//!
//! ## Module Organization
//! ```text
//! bazaar_store/
//! ├── lib.rs          ◄─── You are here (exports, logging setup)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cart.rs     ◄─── CartStore: shared cart, snapshots, subscribers
//! │   └── config.rs   ◄─── MarketConfig: currency display, flat fees
//! ├── checkout.rs     ◄─── Per-vendor order requests, OrderGateway
//! └── error.rs        ◄─── ApiError for screens, ConfigError
//! ```
//!
//! ## Session Wiring
//! ```rust
//! use bazaar_core::{CartEntry, Money};
//! use bazaar_store::{CartStore, MarketConfig};
//!
//! let cart = CartStore::new();
//! let config = MarketConfig::default();
//!
//! let menu_screen = cart.clone();
//! menu_screen.add_to_cart(
//!     CartEntry::new("m1", "Nihari", Money::from_cents(1250), "r1", "Old Town Grill").unwrap(),
//! );
//!
//! let snapshot = cart.snapshot();
//! assert_eq!(config.format_currency(snapshot.totals.total_amount_cents), "$12.50");
//! ```

pub mod checkout;
pub mod error;
pub mod state;

use tracing::Subscriber;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub use checkout::{
    build_vendor_orders, checkout, CheckoutError, CheckoutReceipt, CheckoutSummary, OrderGateway,
    OrderLine, OrderRequest, PlacedOrder,
};
pub use error::{ApiError, ConfigError, ErrorCode};
pub use state::{CartResponse, CartStore, CartTotals, MarketConfig, SubscriptionId, VendorSection};

/// Filter used when `RUST_LOG` is unset or unparsable.
const DEFAULT_DIRECTIVES: &str = "info,bazaar_store=debug,bazaar_core=debug";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show every cart mutation
/// - `RUST_LOG=bazaar_store=trace` - Trace this crate only
/// - Default: INFO, DEBUG for bazaar crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    // try_init: a host app may already have installed a subscriber
    let _ = log_subscriber(filter).try_init();
}

/// The fmt subscriber, gated only by `filter`.
fn log_subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt().with_env_filter(filter).finish()
}
