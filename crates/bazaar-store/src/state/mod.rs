//! # State Module
//!
//! Session state shared by screens.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  Session start                                                          │
//! │    let cart = CartStore::new();                                        │
//! │    let config = MarketConfig::load()?;                                 │
//! │                              │                                          │
//! │          ┌───────────────────┼───────────────────┐                      │
//! │          ▼                   ▼                   ▼                      │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐            │
//! │  │ Menu screen  │   │ Cart screen  │   │ Checkout screen  │            │
//! │  │ cart.clone() │   │ cart.clone() │   │ cart + config    │            │
//! │  └──────────────┘   └──────────────┘   └──────────────────┘            │
//! │                                                                         │
//! │  • CartStore: one shared cart, single UI thread, no locks              │
//! │  • MarketConfig: read-only after load                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;

pub use cart::{CartResponse, CartStore, CartTotals, SubscriptionId, VendorSection};
pub use config::MarketConfig;
