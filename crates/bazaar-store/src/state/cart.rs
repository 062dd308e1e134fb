//! # Cart State
//!
//! The session-scoped cart store screens share.
//!
//! ## Provider Pattern
//! One `CartStore` is created when the session starts and cloned into every
//! screen that needs it. Clones share the same cart; there is no global.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Screen Action            CartStore               Cart Change           │
//! │  ─────────────            ─────────               ───────────           │
//! │                                                                         │
//! │  Tap "Add" ──────────────► add_to_cart() ───────► push or qty += 1     │
//! │  Stepper ────────────────► update_quantity() ───► qty = n / remove     │
//! │  Trash icon ─────────────► remove_from_cart() ──► remove if present    │
//! │  "Clear Cart" ───────────► clear_cart() ────────► items.clear()        │
//! │  Render ─────────────────► snapshot() ──────────► (read only)          │
//! │                                                                         │
//! │  After a real change: version += 1, subscribers called with version.   │
//! │  No-op mutations (unknown id, same quantity) notify nobody.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Threading
//! The store lives on the UI thread. It is `Rc<RefCell<..>>` based, so it is
//! `!Send` and the compiler keeps it there. A closure passed to
//! [`CartStore::with_cart`] must not call back into the store.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use tracing::debug;

use bazaar_core::{Cart, CartEntry, CartLineItem, Money};

// =============================================================================
// Snapshot Types
// =============================================================================

/// Cart totals summary for screens.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Distinct line items
    pub item_count: usize,
    /// Units across all lines
    pub total_quantity: i64,
    pub total_amount_cents: i64,
    /// Orders checkout would create
    pub vendor_count: usize,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.len(),
            total_quantity: cart.total_quantity(),
            total_amount_cents: cart.total_amount().cents(),
            vendor_count: cart.vendor_count(),
        }
    }
}

/// One vendor's section on the cart screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorSection {
    pub vendor_id: String,
    pub vendor_name: String,
    pub items: Vec<CartLineItem>,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
}

/// Everything a screen renders from: flat items, totals, vendor sections.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartLineItem>,
    pub totals: CartTotals,
    pub vendors: Vec<VendorSection>,
    pub version: u64,
}

impl CartResponse {
    fn build(cart: &Cart, version: u64) -> Self {
        let vendors = cart
            .cart_by_vendor()
            .iter()
            .map(|group| VendorSection {
                vendor_id: group.vendor_id.to_string(),
                vendor_name: group.vendor_name.to_string(),
                items: group.items.iter().map(|i| (*i).clone()).collect(),
                total_quantity: group.total_quantity(),
                subtotal_cents: group.subtotal().cents(),
            })
            .collect();

        CartResponse {
            items: cart.items().to_vec(),
            totals: CartTotals::from(cart),
            vendors,
            version,
        }
    }
}

// =============================================================================
// Subscriptions
// =============================================================================

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(u64)>;

// =============================================================================
// Cart Store
// =============================================================================

struct StoreInner {
    cart: Cart,
    version: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

/// Session-scoped cart handle.
///
/// ## Lifecycle
/// - `CartStore::new()` at session start (or per test)
/// - `clone()` into each screen
/// - `end_session()` at logout
#[derive(Clone)]
pub struct CartStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl CartStore {
    /// Creates a store holding an empty cart.
    pub fn new() -> Self {
        CartStore {
            inner: Rc::new(RefCell::new(StoreInner {
                cart: Cart::new(),
                version: 0,
                listeners: Vec::new(),
                next_subscription: 0,
            })),
        }
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Adds one unit of an item. See [`Cart::add_to_cart`].
    pub fn add_to_cart(&self, entry: CartEntry) -> i64 {
        let item_id = entry.id().to_string();
        let vendor_id = entry.vendor_id().to_string();

        let quantity = self.inner.borrow_mut().cart.add_to_cart(entry);
        debug!(item_id = %item_id, vendor_id = %vendor_id, quantity, "add_to_cart");

        self.commit(true);
        quantity
    }

    /// Removes an item; unknown ids are ignored.
    pub fn remove_from_cart(&self, id: &str) -> bool {
        let removed = self.inner.borrow_mut().cart.remove_from_cart(id);
        debug!(item_id = %id, removed, "remove_from_cart");

        self.commit(removed);
        removed
    }

    /// Sets an item's quantity; zero or less removes it.
    pub fn update_quantity(&self, id: &str, quantity: i64) -> bool {
        let changed = self.inner.borrow_mut().cart.update_quantity(id, quantity);
        debug!(item_id = %id, quantity, changed, "update_quantity");

        self.commit(changed);
        changed
    }

    /// Empties the cart.
    pub fn clear_cart(&self) -> bool {
        let cleared = self.inner.borrow_mut().cart.clear_cart();
        debug!(cleared, "clear_cart");

        self.commit(cleared);
        cleared
    }

    /// Tears the session down: empties the cart and drops every subscriber.
    pub fn end_session(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.cart.clear_cart();
        inner.listeners.clear();
        inner.version += 1;
        debug!(version = inner.version, "end_session");
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust
    /// use bazaar_store::CartStore;
    ///
    /// let store = CartStore::new();
    /// let empty = store.with_cart(|cart| cart.is_empty());
    /// assert!(empty);
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let inner = self.inner.borrow();
        f(&inner.cart)
    }

    /// Current line items, insertion order.
    pub fn items(&self) -> Vec<CartLineItem> {
        self.with_cart(|c| c.items().to_vec())
    }

    /// Quantity badge lookup: the item's quantity or 0.
    pub fn quantity_of(&self, id: &str) -> i64 {
        self.with_cart(|c| c.quantity_of(id))
    }

    pub fn total_quantity(&self) -> i64 {
        self.with_cart(Cart::total_quantity)
    }

    pub fn total_amount(&self) -> Money {
        self.with_cart(Cart::total_amount)
    }

    pub fn is_empty(&self) -> bool {
        self.with_cart(Cart::is_empty)
    }

    /// Bumped after every change that altered the cart.
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Builds the render view: items, totals and vendor sections.
    pub fn snapshot(&self) -> CartResponse {
        let inner = self.inner.borrow();
        CartResponse::build(&inner.cart, inner.version)
    }

    // -------------------------------------------------------------------------
    // Subscriptions
    // -------------------------------------------------------------------------

    /// Registers a callback run with the new version after each change.
    ///
    /// Callbacks run after the store's borrow is released, so they may read
    /// from or write to the store.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(u64) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_subscription);
        inner.next_subscription += 1;
        inner.listeners.push((id, Rc::new(listener)));
        id
    }

    /// Removes a subscriber. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|(sid, _)| *sid != id);
        inner.listeners.len() != before
    }

    fn commit(&self, changed: bool) {
        if !changed {
            return;
        }

        let (version, listeners) = {
            let mut inner = self.inner.borrow_mut();
            inner.version += 1;
            let listeners: Vec<Listener> =
                inner.listeners.iter().map(|(_, l)| Rc::clone(l)).collect();
            (inner.version, listeners)
        };

        for listener in listeners {
            listener(version);
        }
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("CartStore")
            .field("cart", &inner.cart)
            .field("version", &inner.version)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}
