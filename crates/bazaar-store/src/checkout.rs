//! # Checkout
//!
//! Turns the cart into one order per vendor and hands each to the order API.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Lifecycle                                   │
//! │                                                                         │
//! │  Cart ──cart_by_vendor()──► [v1 items] [v2 items] [v3 items]            │
//! │                                  │          │          │                │
//! │                                  ▼          ▼          ▼                │
//! │                            OrderRequest OrderRequest OrderRequest       │
//! │                                  │          │          │                │
//! │                                  └────► OrderGateway ◄─┘                │
//! │                                             │                           │
//! │                     all placed? ────────────┤                           │
//! │                        │ yes                │ no                        │
//! │                        ▼                    ▼                           │
//! │                   clear_cart()        placed lines leave the cart,      │
//! │                   receipt             failed vendors' lines stay,       │
//! │                                       CHECKOUT_FAILED + placed orders   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Orders are dispatched one after another in vendor order. An accepted
//! order is never re-sent: after a partial failure the cart holds only what
//! still needs ordering, so retrying `checkout` submits just those vendors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use bazaar_core::{Cart, Money, VendorGroup};

use crate::error::ApiError;
use crate::state::{CartStore, MarketConfig};

// =============================================================================
// Order Request
// =============================================================================

/// One item id + quantity pair in an order body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub item_id: String,
    pub quantity: i64,
}

/// Body of one order-creation call, scoped to a single vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Client-generated id for this submission, echoed in `PlacedOrder`
    pub request_id: Uuid,
    pub vendor_id: String,
    pub vendor_name: String,
    pub items: Vec<OrderLine>,
    pub subtotal_cents: i64,
    pub delivery_fee_cents: i64,
    pub total_cents: i64,
}

impl OrderRequest {
    fn from_group(group: &VendorGroup<'_>, config: &MarketConfig) -> Self {
        let subtotal = group.subtotal();
        let delivery_fee = config.delivery_fee();

        OrderRequest {
            request_id: Uuid::new_v4(),
            vendor_id: group.vendor_id.to_string(),
            vendor_name: group.vendor_name.to_string(),
            items: group
                .items
                .iter()
                .map(|item| OrderLine {
                    item_id: item.id.clone(),
                    quantity: item.quantity,
                })
                .collect(),
            subtotal_cents: subtotal.cents(),
            delivery_fee_cents: delivery_fee.cents(),
            total_cents: (subtotal + delivery_fee).cents(),
        }
    }
}

/// Builds one order request per vendor, in vendor order.
pub fn build_vendor_orders(cart: &Cart, config: &MarketConfig) -> Vec<OrderRequest> {
    cart.cart_by_vendor()
        .iter()
        .map(|group| OrderRequest::from_group(group, config))
        .collect()
}

// =============================================================================
// Summary
// =============================================================================

/// Order summary shown on the checkout screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub order_count: usize,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
    /// Delivery fee × number of vendor orders
    pub delivery_fees_cents: i64,
    pub service_fee_cents: i64,
    pub total_cents: i64,
}

impl CheckoutSummary {
    pub fn for_cart(cart: &Cart, config: &MarketConfig) -> Self {
        let order_count = cart.vendor_count();
        let subtotal = cart.total_amount();

        // Nothing to deliver, nothing to charge
        let (delivery_fees, service_fee) = if order_count == 0 {
            (Money::zero(), Money::zero())
        } else {
            (
                config.delivery_fee() * order_count as i64,
                config.service_fee(),
            )
        };

        CheckoutSummary {
            order_count,
            total_quantity: cart.total_quantity(),
            subtotal_cents: subtotal.cents(),
            delivery_fees_cents: delivery_fees.cents(),
            service_fee_cents: service_fee.cents(),
            total_cents: (subtotal + delivery_fees + service_fee).cents(),
        }
    }
}

// =============================================================================
// Order Gateway
// =============================================================================

/// An order the backend accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    pub order_id: String,
    pub vendor_id: String,
    pub request_id: Uuid,
}

/// The order-creation API. Implemented by the app's HTTP client.
pub trait OrderGateway {
    /// Creates one vendor order.
    async fn create_order(&self, request: &OrderRequest) -> Result<PlacedOrder, ApiError>;
}

/// Result of a checkout where every vendor order was placed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub orders: Vec<PlacedOrder>,
    pub summary: CheckoutSummary,
    pub completed_at: DateTime<Utc>,
}

/// A checkout that did not place every vendor order.
///
/// Serializes as the `ApiError` fields plus `placed`.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{error}")]
pub struct CheckoutError {
    #[serde(flatten)]
    pub error: ApiError,
    /// Orders accepted before the failure; their lines already left the cart
    pub placed: Vec<PlacedOrder>,
}

impl From<ApiError> for CheckoutError {
    fn from(error: ApiError) -> Self {
        CheckoutError {
            error,
            placed: Vec::new(),
        }
    }
}

/// Places one order per vendor and clears the cart if all succeed.
///
/// ## Errors
/// - `CART_EMPTY` when there is nothing to order; the gateway is not called
/// - `CHECKOUT_FAILED` when any vendor order fails. Lines of the accepted
///   orders are taken out of the cart and returned in `placed`; the failed
///   vendors' lines stay for a retry.
pub async fn checkout<G>(
    store: &CartStore,
    config: &MarketConfig,
    gateway: &G,
) -> Result<CheckoutReceipt, CheckoutError>
where
    G: OrderGateway,
{
    let (requests, summary) = store.with_cart(|cart| {
        (
            build_vendor_orders(cart, config),
            CheckoutSummary::for_cart(cart, config),
        )
    });

    if requests.is_empty() {
        return Err(ApiError::cart_empty().into());
    }

    info!(
        orders = requests.len(),
        total_cents = summary.total_cents,
        "Starting checkout"
    );

    let mut placed = Vec::with_capacity(requests.len());
    let mut placed_requests = Vec::with_capacity(requests.len());
    let mut failed_vendors = Vec::new();

    for request in &requests {
        debug!(
            vendor_id = %request.vendor_id,
            request_id = %request.request_id,
            lines = request.items.len(),
            "Submitting vendor order"
        );

        match gateway.create_order(request).await {
            Ok(order) => {
                info!(vendor_id = %order.vendor_id, order_id = %order.order_id, "Vendor order placed");
                placed.push(order);
                placed_requests.push(request);
            }
            Err(err) => {
                warn!(vendor_id = %request.vendor_id, error = %err, "Vendor order failed");
                failed_vendors.push(request.vendor_name.clone());
            }
        }
    }

    if !failed_vendors.is_empty() {
        for request in &placed_requests {
            release_ordered_lines(store, request);
        }
        return Err(CheckoutError {
            error: ApiError::checkout_failed(&failed_vendors, placed.len(), requests.len()),
            placed,
        });
    }

    store.clear_cart();
    info!(orders = placed.len(), "Checkout complete, cart cleared");

    Ok(CheckoutReceipt {
        orders: placed,
        summary,
        completed_at: Utc::now(),
    })
}

/// Takes the quantities an accepted order covered out of the cart.
///
/// Units added while the order was in flight stay in the cart.
fn release_ordered_lines(store: &CartStore, request: &OrderRequest) {
    for line in &request.items {
        let remaining = store.quantity_of(&line.item_id).saturating_sub(line.quantity);
        store.update_quantity(&line.item_id, remaining);
    }
}
