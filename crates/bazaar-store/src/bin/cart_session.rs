//! # Cart Session
//!
//! Plays a scripted shopping session against the store: browse three
//! vendors, adjust quantities, check out with a gateway that only logs.
//!
//! Usage:
//!   cargo run -p bazaar-store --bin cart-session
//!   RUST_LOG=debug BAZAAR_DELIVERY_FEE=1.5 cargo run -p bazaar-store --bin cart-session

use std::cell::Cell;
use std::rc::Rc;

use tracing::{info, warn};

use bazaar_core::CartEntry;
use bazaar_store::{
    checkout, init_tracing, ApiError, CartStore, MarketConfig, OrderGateway, OrderRequest,
    PlacedOrder,
};

/// Catalog records as the menu, shop and pharmacy endpoints return them.
const CATALOG: &[&str] = &[
    r#"{"_id":"m-101","name":"Chicken Biryani","price":8.5,"restaurantId":"r-1","restaurantName":"Spice House","entityType":"restaurant"}"#,
    r#"{"_id":"m-102","name":"Mango Lassi","price":2.25,"restaurantId":"r-1","restaurantName":"Spice House","entityType":"restaurant"}"#,
    r#"{"_id":"s-201","name":"Basmati Rice 5kg","price":12.99,"shopId":"s-1","shopName":"Corner Mart","entityType":"shop"}"#,
    r#"{"_id":"p-301","name":"Paracetamol 500mg","price":3.1,"pharmacyId":"ph-1","pharmacyName":"City Pharmacy","entityType":"pharmacy"}"#,
];

/// Accepts every order and numbers them.
struct LoggingGateway {
    next_id: Cell<u32>,
}

impl OrderGateway for LoggingGateway {
    async fn create_order(&self, request: &OrderRequest) -> Result<PlacedOrder, ApiError> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let body = serde_json::to_string(request).map_err(|e| ApiError::internal(e.to_string()))?;
        info!(body = %body, "POST /orders");

        Ok(PlacedOrder {
            order_id: format!("ORD-{:04}", id),
            vendor_id: request.vendor_id.clone(),
            request_id: request.request_id,
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = MarketConfig::load().unwrap_or_else(|err| {
        warn!(error = %err, "Config file unusable, using environment and defaults");
        MarketConfig::from_env()
    });

    let store = CartStore::new();
    let badge = Rc::new(Cell::new(0_i64));
    {
        let reader = store.clone();
        let badge = Rc::clone(&badge);
        store.subscribe(move |_| badge.set(reader.total_quantity()));
    }

    for record in CATALOG {
        let entry = CartEntry::from_catalog_json(record).map_err(ApiError::from)?;
        store.add_to_cart(entry);
    }

    // Second tap on the biryani, then the user drops the rice
    if let Some(first) = CATALOG.first() {
        store.add_to_cart(CartEntry::from_catalog_json(first).map_err(ApiError::from)?);
    }
    store.update_quantity("s-201", 0);
    store.remove_from_cart("already-gone");

    let snapshot = store.snapshot();
    println!("Cart ({} units, badge {})", snapshot.totals.total_quantity, badge.get());
    for section in &snapshot.vendors {
        println!(
            "  {} - {}",
            section.vendor_name,
            config.format_currency(section.subtotal_cents)
        );
        for item in &section.items {
            println!(
                "    {} x{}  {}",
                item.name,
                item.quantity,
                config.format_currency(item.line_total().cents())
            );
        }
    }
    println!(
        "Total: {}",
        config.format_currency(snapshot.totals.total_amount_cents)
    );

    let gateway = LoggingGateway {
        next_id: Cell::new(1),
    };
    let receipt = checkout(&store, &config, &gateway).await?;

    println!(
        "Placed {} orders, charged {}",
        receipt.orders.len(),
        config.format_currency(receipt.summary.total_cents)
    );
    println!("{}", serde_json::to_string_pretty(&receipt)?);
    println!("Cart empty after checkout: {}", store.is_empty());

    Ok(())
}
