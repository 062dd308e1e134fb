//! # Domain Types
//!
//! Core domain types used by the cart and every screen that reads it.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CatalogItem    │   │   CartEntry     │   │  CartLineItem   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  raw API JSON   │──►│  validated      │──►│  entry fields   │       │
//! │  │  price: f64     │   │  price: Money   │   │  + quantity     │       │
//! │  │  aliases (_id)  │   │  vendor_id      │   │  + added_at     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │   EntityType    │  restaurant | shop | pharmacy | other            │
//! │  └─────────────────┘  display/routing only, never cart logic           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{
    normalize_optional, validate_display_name, validate_item_id, validate_price,
    validate_vendor_id, ValidationResult,
};

// =============================================================================
// Entity Type
// =============================================================================

/// The kind of vendor an item comes from.
///
/// Screens use it to pick a detail route and an icon. Unknown tags from the
/// backend are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityType {
    Restaurant,
    Shop,
    Pharmacy,
    Other(String),
}

impl EntityType {
    pub fn as_str(&self) -> &str {
        match self {
            EntityType::Restaurant => "restaurant",
            EntityType::Shop => "shop",
            EntityType::Pharmacy => "pharmacy",
            EntityType::Other(tag) => tag,
        }
    }
}

impl From<String> for EntityType {
    fn from(tag: String) -> Self {
        match tag.to_lowercase().as_str() {
            "restaurant" => EntityType::Restaurant,
            "shop" | "store" => EntityType::Shop,
            "pharmacy" => EntityType::Pharmacy,
            _ => EntityType::Other(tag),
        }
    }
}

impl From<EntityType> for String {
    fn from(entity_type: EntityType) -> Self {
        entity_type.as_str().to_string()
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Catalog Item (wire shape)
// =============================================================================

/// A menu item, product or medicine as the catalog API returns it.
///
/// ## Field Aliases
/// Restaurant, shop and pharmacy endpoints name the owner differently, and
/// records keep their database key in `_id`. All of them land here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    #[serde(alias = "_id")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Unit price in major units, exactly as the API sent it.
    pub price: f64,

    #[serde(default, alias = "restaurantId", alias = "shopId", alias = "pharmacyId")]
    pub vendor_id: String,

    #[serde(
        default,
        alias = "restaurantName",
        alias = "shopName",
        alias = "pharmacyName"
    )]
    pub vendor_name: String,

    #[serde(default, alias = "image")]
    pub image_url: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub entity_type: Option<EntityType>,
}

// =============================================================================
// Cart Entry (addToCart input)
// =============================================================================

/// A validated request to put one unit of a catalog item in the cart.
///
/// Valid by construction: the only ways to build one are [`CartEntry::new`]
/// and [`CartEntry::from_catalog`], both of which validate.
#[derive(Debug, Clone, PartialEq)]
pub struct CartEntry {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) price: Money,
    pub(crate) vendor_id: String,
    pub(crate) vendor_name: String,
    pub(crate) image_url: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) entity_type: Option<EntityType>,
}

impl CartEntry {
    /// Creates an entry from already-typed values.
    ///
    /// ## Errors
    /// Returns a `ValidationError` for blank ids/names or a negative price.
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::{CartEntry, Money};
    ///
    /// let entry = CartEntry::new("m1", "Margherita", Money::from_cents(1000), "v1", "Luigi's")
    ///     .unwrap();
    /// assert_eq!(entry.id(), "m1");
    /// ```
    pub fn new(
        id: impl AsRef<str>,
        name: impl AsRef<str>,
        price: Money,
        vendor_id: impl AsRef<str>,
        vendor_name: impl AsRef<str>,
    ) -> ValidationResult<Self> {
        validate_price(price)?;

        Ok(CartEntry {
            id: validate_item_id(id.as_ref())?,
            name: validate_display_name("name", name.as_ref())?,
            price,
            vendor_id: validate_vendor_id(vendor_id.as_ref())?,
            vendor_name: validate_display_name("vendorName", vendor_name.as_ref())?,
            image_url: None,
            description: None,
            entity_type: None,
        })
    }

    /// Builds an entry from a catalog record.
    ///
    /// ## Errors
    /// - `CoreError::InvalidPrice` if the price is negative or not finite
    /// - `CoreError::Validation` for missing ids or names
    pub fn from_catalog(item: CatalogItem) -> CoreResult<Self> {
        let price = Money::try_from_major(item.price).map_err(|e| CoreError::InvalidPrice {
            item_id: item.id.clone(),
            reason: e.to_string(),
        })?;

        let entry = CartEntry::new(&item.id, &item.name, price, &item.vendor_id, &item.vendor_name)?
            .with_image_url(item.image_url)
            .with_description(item.description);

        Ok(match item.entity_type {
            Some(entity_type) => entry.with_entity_type(entity_type),
            None => entry,
        })
    }

    /// Parses a catalog record from a JSON body and builds an entry.
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::CartEntry;
    ///
    /// let json = r#"{"_id":"p9","name":"Paracetamol","price":3.5,
    ///                "pharmacyId":"ph1","pharmacyName":"City Pharmacy"}"#;
    /// let entry = CartEntry::from_catalog_json(json).unwrap();
    /// assert_eq!(entry.vendor_id(), "ph1");
    /// assert_eq!(entry.price().cents(), 350);
    /// ```
    pub fn from_catalog_json(json: &str) -> CoreResult<Self> {
        let item: CatalogItem = serde_json::from_str(json)?;
        Self::from_catalog(item)
    }

    pub fn with_image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = normalize_optional(image_url);
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = normalize_optional(description);
        self
    }

    pub fn with_entity_type(mut self, entity_type: EntityType) -> Self {
        self.entity_type = Some(entity_type);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn vendor_id(&self) -> &str {
        &self.vendor_id
    }

    pub fn vendor_name(&self) -> &str {
        &self.vendor_name
    }
}

impl TryFrom<CatalogItem> for CartEntry {
    type Error = CoreError;

    fn try_from(item: CatalogItem) -> Result<Self, Self::Error> {
        CartEntry::from_catalog(item)
    }
}

// =============================================================================
// Cart Line Item
// =============================================================================

/// One catalog item held in the cart at a quantity.
///
/// ## Snapshot Semantics
/// Descriptive fields are frozen when the item is first added. Adding the
/// same id again only bumps `quantity`, even if the catalog has since
/// changed the name or price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLineItem {
    /// Catalog item id; unique within a cart.
    pub id: String,

    pub name: String,

    /// Exact unit price, frozen at first add.
    pub price: Money,

    pub image_url: Option<String>,

    pub description: Option<String>,

    pub vendor_id: String,

    pub vendor_name: String,

    #[ts(as = "Option<String>")]
    pub entity_type: Option<EntityType>,

    /// Always at least 1 while the line is in a cart.
    pub quantity: i64,

    /// When this item was first added.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLineItem {
    pub(crate) fn from_entry(entry: CartEntry) -> Self {
        CartLineItem {
            id: entry.id,
            name: entry.name,
            price: entry.price,
            image_url: entry.image_url,
            description: entry.description,
            vendor_id: entry.vendor_id,
            vendor_name: entry.vendor_name,
            entity_type: entry.entity_type,
            quantity: 1,
            added_at: Utc::now(),
        }
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn test_entity_type_round_trips_known_and_unknown_tags() {
        assert_eq!(EntityType::from("Restaurant".to_string()), EntityType::Restaurant);
        assert_eq!(EntityType::from("store".to_string()), EntityType::Shop);
        assert_eq!(
            EntityType::from("grocery".to_string()),
            EntityType::Other("grocery".to_string())
        );

        let json = serde_json::to_string(&EntityType::Pharmacy).unwrap();
        assert_eq!(json, "\"pharmacy\"");
    }

    #[test]
    fn test_cart_entry_new_trims_and_validates() {
        let entry = CartEntry::new(" m1 ", " Pizza ", Money::from_cents(100), "v1", "Luigi").unwrap();
        assert_eq!(entry.id(), "m1");
        assert_eq!(entry.name(), "Pizza");

        assert!(CartEntry::new("m1", "Pizza", Money::from_cents(-1), "v1", "Luigi").is_err());
        assert!(CartEntry::new("m1", "Pizza", Money::zero(), "", "Luigi").is_err());
    }

    #[test]
    fn test_from_catalog_json_restaurant_menu_item() {
        let json = r#"{
            "_id": "m1",
            "name": "Chicken Karahi",
            "price": 12.9,
            "restaurantId": "r1",
            "restaurantName": "Karachi Grill",
            "image": "https://img.example/karahi.jpg",
            "description": "  ",
            "entityType": "restaurant"
        }"#;

        let entry = CartEntry::from_catalog_json(json).unwrap();
        assert_eq!(entry.id(), "m1");
        assert_eq!(entry.price().cents(), 1290);
        assert_eq!(entry.vendor_id(), "r1");
        assert_eq!(entry.vendor_name(), "Karachi Grill");
        assert_eq!(entry.image_url.as_deref(), Some("https://img.example/karahi.jpg"));
        assert_eq!(entry.description, None);
        assert_eq!(entry.entity_type, Some(EntityType::Restaurant));
    }

    #[test]
    fn test_from_catalog_rejects_missing_vendor() {
        let json = r#"{"id":"p1","name":"Soap","price":1.0}"#;
        let err = CartEntry::from_catalog_json(json).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Required { ref field }) if field == "vendorId"
        ));
    }

    #[test]
    fn test_from_catalog_rejects_negative_price() {
        let json = r#"{"id":"p1","name":"Soap","price":-2,"shopId":"s1","shopName":"Mart"}"#;
        let err = CartEntry::from_catalog_json(json).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPrice { ref item_id, .. } if item_id == "p1"));
    }

    #[test]
    fn test_from_catalog_rejects_malformed_json() {
        let err = CartEntry::from_catalog_json("{not json").unwrap_err();
        assert!(matches!(err, CoreError::Decode(_)));
    }

    #[test]
    fn test_line_item_starts_at_quantity_one() {
        let entry = CartEntry::new("m1", "Pizza", Money::from_cents(250), "v1", "Luigi").unwrap();
        let item = CartLineItem::from_entry(entry);
        assert_eq!(item.quantity, 1);
        assert_eq!(item.line_total().cents(), 250);
    }

    #[test]
    fn test_line_item_serializes_camel_case() {
        let entry = CartEntry::new("m1", "Pizza", Money::from_cents(250), "v1", "Luigi")
            .unwrap()
            .with_entity_type(EntityType::Restaurant);
        let item = CartLineItem::from_entry(entry);

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["vendorId"], "v1");
        assert_eq!(value["vendorName"], "Luigi");
        assert_eq!(value["entityType"], "restaurant");
        assert_eq!(value["price"], "2.50");
        assert_eq!(value["quantity"], 1);
    }
}
