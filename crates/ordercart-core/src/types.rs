//! # Wire Types
//!
//! The order shape consumed by the external order API.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  OrderSnapshot                                                          │
//! │  ├── id                                                                 │
//! │  ├── cart: CartSnapshot                                                 │
//! │  │   ├── merchant: Merchant { id, name }                                │
//! │  │   ├── lineItems: [LineItem]      price ACTUAL, type REGULAR          │
//! │  │   ├── notes                                                          │
//! │  │   └── otherItems: [OtherItem]  ◄─┐  same collection,                 │
//! │  ├── otherItems: [OtherItem]      ◄─┘  written twice                    │
//! │  └── totalPrice: Price              ACTUAL                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names and nesting are a compatibility contract; do not rename.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Price;

/// Id of the subtotal [`OtherItem`].
pub const SUBTOTAL_ID: &str = "subtotal";

/// Id of the tax [`OtherItem`].
pub const TAX_ID: &str = "tax";

// =============================================================================
// Merchant
// =============================================================================

/// The merchant the order is placed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Merchant {
    pub id: String,
    pub name: String,
}

impl Default for Merchant {
    /// Placeholder used until the caller sets a real merchant.
    fn default() -> Self {
        Merchant {
            id: "merchant_id".to_string(),
            name: "Merchant Name".to_string(),
        }
    }
}

// =============================================================================
// Line Items
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum LineItemType {
    #[default]
    Regular,
}

/// A free-text note attached to a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubLine {
    pub note: String,
}

/// One purchasable entry in the cart, keyed by `id`.
///
/// `price` is the unit price captured when the id was first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    pub id: String,
    pub name: String,
    pub price: Price,
    pub quantity: i64,
    pub sub_lines: Vec<SubLine>,
    #[serde(rename = "type")]
    pub item_type: LineItemType,
}

// =============================================================================
// Other Items
// =============================================================================

/// Kind of a derived cart entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum OtherItemType {
    Subtotal,
    Tax,
}

impl OtherItemType {
    /// The fixed id the order API expects for this kind.
    pub const fn id(&self) -> &'static str {
        match self {
            OtherItemType::Subtotal => SUBTOTAL_ID,
            OtherItemType::Tax => TAX_ID,
        }
    }
}

/// A derived, non-purchasable entry (subtotal or tax).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OtherItem {
    pub id: String,
    pub name: String,
    pub price: Price,
    #[serde(rename = "type")]
    pub item_type: OtherItemType,
}

// =============================================================================
// Order Snapshot
// =============================================================================

/// The cart section of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartSnapshot {
    pub merchant: Merchant,
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub other_items: Vec<OtherItem>,
}

/// An owned copy of a whole order, in wire shape.
///
/// Returned by [`crate::Order::get`] and accepted by
/// [`crate::Order::restore`]. Editing a snapshot never affects the order it
/// came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderSnapshot {
    pub id: String,
    pub cart: CartSnapshot,
    #[serde(default)]
    pub other_items: Vec<OtherItem>,
    pub total_price: Price,
}

// =============================================================================
// Unit Tests
// =============================================================================
