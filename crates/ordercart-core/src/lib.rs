//! # ordercart-core: Order Aggregate for the Order API
//!
//! Builds and incrementally mutates an order (cart of line items, merchant,
//! subtotal, tax, total) in the shape an external order-processing API
//! expects, with money as `{ currencyCode, units, nanos }`.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ordercart-core                                   │
//! │                                                                         │
//! │   caller ──► order::Order ──► money (codec) ──► totals::TotalsEngine    │
//! │                  │                                     │                │
//! │                  └──────── get() ◄─────────────────────┘                │
//! │                         OrderSnapshot (wire shape, owned)               │
//! │                                                                         │
//! │   NO I/O • NO NETWORK • NO FLOATS IN MONEY MATH                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - units/nanos codec, `Money`, `Price`, `PriceInput`
//! - [`totals`] - subtotal delta, tax and total recomputation
//! - [`order`] - the `Order` aggregate
//! - [`settings`] - defaults and key-wise overrides
//! - [`types`] - wire types (`OrderSnapshot`, `LineItem`, ...)
//! - [`validation`] - settings and restore checks
//! - [`error`] - domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use ordercart_core::{Order, SettingsOverrides};
//! use rust_decimal::Decimal;
//!
//! let mut order = Order::new(SettingsOverrides::default()).unwrap();
//! order.set_merchant("m-1", "Corner Shop");
//! order.add_item("a", "Widget", "10.00").unwrap();
//! order.add_item("a", "Widget", "5.00").unwrap();
//!
//! // 15.00 subtotal at the default 21% tax
//! assert_eq!(order.total(), Decimal::new(1815, 2));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod order;
pub mod settings;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Price, PriceInput, PriceType};
pub use order::Order;
pub use settings::{ItemNames, OrderSettings, SettingsOverrides};
pub use totals::{OrderTotals, TotalsEngine};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency used when the caller does not set one.
pub const DEFAULT_CURRENCY_CODE: &str = "USD";

/// Tax percentage used when the caller does not set one.
pub const DEFAULT_TAX_PERCENT: u32 = 21;
