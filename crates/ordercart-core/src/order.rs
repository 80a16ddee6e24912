//! # Order Aggregate
//!
//! Owns one order for the duration of a caller's session.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Operations                                     │
//! │                                                                         │
//! │  Caller                   Order                     Totals              │
//! │  ──────                   ─────                     ──────              │
//! │                                                                         │
//! │  add_item(id, ..) ──────► new id?  push qty=1 ────► apply_delta(+price) │
//! │                           known id? qty += 1 ────► apply_delta(+price)  │
//! │                                                                         │
//! │  remove_item(id) ───────► qty > 1?  qty -= 1 ─────► apply_delta(-unit)  │
//! │                           qty == 1? drop line ────► apply_delta(-unit)  │
//! │                           unknown?  log, no-op                          │
//! │                                                                         │
//! │  get() ─────────────────► owned OrderSnapshot (read only)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! An `Order` is mutated through `&mut self` only; there is no internal
//! locking. Share one across threads by wrapping it in a `Mutex` at the
//! call site, or better, keep one order per session.
//!
//! ## Repeated Ids
//! Adding an id that is already in the cart bumps its quantity and adds the
//! price passed *now* to the subtotal. The stored unit price of the line is
//! left as it was, and later removals subtract that stored unit price.

use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, Price, PriceInput};
use crate::settings::{OrderSettings, SettingsOverrides};
use crate::totals::{OrderTotals, TotalsEngine};
use crate::types::{CartSnapshot, LineItem, LineItemType, Merchant, OrderSnapshot, SubLine};
use crate::validation::validate_order_structure;

/// An order under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    settings: OrderSettings,
    id: String,
    merchant: Merchant,
    line_items: Vec<LineItem>,
    notes: String,
    totals: OrderTotals,
}

impl Order {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Creates a fresh order with a new id and zero totals.
    ///
    /// ## Errors
    /// `CoreError::Validation` if the merged settings are invalid.
    pub fn new(overrides: SettingsOverrides) -> CoreResult<Self> {
        Ok(Self::fresh(OrderSettings::resolve(overrides)?))
    }

    /// Creates a fresh order with the default settings (USD, 21% tax).
    pub fn with_defaults() -> Self {
        Self::fresh(OrderSettings::default())
    }

    fn fresh(settings: OrderSettings) -> Self {
        let id = Uuid::new_v4().simple().to_string();
        info!(order_id = %id, currency = %settings.currency_code, "Constructing fresh order");

        Order {
            totals: OrderTotals::zeroed(&settings),
            settings,
            id,
            merchant: Merchant::default(),
            line_items: Vec::new(),
            notes: String::new(),
        }
    }

    /// Wraps a previously serialized order without recomputing anything.
    ///
    /// The top-level `otherItems` is authoritative; `cart.otherItems` is only
    /// read when the top-level list is empty.
    ///
    /// ## Errors
    /// - `CoreError::Validation` for invalid settings
    /// - `CoreError::MalformedOrder` if the subtotal/tax entries are missing
    ///   or duplicated, line item ids repeat, a quantity is below 1, an
    ///   amount has nanos out of range, or a currency differs from the
    ///   settings' currency
    pub fn restore(overrides: SettingsOverrides, snapshot: OrderSnapshot) -> CoreResult<Self> {
        let settings = OrderSettings::resolve(overrides)?;

        let OrderSnapshot {
            id,
            cart,
            mut other_items,
            total_price,
        } = snapshot;
        if other_items.is_empty() {
            other_items = cart.other_items;
        }

        let order = Order {
            settings,
            id,
            merchant: cart.merchant,
            line_items: cart.line_items,
            notes: cart.notes,
            totals: OrderTotals {
                other_items,
                total_price,
            },
        };
        validate_order_structure(&order.get(), &order.settings.currency_code)?;

        info!(
            order_id = %order.id,
            line_items = order.line_items.len(),
            "Restoring order"
        );
        Ok(order)
    }

    /// [`Order::restore`] from the JSON produced by [`Order::to_json`].
    pub fn restore_json(overrides: SettingsOverrides, json: &str) -> CoreResult<Self> {
        let snapshot: OrderSnapshot = serde_json::from_str(json)
            .map_err(|err| CoreError::malformed(format!("invalid order JSON: {err}")))?;
        Self::restore(overrides, snapshot)
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Returns an owned snapshot in wire shape.
    ///
    /// The subtotal/tax list is written both under `cart` and at the top
    /// level.
    pub fn get(&self) -> OrderSnapshot {
        OrderSnapshot {
            id: self.id.clone(),
            cart: CartSnapshot {
                merchant: self.merchant.clone(),
                line_items: self.line_items.clone(),
                notes: self.notes.clone(),
                other_items: self.totals.other_items.clone(),
            },
            other_items: self.totals.other_items.clone(),
            total_price: self.totals.total_price.clone(),
        }
    }

    /// Serializes [`Order::get`] to JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(&self.get())?)
    }

    pub fn order_id(&self) -> &str {
        &self.id
    }

    pub fn settings(&self) -> &OrderSettings {
        &self.settings
    }

    pub fn merchant(&self) -> &Merchant {
        &self.merchant
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    pub fn line_item(&self, id: &str) -> Option<&LineItem> {
        self.line_items.iter().find(|item| item.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    pub fn subtotal(&self) -> CoreResult<Decimal> {
        self.totals.subtotal()
    }

    pub fn tax(&self) -> CoreResult<Decimal> {
        self.totals.tax()
    }

    pub fn total(&self) -> Decimal {
        self.totals.total()
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Replaces the merchant. Totals are not touched.
    pub fn set_merchant(&mut self, id: impl Into<String>, name: impl Into<String>) -> &mut Self {
        self.merchant = Merchant {
            id: id.into(),
            name: name.into(),
        };
        self
    }

    /// Replaces the cart-level notes.
    pub fn set_notes(&mut self, notes: impl Into<String>) -> &mut Self {
        self.notes = notes.into();
        self
    }

    /// Adds one unit of `id` with an empty note.
    ///
    /// ## Example
    /// ```rust
    /// use ordercart_core::Order;
    ///
    /// let mut order = Order::with_defaults();
    /// order.add_item("a", "Widget", "10.00").unwrap();
    ///
    /// let snapshot = order.get();
    /// assert_eq!(snapshot.total_price.amount.units, 12);
    /// assert_eq!(snapshot.total_price.amount.nanos, 100_000_000);
    /// ```
    pub fn add_item<P: PriceInput>(
        &mut self,
        id: &str,
        name: &str,
        price: P,
    ) -> CoreResult<&mut Self> {
        self.add_item_with_notes(id, name, price, "")
    }

    /// Adds one unit of `id`.
    ///
    /// A new id becomes a line with quantity 1, `price` as unit price and
    /// `notes` as its single sub-line. A known id gets `quantity += 1`; its
    /// name, notes and unit price stay as first added. Either way `price` is
    /// added to the subtotal.
    ///
    /// ## Errors
    /// - `CoreError::InvalidPrice` if `price` is not a finite decimal
    /// - `CoreError::AmountOutOfRange` on overflow
    ///
    /// The order is unchanged when an error is returned.
    pub fn add_item_with_notes<P: PriceInput>(
        &mut self,
        id: &str,
        name: &str,
        price: P,
        notes: &str,
    ) -> CoreResult<&mut Self> {
        let amount = Money::from_decimal(price.to_price_decimal()?, &self.settings.currency_code)?;
        let delta = amount.to_decimal();

        let position = self.line_items.iter().position(|item| item.id == id);
        let quantity = match position {
            Some(index) => self.line_items[index]
                .quantity
                .checked_add(1)
                .ok_or_else(|| CoreError::out_of_range("quantity"))?,
            None => 1,
        };

        TotalsEngine::new(&self.settings).apply_delta(&mut self.totals, delta)?;

        match position {
            Some(index) => self.line_items[index].quantity = quantity,
            None => self.line_items.push(LineItem {
                id: id.to_string(),
                name: name.to_string(),
                price: Price::actual(amount),
                quantity,
                sub_lines: vec![SubLine {
                    note: notes.to_string(),
                }],
                item_type: LineItemType::Regular,
            }),
        }

        debug!(order_id = %self.id, item_id = %id, price = %delta, quantity, "Added item");
        Ok(self)
    }

    /// Removes one unit of `id`, subtracting its stored unit price.
    ///
    /// Removing an id that is not in the cart is a logged no-op.
    pub fn remove_item(&mut self, id: &str) -> CoreResult<&mut Self> {
        let Some(index) = self.line_items.iter().position(|item| item.id == id) else {
            info!(order_id = %self.id, item_id = %id, "Could not find the item to remove");
            return Ok(self);
        };

        let unit_price = self.line_items[index].price.amount.to_decimal();
        TotalsEngine::new(&self.settings).apply_delta(&mut self.totals, -unit_price)?;

        let quantity = self.line_items[index].quantity - 1;
        if quantity < 1 {
            self.line_items.remove(index);
        } else {
            self.line_items[index].quantity = quantity;
        }

        debug!(order_id = %self.id, item_id = %id, quantity, "Removed item");
        Ok(self)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
