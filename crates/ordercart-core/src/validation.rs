//! # Validation Module
//!
//! Checks applied to merged settings and to restored orders.
//!
//! Merchant and catalog data are taken as given; only what the money
//! arithmetic depends on is checked here.

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{OrderSnapshot, OtherItemType};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Settings Validators
// =============================================================================

/// Validates a currency code.
///
/// ## Rules
/// - Must not be empty
/// - Exactly three ASCII uppercase letters (ISO 4217 shape)
///
/// ## Example
/// ```rust
/// use ordercart_core::validation::validate_currency_code;
///
/// assert!(validate_currency_code("USD").is_ok());
/// assert!(validate_currency_code("usd").is_err());
/// ```
pub fn validate_currency_code(code: &str) -> ValidationResult<()> {
    if code.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "currencyCode".to_string(),
        });
    }

    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::InvalidFormat {
            field: "currencyCode".to_string(),
            reason: "must be three uppercase letters".to_string(),
        });
    }

    Ok(())
}

/// Validates a tax percentage.
///
/// ## Rules
/// - Must be between 0 and 100 inclusive
pub fn validate_tax_percent(percent: Decimal) -> ValidationResult<()> {
    if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: "taxPercent".to_string(),
            min: "0".to_string(),
            max: "100".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Order Structure
// =============================================================================

/// Checks that a restored order can be driven by the totals engine.
///
/// ## Rules
/// - Exactly one `subtotal` and one `tax` entry, with matching ids
/// - Line item ids unique, quantities at least 1
/// - Every amount has nanos in range and uses `currency_code`
///
/// Amounts are not recomputed; an order whose totals disagree with its line
/// items is restored as-is.
pub fn validate_order_structure(order: &OrderSnapshot, currency_code: &str) -> CoreResult<()> {
    if order.id.trim().is_empty() {
        return Err(CoreError::malformed("order id is empty"));
    }

    for kind in [OtherItemType::Subtotal, OtherItemType::Tax] {
        let count = order
            .other_items
            .iter()
            .filter(|item| item.item_type == kind)
            .count();
        if count != 1 {
            return Err(CoreError::malformed(format!(
                "expected exactly one {} entry, found {count}",
                kind.id()
            )));
        }
    }

    for item in &order.other_items {
        if item.id != item.item_type.id() {
            return Err(CoreError::malformed(format!(
                "other item '{}' has type {:?}",
                item.id, item.item_type
            )));
        }
        check_amount(&item.price.amount, currency_code, &item.id)?;
    }

    let mut seen = HashSet::new();
    for item in &order.cart.line_items {
        if !seen.insert(item.id.as_str()) {
            return Err(CoreError::malformed(format!(
                "duplicate line item id '{}'",
                item.id
            )));
        }
        if item.quantity < 1 {
            return Err(CoreError::malformed(format!(
                "line item '{}' has quantity {}",
                item.id, item.quantity
            )));
        }
        check_amount(&item.price.amount, currency_code, &item.id)?;
    }

    check_amount(&order.total_price.amount, currency_code, "totalPrice")
}

fn check_amount(amount: &Money, currency_code: &str, field: &str) -> CoreResult<()> {
    if !amount.is_well_formed() {
        return Err(CoreError::malformed(format!(
            "{field} has nanos {} outside 0..1000000000",
            amount.nanos
        )));
    }

    if amount.currency_code != currency_code {
        return Err(CoreError::malformed(format!(
            "{field} is in {}, order currency is {currency_code}",
            amount.currency_code
        )));
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
