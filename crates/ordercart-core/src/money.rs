//! # Money Module
//!
//! The units/nanos money codec used by every price in an order.
//!
//! ## Why Units + Nanos?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing prices as binary floats:                                       │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  The order API instead takes an exact pair:                             │
//! │    { currencyCode: "USD", units: 12, nanos: 100000000 }  = 12.1 USD     │
//! │                                                                         │
//! │  OUR SOLUTION: every conversion and sum runs on a fixed-point           │
//! │  `Decimal`, and only the final split writes units/nanos.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Sign Convention
//! `nanos` is always in `0..=999_999_999` and `value == units + nanos / 1e9`
//! holds literally. Negative values are floored into `units`:
//!
//! | value   | units | nanos       |
//! |---------|-------|-------------|
//! | `5.25`  | `5`   | `250000000` |
//! | `-5.25` | `-6`  | `750000000` |
//! | `-0.5`  | `-1`  | `500000000` |
//!
//! ## Usage
//! ```rust
//! use ordercart_core::money::{Money, PriceInput};
//!
//! let price = "10.10".to_price_decimal().unwrap();
//! let amount = Money::from_decimal(price, "USD").unwrap();
//! assert_eq!((amount.units, amount.nanos), (10, 100_000_000));
//! assert_eq!(amount.to_decimal(), price);
//! ```

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

/// Number of nanos in one whole unit.
pub const NANOS_PER_UNIT: i64 = 1_000_000_000;

/// Fractional digits carried by the nanos field.
pub const NANOS_SCALE: u32 = 9;

/// Rounding applied when a value has more than nine fractional digits.
///
/// Round half to even, so repeated tax computations carry no bias.
pub const NANOS_ROUNDING: RoundingStrategy = RoundingStrategy::MidpointNearestEven;

// =============================================================================
// Money Type
// =============================================================================

/// An exact monetary amount: `units + nanos / 1e9` in `currency_code`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Money {
    /// ISO 4217 code, e.g. "USD".
    pub currency_code: String,

    /// Whole units. Carries the sign.
    pub units: i64,

    /// Billionths of a unit, always `0..=999_999_999`.
    pub nanos: i32,
}

impl Money {
    /// Zero in the given currency.
    pub fn zero(currency_code: &str) -> Self {
        Money {
            currency_code: currency_code.to_string(),
            units: 0,
            nanos: 0,
        }
    }

    /// Splits a decimal into units and nanos.
    ///
    /// Values with more than nine fractional digits are rounded with
    /// [`NANOS_ROUNDING`]. Anything representable with nine digits is
    /// split exactly.
    ///
    /// ## Example
    /// ```rust
    /// use ordercart_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let amount = Money::from_decimal(Decimal::new(-525, 2), "USD").unwrap();
    /// assert_eq!((amount.units, amount.nanos), (-6, 750_000_000));
    /// ```
    pub fn from_decimal(value: Decimal, currency_code: &str) -> CoreResult<Self> {
        let rounded = value.round_dp_with_strategy(NANOS_SCALE, NANOS_ROUNDING);
        let whole = rounded.floor();

        let units = whole
            .to_i64()
            .ok_or_else(|| CoreError::out_of_range("units"))?;

        // `rounded - whole` is in [0, 1) with at most nine digits, so the
        // scaled value is an exact integer below one billion.
        let nanos = (rounded - whole)
            .checked_mul(Decimal::from(NANOS_PER_UNIT))
            .and_then(|n| n.to_i32())
            .ok_or_else(|| CoreError::out_of_range("nanos"))?;

        Ok(Money {
            currency_code: currency_code.to_string(),
            units,
            nanos,
        })
    }

    /// Recombines units and nanos into a decimal.
    ///
    /// Exact inverse of [`Money::from_decimal`] for every value it produces.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::from(self.units) + Decimal::new(i64::from(self.nanos), NANOS_SCALE)
    }

    /// Checks that nanos is in range.
    pub fn is_well_formed(&self) -> bool {
        (0..NANOS_PER_UNIT).contains(&i64::from(self.nanos))
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.units == 0 && self.nanos == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.units < 0
    }
}

/// Shows the normalized decimal followed by the currency code.
///
/// For logs and debugging only.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_decimal().normalize(), self.currency_code)
    }
}

// =============================================================================
// Price
// =============================================================================

/// Whether a price is firm or an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum PriceType {
    /// Derived lines: subtotal and tax.
    Estimate,
    /// Line items and the grand total.
    Actual,
}

/// An amount tagged with its [`PriceType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Price {
    pub amount: Money,

    #[serde(rename = "type")]
    pub price_type: PriceType,
}

impl Price {
    pub fn estimate(amount: Money) -> Self {
        Price {
            amount,
            price_type: PriceType::Estimate,
        }
    }

    pub fn actual(amount: Money) -> Self {
        Price {
            amount,
            price_type: PriceType::Actual,
        }
    }
}

// =============================================================================
// Price Input
// =============================================================================

/// Anything a caller may pass as a price.
///
/// Conversion never goes through float arithmetic: floats are rendered as
/// their shortest round-trip decimal text first, so `10.1_f64` becomes
/// exactly `10.1`.
pub trait PriceInput {
    /// Converts the input to an exact decimal.
    fn to_price_decimal(&self) -> CoreResult<Decimal>;
}

impl PriceInput for Decimal {
    fn to_price_decimal(&self) -> CoreResult<Decimal> {
        Ok(*self)
    }
}

impl PriceInput for str {
    fn to_price_decimal(&self) -> CoreResult<Decimal> {
        let text = self.trim();
        if text.is_empty() {
            return Err(invalid_price(self, "empty input"));
        }

        Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .map_err(|err| invalid_price(self, &err.to_string()))
    }
}

impl PriceInput for String {
    fn to_price_decimal(&self) -> CoreResult<Decimal> {
        self.as_str().to_price_decimal()
    }
}

impl PriceInput for f64 {
    fn to_price_decimal(&self) -> CoreResult<Decimal> {
        if !self.is_finite() {
            return Err(invalid_price(&self.to_string(), "not a finite number"));
        }

        let text = self.to_string();
        Decimal::from_str(&text).map_err(|err| invalid_price(&text, &err.to_string()))
    }
}

impl PriceInput for f32 {
    fn to_price_decimal(&self) -> CoreResult<Decimal> {
        if !self.is_finite() {
            return Err(invalid_price(&self.to_string(), "not a finite number"));
        }

        let text = self.to_string();
        Decimal::from_str(&text).map_err(|err| invalid_price(&text, &err.to_string()))
    }
}

macro_rules! impl_integer_price_input {
    ($($t:ty),*) => {
        $(
            impl PriceInput for $t {
                fn to_price_decimal(&self) -> CoreResult<Decimal> {
                    Ok(Decimal::from(*self))
                }
            }
        )*
    };
}

impl_integer_price_input!(i32, i64, u32, u64);

impl<T: PriceInput + ?Sized> PriceInput for &T {
    fn to_price_decimal(&self) -> CoreResult<Decimal> {
        (**self).to_price_decimal()
    }
}

fn invalid_price(input: &str, reason: &str) -> CoreError {
    CoreError::InvalidPrice {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn split(value: Decimal) -> (i64, i32) {
        let money = Money::from_decimal(value, "USD").unwrap();
        (money.units, money.nanos)
    }

    #[test]
    fn test_from_decimal_positive() {
        assert_eq!(split(dec!(10.00)), (10, 0));
        assert_eq!(split(dec!(2.1)), (2, 100_000_000));
        assert_eq!(split(dec!(0.000000001)), (0, 1));
        assert_eq!(split(dec!(999.999999999)), (999, 999_999_999));
    }

    #[test]
    fn test_from_decimal_negative_floors_into_units() {
        assert_eq!(split(dec!(-5.25)), (-6, 750_000_000));
        assert_eq!(split(dec!(-0.5)), (-1, 500_000_000));
        assert_eq!(split(dec!(-10)), (-10, 0));

        let money = Money::from_decimal(dec!(-0.5), "USD").unwrap();
        assert!(money.is_negative());
        assert!(money.is_well_formed());
    }

    #[test]
    fn test_round_trip_is_exact() {
        for value in [
            dec!(0),
            dec!(10.00),
            dec!(0.1),
            dec!(19.99),
            dec!(-3.333333333),
            dec!(-0.000000001),
            dec!(123456789.123456789),
        ] {
            let money = Money::from_decimal(value, "EUR").unwrap();
            assert_eq!(money.to_decimal(), value, "round trip of {value}");
        }
    }

    #[test]
    fn test_excess_precision_rounds_half_to_even() {
        assert_eq!(split(dec!(0.0000000005)), (0, 0));
        assert_eq!(split(dec!(0.0000000015)), (0, 2));
        assert_eq!(split(dec!(1.2345678904)), (1, 234_567_890));
    }

    #[test]
    fn test_units_overflow_is_an_error() {
        let huge = Decimal::MAX;
        assert!(matches!(
            Money::from_decimal(huge, "USD"),
            Err(CoreError::AmountOutOfRange { .. })
        ));
    }

    #[test]
    fn test_display() {
        let money = Money::from_decimal(dec!(12.10), "USD").unwrap();
        assert_eq!(money.to_string(), "12.1 USD");

        let money = Money::from_decimal(dec!(-5.25), "USD").unwrap();
        assert_eq!(money.to_string(), "-5.25 USD");
    }

    #[test]
    fn test_wire_shape() {
        let price = Price::actual(Money::from_decimal(dec!(2.1), "USD").unwrap());
        let json = serde_json::to_value(&price).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "amount": { "currencyCode": "USD", "units": 2, "nanos": 100000000 },
                "type": "ACTUAL"
            })
        );
    }

    #[test]
    fn test_price_input_from_float_is_exact() {
        assert_eq!(10.1_f64.to_price_decimal().unwrap(), dec!(10.1));
        assert_eq!(0.1_f64.to_price_decimal().unwrap(), dec!(0.1));
        assert_eq!((-2.5_f64).to_price_decimal().unwrap(), dec!(-2.5));
    }

    #[test]
    fn test_price_input_from_text() {
        assert_eq!("10.00".to_price_decimal().unwrap(), dec!(10.00));
        assert_eq!(" 4.5 ".to_price_decimal().unwrap(), dec!(4.5));
        assert_eq!("1e2".to_price_decimal().unwrap(), dec!(100));
        assert_eq!(String::from("7").to_price_decimal().unwrap(), dec!(7));
    }

    #[test]
    fn test_price_input_rejects_garbage() {
        assert!(matches!(
            f64::NAN.to_price_decimal(),
            Err(CoreError::InvalidPrice { .. })
        ));
        assert!(f64::INFINITY.to_price_decimal().is_err());
        assert!("".to_price_decimal().is_err());
        assert!("ten dollars".to_price_decimal().is_err());
        assert!(1e300_f64.to_price_decimal().is_err());
    }
}
