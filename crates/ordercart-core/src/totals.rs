//! # Totals Engine
//!
//! Keeps subtotal, tax and grand total consistent.
//!
//! ## Flow
//! ```text
//! add_item / remove_item
//!        │  ±unit price (already normalized to nine digits)
//!        ▼
//! apply_delta ──► subtotal S += delta
//!        │
//!        ▼
//! recompute ──► tax   = round9(S × taxPercent / 100)
//!           └─► total = S + tax
//! ```
//!
//! All arithmetic is checked `Decimal` arithmetic. The tax is rounded to
//! nanos with [`NANOS_ROUNDING`](crate::money::NANOS_ROUNDING) before the
//! total is formed, so the stored total is always exactly the stored
//! subtotal plus the stored tax.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, Price};
use crate::settings::OrderSettings;
use crate::types::{OtherItem, OtherItemType};

// =============================================================================
// Order Totals
// =============================================================================

/// The derived part of an order: subtotal/tax entries and the grand total.
///
/// `other_items` is the single collection that appears both under `cart`
/// and at the top level of the serialized order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTotals {
    pub other_items: Vec<OtherItem>,
    pub total_price: Price,
}

impl OrderTotals {
    /// Zero subtotal, tax and total in the settings' currency.
    pub fn zeroed(settings: &OrderSettings) -> Self {
        let zero = Money::zero(&settings.currency_code);

        OrderTotals {
            other_items: vec![
                OtherItem {
                    id: OtherItemType::Subtotal.id().to_string(),
                    name: settings.names.subtotal.clone(),
                    price: Price::estimate(zero.clone()),
                    item_type: OtherItemType::Subtotal,
                },
                OtherItem {
                    id: OtherItemType::Tax.id().to_string(),
                    name: settings.names.tax.clone(),
                    price: Price::estimate(zero.clone()),
                    item_type: OtherItemType::Tax,
                },
            ],
            total_price: Price::actual(zero),
        }
    }

    /// Current subtotal.
    pub fn subtotal(&self) -> CoreResult<Decimal> {
        Ok(self.entry(OtherItemType::Subtotal)?.price.amount.to_decimal())
    }

    /// Current tax.
    pub fn tax(&self) -> CoreResult<Decimal> {
        Ok(self.entry(OtherItemType::Tax)?.price.amount.to_decimal())
    }

    /// Current grand total.
    pub fn total(&self) -> Decimal {
        self.total_price.amount.to_decimal()
    }

    fn entry(&self, kind: OtherItemType) -> CoreResult<&OtherItem> {
        self.other_items
            .iter()
            .find(|item| item.item_type == kind)
            .ok_or_else(|| CoreError::malformed(format!("missing {} entry", kind.id())))
    }

    fn entry_mut(&mut self, kind: OtherItemType) -> CoreResult<&mut OtherItem> {
        self.other_items
            .iter_mut()
            .find(|item| item.item_type == kind)
            .ok_or_else(|| CoreError::malformed(format!("missing {} entry", kind.id())))
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Applies subtotal deltas and derives tax and total from settings.
#[derive(Debug, Clone, Copy)]
pub struct TotalsEngine<'a> {
    settings: &'a OrderSettings,
}

impl<'a> TotalsEngine<'a> {
    pub fn new(settings: &'a OrderSettings) -> Self {
        TotalsEngine { settings }
    }

    /// Adds `delta` to the subtotal, then recomputes tax and total.
    ///
    /// Either every field is updated or, on error, none is.
    pub fn apply_delta(&self, totals: &mut OrderTotals, delta: Decimal) -> CoreResult<()> {
        let mut staged = totals.clone();

        let subtotal = staged
            .subtotal()?
            .checked_add(delta)
            .ok_or_else(|| CoreError::out_of_range("subtotal"))?;
        staged.entry_mut(OtherItemType::Subtotal)?.price.amount =
            Money::from_decimal(subtotal, &self.settings.currency_code)?;

        self.recompute(&mut staged)?;
        *totals = staged;
        Ok(())
    }

    /// Rewrites tax and total from the current subtotal.
    ///
    /// Idempotent: a second call with no delta in between stores the same
    /// values.
    pub fn recompute(&self, totals: &mut OrderTotals) -> CoreResult<()> {
        let code = &self.settings.currency_code;
        let subtotal = totals.subtotal()?;

        let tax = subtotal
            .checked_mul(self.settings.tax_percent)
            .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
            .ok_or_else(|| CoreError::out_of_range("tax"))?;
        let tax = Money::from_decimal(tax, code)?;

        let total = subtotal
            .checked_add(tax.to_decimal())
            .ok_or_else(|| CoreError::out_of_range("total"))?;
        let total = Money::from_decimal(total, code)?;

        debug!(subtotal = %subtotal, tax = %tax, total = %total, "Recomputed totals");

        totals.entry_mut(OtherItemType::Tax)?.price.amount = tax;
        totals.total_price.amount = total;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingsOverrides;
    use rust_decimal_macros::dec;

    fn settings(tax_percent: Decimal) -> OrderSettings {
        OrderSettings::resolve(SettingsOverrides::default().tax_percent(tax_percent)).unwrap()
    }

    #[test]
    fn test_zeroed_totals() {
        let totals = OrderTotals::zeroed(&OrderSettings::default());
        assert_eq!(totals.subtotal().unwrap(), dec!(0));
        assert_eq!(totals.tax().unwrap(), dec!(0));
        assert_eq!(totals.total(), dec!(0));
        assert_eq!(totals.other_items[0].name, "Subtotal");
        assert_eq!(totals.other_items[1].name, "Tax");
    }

    #[test]
    fn test_apply_delta_computes_tax_and_total() {
        let settings = OrderSettings::default();
        let engine = TotalsEngine::new(&settings);
        let mut totals = OrderTotals::zeroed(&settings);

        engine.apply_delta(&mut totals, dec!(10.00)).unwrap();

        assert_eq!(totals.subtotal().unwrap(), dec!(10));
        assert_eq!(totals.tax().unwrap(), dec!(2.1));
        assert_eq!(totals.total(), dec!(12.1));
        assert_eq!(totals.total_price.amount.units, 12);
        assert_eq!(totals.total_price.amount.nanos, 100_000_000);
    }

    #[test]
    fn test_many_small_deltas_do_not_drift() {
        let settings = settings(dec!(0));
        let engine = TotalsEngine::new(&settings);
        let mut totals = OrderTotals::zeroed(&settings);

        for _ in 0..1000 {
            engine.apply_delta(&mut totals, dec!(0.1)).unwrap();
        }

        assert_eq!(totals.subtotal().unwrap(), dec!(100));
        assert_eq!(totals.total(), dec!(100));
    }

    #[test]
    fn test_tax_rounding_at_nanos_boundary() {
        // 0.000000005 × 21% = 0.00000000105 → 0.000000001
        let settings = OrderSettings::default();
        let engine = TotalsEngine::new(&settings);
        let mut totals = OrderTotals::zeroed(&settings);

        engine.apply_delta(&mut totals, dec!(0.000000005)).unwrap();

        assert_eq!(totals.tax().unwrap(), dec!(0.000000001));
        assert_eq!(
            totals.total(),
            totals.subtotal().unwrap() + totals.tax().unwrap()
        );
    }

    #[test]
    fn test_tax_consistency_across_percentages() {
        for percent in [dec!(0), dec!(8.25), dec!(21), dec!(33.333), dec!(100)] {
            let settings = settings(percent);
            let engine = TotalsEngine::new(&settings);
            let mut totals = OrderTotals::zeroed(&settings);

            for delta in [dec!(19.99), dec!(0.01), dec!(3.333333333), dec!(-0.01)] {
                engine.apply_delta(&mut totals, delta).unwrap();
                let subtotal = totals.subtotal().unwrap();
                let tax = totals.tax().unwrap();
                assert_eq!(totals.total(), subtotal + tax, "at {percent}%");
                assert_eq!(
                    tax,
                    (subtotal * percent / dec!(100))
                        .round_dp_with_strategy(9, crate::money::NANOS_ROUNDING)
                );
            }
        }
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let settings = OrderSettings::default();
        let engine = TotalsEngine::new(&settings);
        let mut totals = OrderTotals::zeroed(&settings);
        engine.apply_delta(&mut totals, dec!(7.77)).unwrap();

        let before = totals.clone();
        engine.recompute(&mut totals).unwrap();
        engine.recompute(&mut totals).unwrap();
        assert_eq!(totals, before);
    }

    #[test]
    fn test_missing_subtotal_leaves_totals_untouched() {
        let settings = OrderSettings::default();
        let engine = TotalsEngine::new(&settings);
        let mut totals = OrderTotals::zeroed(&settings);
        totals
            .other_items
            .retain(|item| item.item_type != OtherItemType::Subtotal);

        let before = totals.clone();
        let err = engine.apply_delta(&mut totals, dec!(1)).unwrap_err();
        assert!(matches!(err, CoreError::MalformedOrder { .. }));
        assert_eq!(totals, before);
    }
}
