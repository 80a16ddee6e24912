//! # Order Settings
//!
//! Currency, tax percentage and display names for the derived lines.
//!
//! ## Merge Order
//! ```text
//! SettingsOverrides (caller, every field optional)
//!        │  key-wise, including inside `names`
//!        ▼
//! OrderSettings::default()  { USD, 21%, "Subtotal", "Tax" }
//!        │
//!        ▼
//! validated OrderSettings
//! ```
//!
//! Overriding only `names.tax` keeps the default `names.subtotal`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::validation::{validate_currency_code, validate_tax_percent};
use crate::{DEFAULT_CURRENCY_CODE, DEFAULT_TAX_PERCENT};

// =============================================================================
// Resolved Settings
// =============================================================================

/// Display names for the subtotal and tax lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemNames {
    pub subtotal: String,
    pub tax: String,
}

impl Default for ItemNames {
    fn default() -> Self {
        ItemNames {
            subtotal: "Subtotal".to_string(),
            tax: "Tax".to_string(),
        }
    }
}

/// Fully resolved settings of one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderSettings {
    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Tax as a percentage of the subtotal, e.g. 21 = 21%.
    #[ts(as = "String")]
    pub tax_percent: Decimal,

    pub names: ItemNames,
}

impl Default for OrderSettings {
    /// ## Default Values
    /// - Currency: USD
    /// - Tax: 21%
    /// - Names: "Subtotal", "Tax"
    fn default() -> Self {
        OrderSettings {
            currency_code: DEFAULT_CURRENCY_CODE.to_string(),
            tax_percent: Decimal::from(DEFAULT_TAX_PERCENT),
            names: ItemNames::default(),
        }
    }
}

impl OrderSettings {
    /// Applies `overrides` on top of the defaults and validates the result.
    pub fn resolve(overrides: SettingsOverrides) -> CoreResult<Self> {
        let settings = OrderSettings::default().merged(overrides);
        settings.validate()?;
        Ok(settings)
    }

    /// Key-wise merge; `None` keeps the current value.
    pub fn merged(mut self, overrides: SettingsOverrides) -> Self {
        if let Some(code) = overrides.currency_code {
            self.currency_code = code;
        }
        if let Some(percent) = overrides.tax_percent {
            self.tax_percent = percent;
        }
        if let Some(names) = overrides.names {
            if let Some(subtotal) = names.subtotal {
                self.names.subtotal = subtotal;
            }
            if let Some(tax) = names.tax {
                self.names.tax = tax;
            }
        }
        self
    }

    /// Checks currency code and tax range.
    pub fn validate(&self) -> CoreResult<()> {
        validate_currency_code(&self.currency_code)?;
        validate_tax_percent(self.tax_percent)?;
        Ok(())
    }
}

// =============================================================================
// Overrides
// =============================================================================

/// Partial display names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NameOverrides {
    pub subtotal: Option<String>,
    pub tax: Option<String>,
}

/// Caller-supplied settings; anything left out falls back to the default.
///
/// ## Example
/// ```rust
/// use ordercart_core::settings::{OrderSettings, SettingsOverrides};
///
/// let overrides: SettingsOverrides =
///     serde_json::from_str(r#"{ "taxPercent": 9, "names": { "tax": "BTW" } }"#).unwrap();
/// let settings = OrderSettings::resolve(overrides).unwrap();
/// assert_eq!(settings.names.tax, "BTW");
/// assert_eq!(settings.names.subtotal, "Subtotal");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsOverrides {
    pub currency_code: Option<String>,
    pub tax_percent: Option<Decimal>,
    pub names: Option<NameOverrides>,
}

impl SettingsOverrides {
    pub fn currency_code(mut self, code: impl Into<String>) -> Self {
        self.currency_code = Some(code.into());
        self
    }

    pub fn tax_percent(mut self, percent: Decimal) -> Self {
        self.tax_percent = Some(percent);
        self
    }

    pub fn subtotal_name(mut self, name: impl Into<String>) -> Self {
        self.names.get_or_insert_with(NameOverrides::default).subtotal = Some(name.into());
        self
    }

    pub fn tax_name(mut self, name: impl Into<String>) -> Self {
        self.names.get_or_insert_with(NameOverrides::default).tax = Some(name.into());
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
