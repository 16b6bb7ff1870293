//! # Input Documents
//!
//! JSON documents read by the commands:
//!
//! ```text
//! settings.json                         cart.json
//! ─────────────────────────────         ─────────────────────────────────
//! {                                     {
//!   "prices_include_taxes": false,        "country": "DE",
//!   "taxes": [                            "currency": "EUR",
//!     { "percentage": 7,                  "coupon": { "code": "BOOKS10",
//!       "product_types": ["book"],                    "percentage": 10 },
//!       "countries": ["DE"] },            "items": [
//!     { "percentage": 19 }                  { "sku": "B-1", "product_type": "book",
//!   ]                                         "price": 1999, "quantity": 2 }
//! }                                       ]
//!                                       }
//! ```

use std::path::Path;

use checkout_core::validation::{validate_cart_size, validate_country, validate_currency};
use checkout_core::{CoreResult, CouponCode, LineItem, Settings};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, CliResult};

/// A cart as submitted for pricing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartDocument {
    /// Buyer country. Falls back to `--country`, then configuration.
    #[serde(default)]
    pub country: Option<String>,

    /// Order currency. Falls back to `--currency`, then configuration.
    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub coupon: Option<CouponCode>,

    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl CartDocument {
    /// Validates every part of the cart.
    ///
    /// Checks run in document order, so the first error names the first
    /// offending field.
    pub fn validate(&self) -> CoreResult<()> {
        if let Some(country) = &self.country {
            validate_country(country)?;
        }
        if let Some(currency) = &self.currency {
            validate_currency(currency)?;
        }
        if let Some(coupon) = &self.coupon {
            coupon.validate()?;
        }

        validate_cart_size(self.items.len())?;
        for (index, item) in self.items.iter().enumerate() {
            item.validate(index)?;
        }
        Ok(())
    }
}

/// Reads merchant settings from a JSON file.
pub fn load_settings(path: &Path) -> CliResult<Settings> {
    let settings: Settings = read_json(path)?;
    debug!(?path, rules = settings.taxes.len(), "Loaded settings");
    Ok(settings)
}

/// Reads a cart from a JSON file.
pub fn load_cart(path: &Path) -> CliResult<CartDocument> {
    let cart: CartDocument = read_json(path)?;
    debug!(?path, items = cart.items.len(), "Loaded cart");
    Ok(cart)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_core::{CoreError, Money, Percentage};
    use std::io::Write;

    fn write_json(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_settings() {
        let file = write_json(
            r#"{
                "prices_include_taxes": true,
                "taxes": [
                    { "percentage": 7, "product_types": ["book"], "countries": ["DE"] },
                    { "percentage": 19 }
                ]
            }"#,
        );

        let settings = load_settings(file.path()).unwrap();
        assert!(settings.prices_include_taxes);
        assert_eq!(settings.taxes.len(), 2);
        assert_eq!(settings.taxes[1].percentage, Percentage::new(19));
        assert!(settings.taxes[1].countries.is_empty());
    }

    #[test]
    fn test_load_cart() {
        let file = write_json(
            r#"{
                "country": "DE",
                "coupon": { "code": "BOOKS10", "percentage": 10, "product_types": ["book"] },
                "items": [
                    { "sku": "B-1", "product_type": "book", "price": 1999, "quantity": 2 },
                    { "sku": "K-1", "product_type": "kit", "price": 3000,
                      "price_items": [{ "product_type": "book", "amount": 2005 }] }
                ]
            }"#,
        );

        let cart = load_cart(file.path()).unwrap();
        assert_eq!(cart.country.as_deref(), Some("DE"));
        assert_eq!(cart.currency, None);
        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(cart.items[1].quantity, 1);
        assert_eq!(cart.items[1].price_items[0].amount, Money::from_cents(2005));
        assert_eq!(cart.coupon.unwrap().percentage, Percentage::new(10));
    }

    #[test]
    fn test_missing_file() {
        let err = load_settings(Path::new("/nonexistent/settings.json")).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let file = write_json(r#"{ "taxes": [ { "percentage": "seven" } ] }"#);
        let err = load_settings(file.path()).unwrap_err();
        assert!(matches!(err, CliError::Parse { .. }));
    }

    #[test]
    fn test_cart_validation_reports_first_bad_item() {
        let cart = CartDocument {
            items: vec![
                LineItem::new("OK-1", "book", Money::from_cents(100)),
                LineItem::new("BAD-1", "book", Money::from_cents(100)).with_quantity(0),
            ],
            ..CartDocument::default()
        };

        let err = cart.validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidLineItem { index: 1, .. }));
    }

    #[test]
    fn test_cart_validation_checks_currency() {
        let cart = CartDocument {
            currency: Some("eur".to_string()),
            ..CartDocument::default()
        };
        assert!(cart.validate().is_err());
    }
}
