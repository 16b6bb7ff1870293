//! # Domain Types
//!
//! Value types produced and consumed by the pricing engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   OrderPrice    │   │    ItemPrice    │   │   Diagnostic    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  items ─────────┼──►│  quantity       │   │  NoSettings     │       │
//! │  │  subtotal       │   │  subtotal       │   │  NoTaxRule      │       │
//! │  │  discount       │   │  discount       │   │  DiscountCapped │       │
//! │  │  taxes          │   │  taxes          │   │  AmountSaturated│       │
//! │  │  total          │   │  total          │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │   Percentage    │   │     TaxMode     │                              │
//! │  │  ─────────────  │   │  ─────────────  │                              │
//! │  │  whole percent  │   │  Exclusive      │                              │
//! │  │  20 = 20%       │   │  Inclusive      │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Unit vs. Order Amounts
//! `ItemPrice` amounts are for ONE unit of the line. `OrderPrice` amounts are
//! already multiplied by each line's quantity.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Percentage
// =============================================================================

/// A whole-number percentage (20 = 20%).
///
/// Tax rules, fixed VAT overrides and coupon discounts are all configured in
/// whole percents. Serialized as a bare number.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Percentage(u64);

impl Percentage {
    #[inline]
    pub const fn new(percent: u64) -> Self {
        Percentage(percent)
    }

    /// Returns the percentage as a whole number.
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Percentage(0)
    }

    /// Checks if the percentage is zero ("not set" for fixed VAT).
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// =============================================================================
// Tax Mode
// =============================================================================

/// How listed prices relate to tax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxMode {
    /// Price + tax shown separately (USA model).
    #[default]
    Exclusive,
    /// Price includes tax (EU/UK model).
    Inclusive,
}

impl TaxMode {
    /// Maps the `prices_include_taxes` flag of the merchant settings.
    #[inline]
    pub const fn from_prices_include_taxes(include: bool) -> Self {
        if include {
            TaxMode::Inclusive
        } else {
            TaxMode::Exclusive
        }
    }

    #[inline]
    pub const fn is_inclusive(&self) -> bool {
        matches!(self, TaxMode::Inclusive)
    }
}

// =============================================================================
// Item Price
// =============================================================================

/// Price breakdown of ONE unit of a line item.
///
/// ## Invariant
/// `total == subtotal - discount + taxes`, always. The calculator is the only
/// producer of this type and never builds it any other way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemPrice {
    /// Units of this line in the order.
    pub quantity: u64,

    /// Unit price before tax (tax backed out in inclusive mode).
    pub subtotal: Money,

    /// Coupon discount for one unit.
    pub discount: Money,

    /// Tax for one unit.
    pub taxes: Money,

    /// `subtotal - discount + taxes` for one unit.
    pub total: Money,
}

impl ItemPrice {
    /// Unit total multiplied by the quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.total * self.quantity
    }
}

// =============================================================================
// Order Price
// =============================================================================

/// Price breakdown of a whole order.
///
/// `items` keeps the input order. `subtotal`, `discount` and `taxes` are the
/// quantity-weighted sums of the item fields; `total` is recomputed from
/// those three rather than summed from the item totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderPrice {
    pub items: Vec<ItemPrice>,
    pub subtotal: Money,
    pub discount: Money,
    pub taxes: Money,
    pub total: Money,
}

// =============================================================================
// Diagnostics
// =============================================================================

/// A non-fatal observation made while pricing an order.
///
/// Pricing never fails; incomplete configuration degrades to "no tax" or
/// "no discount". Diagnostics make those silent fallbacks visible without
/// changing any amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// No merchant settings were supplied; nothing was taxed.
    NoSettings,

    /// No tax rule matched this product type, so it was taxed at 0%.
    /// For a composite line, `product_type` is the sub-item's type.
    NoTaxRule { item: usize, product_type: String },

    /// The coupon asked for more than the line is worth; the discount was
    /// limited to `subtotal + taxes`.
    DiscountCapped {
        item: usize,
        requested: Money,
        applied: Money,
    },

    /// A quantity-weighted amount exceeded the money range and saturated.
    AmountSaturated { item: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NoSettings => write!(f, "no tax settings supplied, nothing taxed"),
            Diagnostic::NoTaxRule { item, product_type } => {
                write!(f, "item {item}: no tax rule for product type '{product_type}'")
            }
            Diagnostic::DiscountCapped {
                item,
                requested,
                applied,
            } => write!(
                f,
                "item {item}: discount {requested} exceeds line value, capped at {applied}"
            ),
            Diagnostic::AmountSaturated { item } => {
                write!(f, "item {item}: order amount saturated")
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        let pct = Percentage::new(19);
        assert_eq!(pct.value(), 19);
        assert!(!pct.is_zero());
        assert!(Percentage::default().is_zero());
        assert_eq!(pct.to_string(), "19%");
    }

    #[test]
    fn test_percentage_serializes_as_number() {
        let json = serde_json::to_string(&Percentage::new(7)).unwrap();
        assert_eq!(json, "7");
        let parsed: Percentage = serde_json::from_str("21").unwrap();
        assert_eq!(parsed, Percentage::new(21));
    }

    #[test]
    fn test_tax_mode_default() {
        assert_eq!(TaxMode::default(), TaxMode::Exclusive);
        assert!(TaxMode::from_prices_include_taxes(true).is_inclusive());
        assert!(!TaxMode::from_prices_include_taxes(false).is_inclusive());
    }

    #[test]
    fn test_line_total() {
        let price = ItemPrice {
            quantity: 3,
            subtotal: Money::from_cents(1000),
            discount: Money::from_cents(100),
            taxes: Money::from_cents(200),
            total: Money::from_cents(1100),
        };
        assert_eq!(price.line_total().cents(), 3300);
    }

    #[test]
    fn test_diagnostic_serialization() {
        let diagnostic = Diagnostic::NoTaxRule {
            item: 2,
            product_type: "ebook".to_string(),
        };
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["kind"], "no_tax_rule");
        assert_eq!(json["item"], 2);
        assert_eq!(diagnostic.to_string(), "item 2: no tax rule for product type 'ebook'");
    }
}
