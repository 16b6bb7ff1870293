//! # Item and Coupon Capabilities
//!
//! The calculator prices anything that can answer a few questions about
//! itself. Those questions are the [`Item`] and [`Coupon`] traits; any
//! order-line or coupon type implementing them is priced without engine
//! changes.
//!
//! ## Composite Items
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  LineItem "Book + E-Book bundle"  price 30.00  type "bundle"           │
//! │  ├── PriceComponent  type "book"   20.00  → taxed by the "book" rule   │
//! │  └── PriceComponent  type "ebook"  10.00  → taxed by the "ebook" rule  │
//! │                                                                         │
//! │  When an item has taxable sub-items, the sub-item prices are the tax   │
//! │  bases, each looked up and rounded on its own. The bundle's own type   │
//! │  is never used for a tax lookup (it still decides coupon eligibility). │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The concrete types here ([`LineItem`], [`PriceComponent`],
//! [`CouponCode`]) are the shapes used by the cart documents; callers with
//! their own order models implement the traits directly.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Percentage;
use crate::validation::{
    validate_coupon_percentage, validate_currency, validate_product_type, validate_quantity,
    validate_sku, ValidationResult,
};

// =============================================================================
// Capabilities
// =============================================================================

/// A priceable line of an order.
pub trait Item {
    /// Unit price in the smallest currency unit, as listed (tax included
    /// when the merchant's prices include taxes).
    fn price_in_lowest_unit(&self) -> Money;

    /// Product type, matched against tax rules and coupon filters.
    fn product_type(&self) -> &str;

    /// Fixed VAT override. Zero means "use the configured tax rules".
    fn fixed_vat(&self) -> Percentage {
        Percentage::zero()
    }

    /// Components taxed individually instead of the item itself.
    /// Empty for ordinary items.
    fn taxable_items(&self) -> Vec<&dyn Item> {
        Vec::new()
    }

    /// Units of this line in the order.
    fn quantity(&self) -> u64;
}

/// A discount coupon.
pub trait Coupon {
    /// Whether the coupon discounts items of this product type.
    fn applies_to_product_type(&self, product_type: &str) -> bool;

    /// Whether the coupon is valid for an order of `amount` in `currency`.
    ///
    /// Reserved for order-level eligibility checks; the calculator does not
    /// consult it.
    fn applies_to_price(&self, currency: &str, amount: Money) -> bool;

    /// Percentage taken off each eligible item.
    fn percentage_discount(&self) -> Percentage;

    /// Fixed amount off. Reserved; the calculator never applies it.
    fn fixed_discount(&self) -> Money;
}

impl<T: Item + ?Sized> Item for &T {
    fn price_in_lowest_unit(&self) -> Money {
        (**self).price_in_lowest_unit()
    }

    fn product_type(&self) -> &str {
        (**self).product_type()
    }

    fn fixed_vat(&self) -> Percentage {
        (**self).fixed_vat()
    }

    fn taxable_items(&self) -> Vec<&dyn Item> {
        (**self).taxable_items()
    }

    fn quantity(&self) -> u64 {
        (**self).quantity()
    }
}

impl<T: Item + ?Sized> Item for Box<T> {
    fn price_in_lowest_unit(&self) -> Money {
        (**self).price_in_lowest_unit()
    }

    fn product_type(&self) -> &str {
        (**self).product_type()
    }

    fn fixed_vat(&self) -> Percentage {
        (**self).fixed_vat()
    }

    fn taxable_items(&self) -> Vec<&dyn Item> {
        (**self).taxable_items()
    }

    fn quantity(&self) -> u64 {
        (**self).quantity()
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A cart line as submitted with an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Stock Keeping Unit.
    pub sku: String,

    /// Display name.
    #[serde(default)]
    pub title: String,

    pub product_type: String,

    /// Unit price in the smallest currency unit.
    pub price: Money,

    #[serde(default = "default_quantity")]
    pub quantity: u64,

    /// Fixed VAT override in whole percent (0 = none).
    #[serde(default)]
    pub vat: Percentage,

    /// Individually taxed components of a bundle.
    #[serde(default)]
    pub price_items: Vec<PriceComponent>,
}

fn default_quantity() -> u64 {
    1
}

impl LineItem {
    /// Creates a simple line item with quantity 1 and no overrides.
    pub fn new(sku: impl Into<String>, product_type: impl Into<String>, price: Money) -> Self {
        LineItem {
            sku: sku.into(),
            title: String::new(),
            product_type: product_type.into(),
            price,
            quantity: default_quantity(),
            vat: Percentage::zero(),
            price_items: Vec::new(),
        }
    }

    /// Sets the quantity.
    pub fn with_quantity(mut self, quantity: u64) -> Self {
        self.quantity = quantity;
        self
    }

    /// Sets a fixed VAT override.
    pub fn with_vat(mut self, vat: Percentage) -> Self {
        self.vat = vat;
        self
    }

    /// Adds an individually taxed component.
    pub fn with_component(mut self, product_type: impl Into<String>, amount: Money) -> Self {
        self.price_items.push(PriceComponent {
            product_type: product_type.into(),
            amount,
        });
        self
    }

    /// Validates the line. `index` is its position in the cart.
    pub fn validate(&self, index: usize) -> CoreResult<()> {
        self.check().map_err(|source| CoreError::InvalidLineItem {
            index,
            sku: self.sku.clone(),
            source,
        })
    }

    fn check(&self) -> ValidationResult<()> {
        validate_sku(&self.sku)?;
        validate_product_type(&self.product_type)?;
        validate_quantity(self.quantity)?;
        for component in &self.price_items {
            validate_product_type(&component.product_type)?;
        }
        Ok(())
    }
}

impl Item for LineItem {
    fn price_in_lowest_unit(&self) -> Money {
        self.price
    }

    fn product_type(&self) -> &str {
        &self.product_type
    }

    fn fixed_vat(&self) -> Percentage {
        self.vat
    }

    fn taxable_items(&self) -> Vec<&dyn Item> {
        self.price_items.iter().map(|c| c as &dyn Item).collect()
    }

    fn quantity(&self) -> u64 {
        self.quantity
    }
}

/// A taxable component of a composite line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceComponent {
    pub product_type: String,
    pub amount: Money,
}

impl Item for PriceComponent {
    fn price_in_lowest_unit(&self) -> Money {
        self.amount
    }

    fn product_type(&self) -> &str {
        &self.product_type
    }

    fn quantity(&self) -> u64 {
        1
    }
}

// =============================================================================
// Coupon Code
// =============================================================================

/// A percentage coupon as configured by the merchant.
///
/// ## Example
/// ```rust
/// use checkout_core::item::{Coupon, CouponCode};
/// use checkout_core::money::Money;
/// use checkout_core::types::Percentage;
///
/// let coupon = CouponCode::percentage("BOOKS10", Percentage::new(10))
///     .for_product_types(["book"]);
///
/// assert!(coupon.applies_to_product_type("book"));
/// assert!(!coupon.applies_to_product_type("shirt"));
/// assert!(coupon.applies_to_price("EUR", Money::from_cents(500)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CouponCode {
    pub code: String,

    /// Percentage off each eligible item.
    #[serde(default)]
    pub percentage: Percentage,

    /// Fixed amount off (reserved, not applied by the calculator).
    #[serde(default)]
    pub fixed_amount: Money,

    /// Product types the coupon is valid for. Empty = every product type.
    #[serde(default)]
    pub product_types: Vec<String>,

    /// Currency the coupon is restricted to, if any.
    #[serde(default)]
    pub currency: Option<String>,

    /// Minimum order amount for the coupon to be valid, if any.
    #[serde(default)]
    pub minimum_order: Option<Money>,
}

impl CouponCode {
    /// Creates an unrestricted percentage coupon.
    pub fn percentage(code: impl Into<String>, percentage: Percentage) -> Self {
        CouponCode {
            code: code.into(),
            percentage,
            fixed_amount: Money::zero(),
            product_types: Vec::new(),
            currency: None,
            minimum_order: None,
        }
    }

    /// Restricts the coupon to the given product types.
    pub fn for_product_types<'a>(mut self, product_types: impl IntoIterator<Item = &'a str>) -> Self {
        self.product_types = product_types.into_iter().map(str::to_string).collect();
        self
    }

    /// Validates the coupon definition.
    pub fn validate(&self) -> CoreResult<()> {
        self.check().map_err(|source| CoreError::InvalidCoupon {
            code: self.code.clone(),
            source,
        })
    }

    fn check(&self) -> ValidationResult<()> {
        validate_sku(&self.code)?;
        validate_coupon_percentage(self.percentage)?;
        for product_type in &self.product_types {
            validate_product_type(product_type)?;
        }
        if let Some(currency) = &self.currency {
            validate_currency(currency)?;
        }
        Ok(())
    }
}

impl Coupon for CouponCode {
    fn applies_to_product_type(&self, product_type: &str) -> bool {
        self.product_types.is_empty() || self.product_types.iter().any(|t| t == product_type)
    }

    fn applies_to_price(&self, currency: &str, amount: Money) -> bool {
        let currency_ok = self
            .currency
            .as_deref()
            .map_or(true, |restricted| restricted.eq_ignore_ascii_case(currency));
        let amount_ok = self.minimum_order.map_or(true, |minimum| amount >= minimum);
        currency_ok && amount_ok
    }

    fn percentage_discount(&self) -> Percentage {
        self.percentage
    }

    fn fixed_discount(&self) -> Money {
        self.fixed_amount
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
