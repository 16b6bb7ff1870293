//! # Price Calculator
//!
//! Turns cart lines, merchant tax settings, the buyer's country and an
//! optional coupon into an itemized [`OrderPrice`].
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Per Item (price_item)                               │
//! │                                                                         │
//! │  1. subtotal = listed unit price                                       │
//! │  2. tax amounts (basis, %):                                            │
//! │       fixed VAT set      → [(price, fixed VAT)]                        │
//! │       taxable sub-items  → [(sub price, rule % or 0), ...]             │
//! │       otherwise          → [(price, rule %)] if a rule matches         │
//! │       no settings        → []                                          │
//! │  3. exclusive: taxes += round(basis × % / 100)                         │
//! │     inclusive: net = round(basis × 100 / (100 + %))                    │
//! │                subtotal = Σ net, taxes += round(net × % / 100)         │
//! │  4. coupon:    discount = round(base × coupon% / 100)                  │
//! │                base = subtotal (exclusive) | subtotal + taxes (incl.)  │
//! │  5. total = subtotal - discount + taxes                                │
//! │                                                                         │
//! │                     Per Order (calculate_price)                         │
//! │                                                                         │
//! │  subtotal/discount/taxes += item field × quantity   (input order kept) │
//! │  total = subtotal - discount + taxes                (recomputed)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every division goes through [`round_half_even`](crate::money::round_half_even),
//! so client, server and payment processor agree to the cent.
//!
//! ## Discount Base
//! In exclusive mode the discount is taken from the net subtotal only, so the
//! coupon does not reduce the tax paid. In inclusive mode it is taken from
//! the gross amount. Both behaviors are relied on by existing order totals.
//!
//! ## Never Fails
//! Missing settings, missing coupon, empty rule lists and unmatched product
//! types all degrade to "no tax" / "no discount". Use
//! [`calculate_price_with_diagnostics`] to find out when that happened.

use tracing::{debug, debug_span, warn};

use crate::item::{Coupon, Item};
use crate::money::Money;
use crate::tax::{match_tax_rule, Settings};
use crate::types::{Diagnostic, ItemPrice, OrderPrice, Percentage, TaxMode};

/// An amount to tax and the percentage to tax it at.
#[derive(Debug, Clone, Copy)]
struct TaxAmount {
    basis: Money,
    percentage: Percentage,
}

// =============================================================================
// Item Price Computer
// =============================================================================

/// Prices ONE unit of a line item.
///
/// ## Example
/// ```rust
/// use checkout_core::calculator::price_item;
/// use checkout_core::item::LineItem;
/// use checkout_core::money::Money;
/// use checkout_core::tax::{Settings, TaxRule};
/// use checkout_core::types::Percentage;
///
/// let settings = Settings {
///     prices_include_taxes: false,
///     taxes: vec![TaxRule { percentage: Percentage::new(20), ..Default::default() }],
/// };
/// let item = LineItem::new("BOOK-1", "book", Money::from_cents(1000));
///
/// let price = price_item(Some(&settings), "DE", None, &item);
/// assert_eq!(price.subtotal.cents(), 1000);
/// assert_eq!(price.taxes.cents(), 200);
/// assert_eq!(price.total.cents(), 1200);
/// ```
pub fn price_item<I: Item + ?Sized>(
    settings: Option<&Settings>,
    country: &str,
    coupon: Option<&dyn Coupon>,
    item: &I,
) -> ItemPrice {
    price_item_at(settings, country, coupon, item, 0, &mut Vec::new())
}

fn price_item_at<I: Item + ?Sized>(
    settings: Option<&Settings>,
    country: &str,
    coupon: Option<&dyn Coupon>,
    item: &I,
    index: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> ItemPrice {
    let mode = settings.map(Settings::tax_mode).unwrap_or_default();

    let mut price = ItemPrice {
        quantity: item.quantity(),
        subtotal: item.price_in_lowest_unit(),
        ..ItemPrice::default()
    };

    let amounts = match settings {
        Some(settings) => tax_amounts(settings, country, item, index, diagnostics),
        None => Vec::new(),
    };

    if !amounts.is_empty() {
        if mode.is_inclusive() {
            price.subtotal = Money::zero();
        }
        for amount in &amounts {
            let basis = match mode {
                TaxMode::Inclusive => {
                    let net = amount.basis.exclusive_of(amount.percentage);
                    price.subtotal += net;
                    net
                }
                TaxMode::Exclusive => amount.basis,
            };
            price.taxes += basis.percent_of(amount.percentage);
        }
    }

    if let Some(coupon) = coupon.filter(|c| c.applies_to_product_type(item.product_type())) {
        let base = match mode {
            TaxMode::Exclusive => price.subtotal,
            TaxMode::Inclusive => price.subtotal + price.taxes,
        };
        let requested = base.percent_of(coupon.percentage_discount());
        let ceiling = price.subtotal + price.taxes;

        price.discount = if requested > ceiling {
            warn!(index, %requested, %ceiling, "coupon discount exceeds line value, capping");
            diagnostics.push(Diagnostic::DiscountCapped {
                item: index,
                requested,
                applied: ceiling,
            });
            ceiling
        } else {
            requested
        };
        debug!(index, discount = price.discount.cents(), "coupon applied");
    }

    // discount <= subtotal + taxes, so this is subtotal - discount + taxes
    // without an intermediate underflow.
    price.total = price.subtotal + price.taxes - price.discount;
    price
}

/// Collects the (basis, percentage) pairs to tax for one item.
fn tax_amounts<I: Item + ?Sized>(
    settings: &Settings,
    country: &str,
    item: &I,
    index: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<TaxAmount> {
    let fixed_vat = item.fixed_vat();
    if !fixed_vat.is_zero() {
        return vec![TaxAmount {
            basis: item.price_in_lowest_unit(),
            percentage: fixed_vat,
        }];
    }

    let components = item.taxable_items();
    if !components.is_empty() {
        return components
            .iter()
            .map(|component| {
                let percentage = match match_tax_rule(&settings.taxes, country, component.product_type()) {
                    Some(rule) => rule.percentage,
                    None => {
                        diagnostics.push(Diagnostic::NoTaxRule {
                            item: index,
                            product_type: component.product_type().to_string(),
                        });
                        Percentage::zero()
                    }
                };
                TaxAmount {
                    basis: component.price_in_lowest_unit(),
                    percentage,
                }
            })
            .collect();
    }

    match match_tax_rule(&settings.taxes, country, item.product_type()) {
        Some(rule) => vec![TaxAmount {
            basis: item.price_in_lowest_unit(),
            percentage: rule.percentage,
        }],
        None => {
            diagnostics.push(Diagnostic::NoTaxRule {
                item: index,
                product_type: item.product_type().to_string(),
            });
            Vec::new()
        }
    }
}

// =============================================================================
// Aggregator
// =============================================================================

/// Prices a whole order.
///
/// `currency` is part of the contract for coupon price-range checks but no
/// current rule depends on it. `country` drives every tax lookup.
///
/// ## Example
/// ```rust
/// use checkout_core::calculator::calculate_price;
/// use checkout_core::item::{CouponCode, LineItem};
/// use checkout_core::money::Money;
/// use checkout_core::tax::{Settings, TaxRule};
/// use checkout_core::types::Percentage;
///
/// let settings = Settings {
///     prices_include_taxes: false,
///     taxes: vec![TaxRule { percentage: Percentage::new(20), ..Default::default() }],
/// };
/// let coupon = CouponCode::percentage("SAVE10", Percentage::new(10));
/// let items = vec![LineItem::new("BOOK-1", "book", Money::from_cents(1000)).with_quantity(3)];
///
/// let order = calculate_price(Some(&settings), "DE", "EUR", Some(&coupon), &items);
/// assert_eq!(order.items[0].total.cents(), 1100);
/// assert_eq!(order.subtotal.cents(), 3000);
/// assert_eq!(order.discount.cents(), 300);
/// assert_eq!(order.taxes.cents(), 600);
/// assert_eq!(order.total.cents(), 3300);
/// ```
pub fn calculate_price<I: Item>(
    settings: Option<&Settings>,
    country: &str,
    currency: &str,
    coupon: Option<&dyn Coupon>,
    items: &[I],
) -> OrderPrice {
    calculate_price_with_diagnostics(settings, country, currency, coupon, items).0
}

/// Prices a whole order and reports every silent fallback taken.
///
/// The returned [`OrderPrice`] is identical to [`calculate_price`]'s.
pub fn calculate_price_with_diagnostics<I: Item>(
    settings: Option<&Settings>,
    country: &str,
    currency: &str,
    coupon: Option<&dyn Coupon>,
    items: &[I],
) -> (OrderPrice, Vec<Diagnostic>) {
    let _span = debug_span!("calculate_price", country, currency, items = items.len()).entered();

    let mut diagnostics = Vec::new();
    if settings.is_none() && !items.is_empty() {
        diagnostics.push(Diagnostic::NoSettings);
    }

    let mut order = OrderPrice {
        items: Vec::with_capacity(items.len()),
        ..OrderPrice::default()
    };

    for (index, item) in items.iter().enumerate() {
        let price = price_item_at(settings, country, coupon, item, index, &mut diagnostics);

        let mut saturated = false;
        let mut weighted = |amount: Money| {
            amount.checked_mul_quantity(price.quantity).unwrap_or_else(|| {
                saturated = true;
                amount * price.quantity
            })
        };
        order.subtotal += weighted(price.subtotal);
        order.discount += weighted(price.discount);
        order.taxes += weighted(price.taxes);

        if saturated {
            warn!(index, quantity = price.quantity, "order amount saturated");
            diagnostics.push(Diagnostic::AmountSaturated { item: index });
        }

        order.items.push(price);
    }

    order.total = order.subtotal + order.taxes - order.discount;

    debug!(
        subtotal = order.subtotal.cents(),
        discount = order.discount.cents(),
        taxes = order.taxes.cents(),
        total = order.total.cents(),
        "order priced"
    );

    (order, diagnostics)
}

// =============================================================================
// Calculator Handle
// =============================================================================

/// A read-only handle binding the calculator to one merchant's settings.
///
/// Holds no mutable state; copy it freely and share it between threads.
///
/// ## Example
/// ```rust
/// use checkout_core::calculator::PriceCalculator;
/// use checkout_core::item::LineItem;
/// use checkout_core::money::Money;
///
/// let calculator = PriceCalculator::new(None);
/// let items = [LineItem::new("A-1", "book", Money::from_cents(1000))];
/// let order = calculator.quote("DE", "EUR", None, &items);
/// assert_eq!(order.total.cents(), 1000);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceCalculator<'a> {
    settings: Option<&'a Settings>,
}

impl<'a> PriceCalculator<'a> {
    pub fn new(settings: Option<&'a Settings>) -> Self {
        PriceCalculator { settings }
    }

    /// The settings this calculator prices with.
    pub fn settings(&self) -> Option<&'a Settings> {
        self.settings
    }

    /// See [`price_item`].
    pub fn price_item<I: Item + ?Sized>(
        &self,
        country: &str,
        coupon: Option<&dyn Coupon>,
        item: &I,
    ) -> ItemPrice {
        price_item(self.settings, country, coupon, item)
    }

    /// See [`calculate_price`].
    pub fn quote<I: Item>(
        &self,
        country: &str,
        currency: &str,
        coupon: Option<&dyn Coupon>,
        items: &[I],
    ) -> OrderPrice {
        calculate_price(self.settings, country, currency, coupon, items)
    }

    /// See [`calculate_price_with_diagnostics`].
    pub fn quote_with_diagnostics<I: Item>(
        &self,
        country: &str,
        currency: &str,
        coupon: Option<&dyn Coupon>,
        items: &[I],
    ) -> (OrderPrice, Vec<Diagnostic>) {
        calculate_price_with_diagnostics(self.settings, country, currency, coupon, items)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
