//! # checkout-core: Order Pricing Engine
//!
//! This crate computes the price breakdown of an order: subtotal, tax,
//! discount and total, per line item and for the whole order. Every
//! function is pure, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Creation Workflow                           │
//! │                                                                         │
//! │  HTTP / persistence (elsewhere) ──► cart lines, settings, coupon       │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ checkout-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │    tax    │  │calculator │  │   money   │  │   item    │  │   │
//! │  │   │ Settings  │  │price_item │  │  Money    │  │ Item      │  │   │
//! │  │   │ TaxRule   │  │calculate_ │  │ rounding  │  │ Coupon    │  │   │
//! │  │   │ matching  │  │  price    │  │           │  │ LineItem  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │                                ▼                                        │
//! │                 OrderPrice (returned to the caller)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`calculator`] - Item price computer and order aggregator
//! - [`tax`] - Merchant tax settings and first-match rule lookup
//! - [`money`] - Money type and round-half-to-even policy
//! - [`item`] - `Item` / `Coupon` capabilities and the cart line types
//! - [`types`] - Result types (ItemPrice, OrderPrice, Diagnostic, ...)
//! - [`error`] - Domain error types
//! - [`validation`] - Opt-in validation of settings, coupons and carts
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, no cross-call state
//! 2. **Integer Money**: all amounts in the smallest currency unit (u64)
//! 3. **Exact Rounding**: every division is an exact rational rounded half to even
//! 4. **Never Fails**: incomplete configuration prices as "no tax", never an error
//!
//! ## Example Usage
//!
//! ```rust
//! use checkout_core::{calculate_price, LineItem, Money, Percentage, Settings, TaxRule};
//!
//! let settings = Settings {
//!     prices_include_taxes: true,
//!     taxes: vec![TaxRule {
//!         percentage: Percentage::new(20),
//!         product_types: vec![],
//!         countries: vec!["GB".into()],
//!     }],
//! };
//!
//! let items = vec![LineItem::new("MUG-1", "mug", Money::from_cents(1200))];
//! let order = calculate_price(Some(&settings), "GB", "GBP", None, &items);
//!
//! assert_eq!(order.subtotal.cents(), 1000);
//! assert_eq!(order.taxes.cents(), 200);
//! assert_eq!(order.total.cents(), 1200);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculator;
pub mod error;
pub mod item;
pub mod money;
pub mod tax;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use calculator::{calculate_price, calculate_price_with_diagnostics, price_item, PriceCalculator};
pub use error::{CoreError, CoreResult, ValidationError};
pub use item::{Coupon, CouponCode, Item, LineItem, PriceComponent};
pub use money::Money;
pub use tax::{match_tax_rule, RuleCoverage, Settings, TaxRule};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items accepted in a single cart by validation.
///
/// The calculator itself accepts any number of items.
pub const MAX_CART_ITEMS: usize = 250;

/// Maximum quantity of a single line accepted by validation.
pub const MAX_ITEM_QUANTITY: u64 = 9_999;
