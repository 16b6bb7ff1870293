//! # `quote` Command
//!
//! Prices a cart document against merchant settings and prints the
//! breakdown as JSON.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Load settings (--settings, else pricing.settings_path, else none)  │
//! │  2. Load cart                                                           │
//! │  3. Resolve country:  --country ► cart.country ► default_country       │
//! │     Resolve currency: --currency ► cart.currency ► default_currency    │
//! │  4. Validate inputs (unless pricing.validate_inputs = false)           │
//! │  5. Coupon eligibility: price without the coupon, ask the coupon       │
//! │     whether it accepts that currency and amount                        │
//! │  6. calculate_price_with_diagnostics                                    │
//! │  7. Render { country, currency, ...OrderPrice, diagnostics }           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine never rejects a coupon on price grounds; the minimum-order and
//! currency restrictions are enforced here, before pricing.

use std::path::PathBuf;

use checkout_core::validation::{validate_country, validate_currency};
use checkout_core::{
    Coupon, CoreError, CouponCode, Diagnostic, LineItem, OrderPrice, PriceCalculator,
};
use clap::Args;
use serde::Serialize;
use tracing::{info, warn};

use super::{settings_path, to_json};
use crate::config::CliConfig;
use crate::documents::{load_cart, load_settings};
use crate::error::{CliError, CliResult};

/// Arguments of `checkout-price quote`.
#[derive(Debug, Clone, Args)]
pub struct QuoteArgs {
    /// Merchant settings document (JSON). Defaults to `pricing.settings_path`.
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Cart document (JSON).
    #[arg(long)]
    pub cart: PathBuf,

    /// Buyer country, overriding the cart and configuration.
    #[arg(long)]
    pub country: Option<String>,

    /// Order currency, overriding the cart and configuration.
    #[arg(long)]
    pub currency: Option<String>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

/// The rendered result of a quote.
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub country: String,
    pub currency: String,

    #[serde(flatten)]
    pub price: OrderPrice,

    pub diagnostics: Vec<Diagnostic>,

    /// Code of a coupon that was dropped because it does not accept this
    /// order's currency or amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_rejected: Option<String>,
}

/// Runs the command and returns its JSON output.
pub fn run(args: &QuoteArgs, config: &CliConfig) -> CliResult<String> {
    let quote = quote(args, config)?;
    Ok(to_json(&quote, args.pretty)?)
}

/// Prices the cart named by `args`.
pub fn quote(args: &QuoteArgs, config: &CliConfig) -> CliResult<Quote> {
    let settings = match settings_path(args.settings.as_deref(), config) {
        Some(path) => Some(load_settings(path)?),
        None => {
            warn!("No merchant settings given, nothing will be taxed");
            None
        }
    };
    let cart = load_cart(&args.cart)?;

    let country = args
        .country
        .clone()
        .or_else(|| cart.country.clone())
        .or_else(|| config.pricing.default_country.clone())
        .ok_or(CliError::MissingCountry)?;
    let currency = args
        .currency
        .clone()
        .or_else(|| cart.currency.clone())
        .unwrap_or_else(|| config.pricing.default_currency.clone());

    if config.pricing.validate_inputs {
        if let Some(settings) = &settings {
            settings.validate()?;
        }
        cart.validate()?;
        validate_country(&country).map_err(CoreError::from)?;
        validate_currency(&currency).map_err(CoreError::from)?;
    }

    let calculator = PriceCalculator::new(settings.as_ref());
    let (coupon, coupon_rejected) =
        eligible_coupon(calculator, &country, &currency, cart.coupon.as_ref(), &cart.items);

    let (price, diagnostics) = calculator.quote_with_diagnostics(
        &country,
        &currency,
        coupon.map(|c| c as &dyn Coupon),
        &cart.items,
    );

    for diagnostic in &diagnostics {
        warn!(%diagnostic, "Pricing diagnostic");
    }
    info!(
        country = %country,
        currency = %currency,
        items = price.items.len(),
        total = price.total.cents(),
        "Quoted cart"
    );

    Ok(Quote {
        country,
        currency,
        price,
        diagnostics,
        coupon_rejected,
    })
}

/// Checks the coupon's price restrictions against the undiscounted order.
///
/// Returns the coupon to apply, or the code of the rejected coupon.
fn eligible_coupon<'c>(
    calculator: PriceCalculator<'_>,
    country: &str,
    currency: &str,
    coupon: Option<&'c CouponCode>,
    items: &[LineItem],
) -> (Option<&'c CouponCode>, Option<String>) {
    let Some(coupon) = coupon else {
        return (None, None);
    };

    let undiscounted = calculator.quote(country, currency, None, items);
    let amount = undiscounted.subtotal + undiscounted.taxes;

    if coupon.applies_to_price(currency, amount) {
        (Some(coupon), None)
    } else {
        warn!(
            code = %coupon.code,
            currency,
            amount = amount.cents(),
            "Coupon not valid for this order, ignoring it"
        );
        (None, Some(coupon.code.clone()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
