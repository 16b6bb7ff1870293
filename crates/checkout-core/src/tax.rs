//! # Tax Settings and Rule Matching
//!
//! Merchant tax configuration and the first-match rule lookup.
//!
//! ## Rule Precedence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  taxes: [                                                               │
//! │    { 7%,  product_types: [book],  countries: [DE] },    ← rule 0        │
//! │    { 19%, product_types: [],      countries: [DE] },    ← rule 1        │
//! │    { 0%,  product_types: [],      countries: [] },      ← rule 2        │
//! │  ]                                                                      │
//! │                                                                         │
//! │  (DE, book)     → rule 0 (7%)      rules are NOT cumulative:           │
//! │  (DE, shirt)    → rule 1 (19%)     the FIRST match wins and later      │
//! │  (US, book)     → rule 2 (0%)      rules are never consulted           │
//! │                                                                         │
//! │  An EMPTY list is a wildcard, it matches every value.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Configuration order is therefore part of the contract: put specific
//! rules before general ones. [`Settings::shadowed_rules`] finds rules that
//! can never match because an earlier rule covers them.
//!
//! ## Settings Document
//! ```json
//! {
//!   "prices_include_taxes": true,
//!   "taxes": [
//!     { "percentage": 7, "product_types": ["book"], "countries": ["DE"] },
//!     { "percentage": 19, "countries": ["DE"] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::trace;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{Percentage, TaxMode};
use crate::validation::{validate_country, validate_product_type, validate_tax_percentage};

// =============================================================================
// Tax Rule
// =============================================================================

/// One configured tax rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRule {
    /// Whole percent applied to matching items.
    pub percentage: Percentage,

    /// Product types this rule covers. Empty = every product type.
    #[serde(default)]
    pub product_types: Vec<String>,

    /// Buyer countries this rule covers. Empty = every country.
    #[serde(default)]
    pub countries: Vec<String>,
}

impl TaxRule {
    /// Checks whether this rule covers a country/product-type pair.
    ///
    /// ## Example
    /// ```rust
    /// use checkout_core::tax::TaxRule;
    /// use checkout_core::types::Percentage;
    ///
    /// let rule = TaxRule {
    ///     percentage: Percentage::new(7),
    ///     product_types: vec!["book".into()],
    ///     countries: vec![],
    /// };
    /// assert!(rule.applies_to("DE", "book"));
    /// assert!(rule.applies_to("FR", "book"));
    /// assert!(!rule.applies_to("DE", "shirt"));
    /// ```
    pub fn applies_to(&self, country: &str, product_type: &str) -> bool {
        matches_filter(&self.product_types, product_type) && matches_filter(&self.countries, country)
    }

    /// Checks whether every pair this `other` rule matches is also matched
    /// by `self`.
    fn covers(&self, other: &TaxRule) -> bool {
        covers_filter(&self.product_types, &other.product_types)
            && covers_filter(&self.countries, &other.countries)
    }
}

/// Empty filter = wildcard.
fn matches_filter(filter: &[String], value: &str) -> bool {
    filter.is_empty() || filter.iter().any(|entry| entry == value)
}

fn covers_filter(outer: &[String], inner: &[String]) -> bool {
    if outer.is_empty() {
        return true;
    }
    !inner.is_empty() && inner.iter().all(|entry| outer.contains(entry))
}

// =============================================================================
// Rule Matcher
// =============================================================================

/// Returns the first rule in `rules` that applies to the pair, if any.
///
/// Rules are evaluated front to back and never reordered; the result is
/// the FIRST match, not the most specific one.
///
/// ## Example
/// ```rust
/// use checkout_core::tax::{match_tax_rule, TaxRule};
/// use checkout_core::types::Percentage;
///
/// let rules = vec![
///     TaxRule { percentage: Percentage::new(19), countries: vec!["DE".into()], ..Default::default() },
///     TaxRule { percentage: Percentage::new(7), product_types: vec!["book".into()], ..Default::default() },
/// ];
///
/// // The general DE rule comes first and wins, even for books.
/// assert_eq!(match_tax_rule(&rules, "DE", "book").unwrap().percentage.value(), 19);
/// assert_eq!(match_tax_rule(&rules, "FR", "book").unwrap().percentage.value(), 7);
/// assert!(match_tax_rule(&rules, "FR", "shirt").is_none());
/// ```
pub fn match_tax_rule<'a>(
    rules: &'a [TaxRule],
    country: &str,
    product_type: &str,
) -> Option<&'a TaxRule> {
    let matched = rules
        .iter()
        .enumerate()
        .find(|(_, rule)| rule.applies_to(country, product_type));

    match matched {
        Some((index, rule)) => {
            trace!(country, product_type, index, percentage = rule.percentage.value(), "tax rule matched");
            Some(rule)
        }
        None => {
            trace!(country, product_type, "no tax rule matched");
            None
        }
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Merchant tax configuration.
///
/// Borrowed read-only by the calculator; sharing one `Settings` between
/// concurrent pricing calls needs no locking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Settings {
    /// Whether listed prices already contain tax.
    #[serde(default)]
    pub prices_include_taxes: bool,

    /// Ordered, first-match tax rules.
    #[serde(default)]
    pub taxes: Vec<TaxRule>,
}

/// Which rule, if any, a product type resolves to for one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RuleCoverage {
    pub product_type: String,
    /// Index into `Settings::taxes`.
    pub rule: Option<usize>,
    /// Effective percentage (0 when no rule applies).
    pub percentage: Percentage,
}

impl Settings {
    /// Returns the tax mode implied by `prices_include_taxes`.
    #[inline]
    pub fn tax_mode(&self) -> TaxMode {
        TaxMode::from_prices_include_taxes(self.prices_include_taxes)
    }

    /// Looks up the rule for a country/product-type pair.
    #[inline]
    pub fn rule_for(&self, country: &str, product_type: &str) -> Option<&TaxRule> {
        match_tax_rule(&self.taxes, country, product_type)
    }

    /// Resolves each product type to its rule for `country`.
    ///
    /// ## Example
    /// ```rust
    /// use checkout_core::tax::{Settings, TaxRule};
    /// use checkout_core::types::Percentage;
    ///
    /// let settings = Settings {
    ///     prices_include_taxes: false,
    ///     taxes: vec![TaxRule {
    ///         percentage: Percentage::new(7),
    ///         product_types: vec!["book".into()],
    ///         countries: vec![],
    ///     }],
    /// };
    ///
    /// let coverage = settings.coverage("DE", ["book", "shirt"]);
    /// assert_eq!(coverage[0].rule, Some(0));
    /// assert_eq!(coverage[1].rule, None);
    /// ```
    pub fn coverage<'p>(
        &self,
        country: &str,
        product_types: impl IntoIterator<Item = &'p str>,
    ) -> Vec<RuleCoverage> {
        product_types
            .into_iter()
            .map(|product_type| {
                let rule = self
                    .taxes
                    .iter()
                    .position(|rule| rule.applies_to(country, product_type));
                RuleCoverage {
                    product_type: product_type.to_string(),
                    rule,
                    percentage: rule
                        .map(|index| self.taxes[index].percentage)
                        .unwrap_or_default(),
                }
            })
            .collect()
    }

    /// Returns `(shadowed, by)` index pairs: rule `shadowed` can never
    /// match because the earlier rule `by` matches everything it would.
    pub fn shadowed_rules(&self) -> Vec<(usize, usize)> {
        self.taxes
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(index, rule)| {
                self.taxes[..index]
                    .iter()
                    .position(|earlier| earlier.covers(rule))
                    .map(|by| (index, by))
            })
            .collect()
    }

    /// Validates every rule.
    ///
    /// Pricing itself never validates; this is for loading merchant
    /// configuration, where rejecting a typo beats silently taxing at 0%.
    pub fn validate(&self) -> CoreResult<()> {
        for (index, rule) in self.taxes.iter().enumerate() {
            let checked = validate_tax_percentage(rule.percentage)
                .and_then(|_| rule.product_types.iter().try_for_each(|t| validate_product_type(t)))
                .and_then(|_| rule.countries.iter().try_for_each(|c| validate_country(c)));

            checked.map_err(|source| CoreError::InvalidTaxRule { index, source })?;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
