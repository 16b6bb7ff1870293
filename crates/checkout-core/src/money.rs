//! # Money Module
//!
//! Provides the `Money` type and the rounding policy used by every monetary
//! division in the engine.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Client, server and payment processor each price the same cart.        │
//! │  A single off-by-one-cent mismatch rejects the payment.                │
//! │                                                                         │
//! │  OUR SOLUTION: Integer smallest-unit amounts + exact rationals         │
//! │    amount × percentage / 100 is kept as numerator / denominator        │
//! │    and rounded ONCE with round-half-to-even                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use checkout_core::money::Money;
//! use checkout_core::types::Percentage;
//!
//! let price = Money::from_cents(1000);
//!
//! // 20% of 10.00
//! assert_eq!(price.percent_of(Percentage::new(20)).cents(), 200);
//!
//! // 12.00 including 20% tax -> 10.00 before tax
//! assert_eq!(Money::from_cents(1200).exclusive_of(Percentage::new(20)).cents(), 1000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::types::Percentage;

// =============================================================================
// Rounding Policy
// =============================================================================

/// Rounds the exact rational `numerator / denominator` to the nearest
/// integer, breaking ties towards the even neighbour (Bankers Rounding).
///
/// ## Bankers Rounding Explained
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────┐
/// │  BANKERS ROUNDING (Round Half to Even)                              │
/// │                                                                     │
/// │  Standard rounding always rounds 0.5 UP, causing systematic bias:  │
/// │    0.5 → 1, 1.5 → 2, 2.5 → 3, 3.5 → 4 (always up = +bias)         │
/// │                                                                     │
/// │  Bankers Rounding rounds 0.5 to nearest EVEN number:               │
/// │    0.5 → 0, 1.5 → 2, 2.5 → 2, 3.5 → 4 (alternates = no bias)      │
/// │                                                                     │
/// │  Negative values mirror positive ones:                             │
/// │    -0.5 → 0, -1.5 → -2, -2.5 → -2, -2.6 → -3                       │
/// └─────────────────────────────────────────────────────────────────────┘
/// ```
///
/// The value is never materialised as a float: the integral part and the
/// remainder come straight from integer division, so a tie is detected
/// exactly (`2 × remainder == denominator`).
///
/// ## Panics
/// Panics if `denominator` is zero, like integer division.
///
/// ## Example
/// ```rust
/// use checkout_core::money::round_half_even;
///
/// assert_eq!(round_half_even(5, 2), 2);   // 2.5 → 2
/// assert_eq!(round_half_even(7, 2), 4);   // 3.5 → 4
/// assert_eq!(round_half_even(-5, 2), -2); // -2.5 → -2
/// assert_eq!(round_half_even(26, 10), 3); // 2.6 → 3
/// ```
pub fn round_half_even(numerator: i128, denominator: i128) -> i128 {
    let (numerator, denominator) = if denominator < 0 {
        (-numerator, -denominator)
    } else {
        (numerator, denominator)
    };

    // Truncates towards zero; the remainder carries the sign of the numerator.
    let integral = numerator / denominator;
    let twice_remainder = (numerator % denominator).abs() * 2;

    let away_from_zero = twice_remainder > denominator
        || (twice_remainder == denominator && integral % 2 != 0);

    match (away_from_zero, numerator < 0) {
        (false, _) => integral,
        (true, false) => integral + 1,
        (true, true) => integral - 1,
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in the smallest currency unit (cents for EUR/USD).
///
/// ## Design Decisions
/// - **u64 (unsigned)**: prices, taxes and discounts are never negative
///   here, and 64 bits hold any realistic order value
/// - **Saturating operators**: an amount never wraps around; the aggregator
///   detects saturation and reports it
/// - **No currency field**: the engine never converts currencies, the
///   currency travels next to the amounts instead
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(u64);

impl Money {
    /// Creates a Money value from the smallest currency unit.
    ///
    /// ## Example
    /// ```rust
    /// use checkout_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: u64) -> Self {
        Money(cents)
    }

    /// Returns the amount in the smallest currency unit.
    #[inline]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Returns the major unit portion (10 for 10.99).
    #[inline]
    pub const fn major(&self) -> u64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (99 for 10.99).
    #[inline]
    pub const fn minor(&self) -> u64 {
        self.0 % 100
    }

    /// Zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns `percentage` percent of this amount, rounded half to even.
    ///
    /// This is the tax amount on a tax-exclusive basis and the discount
    /// amount on a discount base.
    ///
    /// ## Example
    /// ```rust
    /// use checkout_core::money::Money;
    /// use checkout_core::types::Percentage;
    ///
    /// // 1250 × 10% = 125.0
    /// assert_eq!(Money::from_cents(1250).percent_of(Percentage::new(10)).cents(), 125);
    /// // 25 × 10% = 2.5 → 2 (even)
    /// assert_eq!(Money::from_cents(25).percent_of(Percentage::new(10)).cents(), 2);
    /// // 35 × 10% = 3.5 → 4 (even)
    /// assert_eq!(Money::from_cents(35).percent_of(Percentage::new(10)).cents(), 4);
    /// ```
    pub fn percent_of(&self, percentage: Percentage) -> Money {
        let numerator = self.0 as i128 * percentage.value() as i128;
        Money::from_rounded(round_half_even(numerator, 100))
    }

    /// Backs the tax portion out of a tax-inclusive amount:
    /// `amount × 100 / (100 + percentage)`, rounded half to even.
    ///
    /// ## User Workflow
    /// ```text
    /// Shelf price (incl. 20% VAT): 12.00
    ///      │
    ///      ▼
    /// exclusive_of(20%) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Net price: 10.00   (tax is then 20% of 10.00 = 2.00)
    /// ```
    pub fn exclusive_of(&self, percentage: Percentage) -> Money {
        let numerator = self.0 as i128 * 100;
        let denominator = 100 + percentage.value() as i128;
        Money::from_rounded(round_half_even(numerator, denominator))
    }

    /// Multiplies a unit amount by a quantity, returning `None` on overflow.
    #[inline]
    pub fn checked_mul_quantity(&self, quantity: u64) -> Option<Money> {
        self.0.checked_mul(quantity).map(Money)
    }

    /// Converts a rounded rational back into an amount, saturating at the
    /// bounds of `u64`.
    fn from_rounded(value: i128) -> Money {
        Money(u64::try_from(value.max(0)).unwrap_or(u64::MAX))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount with two minor digits, without a currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.major(), self.minor())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

/// Subtraction floors at zero; money in this engine is never negative.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

/// Multiplication by a quantity.
impl Mul<u64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, quantity: u64) -> Self {
        Money(self.0.saturating_mul(quantity))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_round_half_even_ties() {
        assert_eq!(round_half_even(1, 2), 0); // 0.5
        assert_eq!(round_half_even(3, 2), 2); // 1.5
        assert_eq!(round_half_even(5, 2), 2); // 2.5
        assert_eq!(round_half_even(7, 2), 4); // 3.5
    }

    #[test]
    fn test_round_half_even_non_ties() {
        assert_eq!(round_half_even(249, 100), 2);
        assert_eq!(round_half_even(251, 100), 3);
        assert_eq!(round_half_even(100, 100), 1);
        assert_eq!(round_half_even(0, 7), 0);
    }

    #[test]
    fn test_round_half_even_negative_mirrors_positive() {
        assert_eq!(round_half_even(-1, 2), 0);
        assert_eq!(round_half_even(-3, 2), -2);
        assert_eq!(round_half_even(-5, 2), -2);
        assert_eq!(round_half_even(-26, 10), -3);
        assert_eq!(round_half_even(-24, 10), -2);
    }

    #[test]
    fn test_round_half_even_negative_denominator() {
        assert_eq!(round_half_even(5, -2), -2);
        assert_eq!(round_half_even(-7, -2), 4);
    }

    #[test]
    fn test_percent_of() {
        let amount = Money::from_cents(1000);
        assert_eq!(amount.percent_of(Percentage::new(20)).cents(), 200);
        assert_eq!(amount.percent_of(Percentage::zero()).cents(), 0);
        assert_eq!(amount.percent_of(Percentage::new(100)).cents(), 1000);
    }

    #[test]
    fn test_percent_of_tie_rounds_to_even() {
        // 1050 × 7% = 73.5 → 74 (73 is odd)
        assert_eq!(Money::from_cents(1050).percent_of(Percentage::new(7)).cents(), 74);
        // 1150 × 7% = 80.5 → 80 (80 is even)
        assert_eq!(Money::from_cents(1150).percent_of(Percentage::new(7)).cents(), 80);
    }

    #[test]
    fn test_exclusive_of_inverts_percent() {
        let gross = Money::from_cents(1200);
        let net = gross.exclusive_of(Percentage::new(20));
        assert_eq!(net.cents(), 1000);
        assert_eq!((net + net.percent_of(Percentage::new(20))).cents(), 1200);
    }

    #[test]
    fn test_exclusive_of_rounds_half_to_even() {
        // 1 × 100 / 200 = 0.5 → 0 ; 3 × 100 / 200 = 1.5 → 2
        assert_eq!(Money::from_cents(1).exclusive_of(Percentage::new(100)).cents(), 0);
        assert_eq!(Money::from_cents(3).exclusive_of(Percentage::new(100)).cents(), 2);
        // 1000 × 100 / 107 = 934.579... → 935
        assert_eq!(Money::from_cents(1000).exclusive_of(Percentage::new(7)).cents(), 935);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic_saturates() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);
        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((b - a).cents(), 0);
        assert_eq!((a * 3).cents(), 3000);
        assert_eq!((Money::from_cents(u64::MAX) + a).cents(), u64::MAX);
    }

    #[test]
    fn test_checked_mul_quantity() {
        assert_eq!(
            Money::from_cents(1100).checked_mul_quantity(3),
            Some(Money::from_cents(3300))
        );
        assert_eq!(Money::from_cents(u64::MAX).checked_mul_quantity(2), None);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 3].into_iter().map(Money::from_cents).sum();
        assert_eq!(total.cents(), 353);
    }

    proptest! {
        #[test]
        fn rounding_stays_within_half_unit(n in -1_000_000_000i128..1_000_000_000, d in 1i128..10_000) {
            let rounded = round_half_even(n, d);
            // |n/d - rounded| <= 1/2  ⇔  |n - rounded·d| · 2 <= d
            prop_assert!((n - rounded * d).abs() * 2 <= d);
        }

        #[test]
        fn ties_always_land_on_even(k in -1_000_000i128..1_000_000) {
            // (2k + 1) / 2 is always exactly halfway
            let rounded = round_half_even(2 * k + 1, 2);
            prop_assert_eq!(rounded % 2, 0);
        }
    }
}
