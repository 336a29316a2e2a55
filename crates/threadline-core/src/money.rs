//! # Money Module
//!
//! Provides the `Money` type for handling rupee amounts safely.
//!
//! ## Why Integer Paise?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The storefront API sends amounts as JSON numbers in rupees:           │
//! │    { "totalPrice": 649.5 }                                              │
//! │                                                                         │
//! │  Summing those as f64 drifts (0.1 + 0.2 = 0.30000000000000004).         │
//! │                                                                         │
//! │  OUR SOLUTION: convert at the wire boundary                             │
//! │    649.5 rupees ──► 64950 paise (i64) ──► all math in integers         │
//! │    64950 paise  ──► 649.5 rupees when serialized back                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use threadline_core::money::Money;
//!
//! let price = Money::from_paise(64950); // ₹649.50
//! let doubled = price * 2;              // ₹1299.00
//! assert_eq!(doubled.paise(), 129900);
//! assert_eq!(price.to_string(), "₹649.50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::error::CoreError;
use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paise (1/100 rupee).
///
/// ## Wire Encoding
/// Serialized as a rupee number (`600`, `649.5`) because that is what the
/// backend sends and expects. Internally always integer paise.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(try_from = "f64", into = "f64")]
#[ts(export)]
pub struct Money(#[ts(type = "number")] i64);

impl Money {
    /// Creates a Money value from paise.
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    ///
    /// ```rust
    /// use threadline_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupees(500).paise(), 50000);
    /// ```
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion (truncated towards zero).
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is greater than zero.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is less than zero.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax to the nearest paisa (half away from zero).
    ///
    /// ```rust
    /// use threadline_core::money::Money;
    /// use threadline_core::types::TaxRate;
    ///
    /// let tax = Money::from_paise(1000).calculate_tax(TaxRate::from_bps(1800));
    /// assert_eq!(tax.paise(), 180);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        Money(div_round_half_away(
            self.0 as i128 * rate.bps() as i128,
            10_000,
        ))
    }

    /// Calculates tax rounded to the nearest whole rupee.
    ///
    /// A single rounding step over the exact product, so an exact tax of
    /// ₹2.495 becomes ₹2 (not ₹2.50 → ₹3).
    ///
    /// ```rust
    /// use threadline_core::money::Money;
    /// use threadline_core::types::TaxRate;
    ///
    /// let tax = Money::from_rupees(600).calculate_tax_to_rupee(TaxRate::from_bps(1800));
    /// assert_eq!(tax, Money::from_rupees(108));
    /// ```
    pub fn calculate_tax_to_rupee(&self, rate: TaxRate) -> Money {
        let rupees = div_round_half_away(self.0 as i128 * rate.bps() as i128, 1_000_000);
        Money::from_rupees(rupees)
    }

    /// Rounds to the nearest whole rupee (half away from zero).
    pub fn round_to_rupee(&self) -> Money {
        Money::from_rupees(div_round_half_away(self.0 as i128, 100))
    }
}

fn div_round_half_away(numerator: i128, denominator: i128) -> i64 {
    let half = denominator / 2;
    let rounded = if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    };
    rounded as i64
}

// =============================================================================
// Wire Conversions
// =============================================================================

impl TryFrom<f64> for Money {
    type Error = CoreError;

    fn try_from(rupees: f64) -> Result<Self, Self::Error> {
        if !rupees.is_finite() {
            return Err(CoreError::InvalidAmount {
                reason: format!("{rupees} is not a finite amount"),
            });
        }
        Ok(Money((rupees * 100.0).round() as i64))
    }
}

impl From<Money> for f64 {
    fn from(money: Money) -> Self {
        money.0 as f64 / 100.0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly rupee rendering. Screens localize on their own.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}₹{}.{:02}",
            sign,
            self.rupees().abs(),
            self.paise_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_paise(64950).to_string(), "₹649.50");
        assert_eq!(Money::from_paise(-550).to_string(), "-₹5.50");
        assert_eq!(Money::zero().to_string(), "₹0.00");
    }

    #[test]
    fn test_deserialize_rupee_numbers() {
        let whole: Money = serde_json::from_str("600").unwrap();
        assert_eq!(whole.paise(), 60000);

        let fractional: Money = serde_json::from_str("649.5").unwrap();
        assert_eq!(fractional.paise(), 64950);

        // 0.1 + 0.2 style noise is absorbed at the boundary
        let noisy: Money = serde_json::from_str("0.30000000000000004").unwrap();
        assert_eq!(noisy.paise(), 30);
    }

    #[test]
    fn test_serialize_as_rupees() {
        let json = serde_json::to_string(&Money::from_paise(64950)).unwrap();
        assert_eq!(json, "649.5");
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(Money::try_from(f64::NAN).is_err());
        assert!(Money::try_from(f64::INFINITY).is_err());
    }

    #[test]
    fn test_tax_to_rupee_single_rounding() {
        let rate = TaxRate::from_bps(1800);
        assert_eq!(
            Money::from_rupees(600).calculate_tax_to_rupee(rate),
            Money::from_rupees(108)
        );
        // 0.18 × 13.75 = 2.475 → ₹2
        assert_eq!(
            Money::from_paise(1375).calculate_tax_to_rupee(rate),
            Money::from_rupees(2)
        );
        // 0.18 × 25 = 4.5 → ₹5 (half rounds up like Math.round)
        assert_eq!(
            Money::from_rupees(25).calculate_tax_to_rupee(rate),
            Money::from_rupees(5)
        );
    }

    #[test]
    fn test_round_to_rupee() {
        assert_eq!(Money::from_paise(64950).round_to_rupee(), Money::from_rupees(650));
        assert_eq!(Money::from_paise(64949).round_to_rupee(), Money::from_rupees(649));
        assert_eq!(Money::from_paise(-150).round_to_rupee(), Money::from_rupees(-2));
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_rupees(10);
        let b = Money::from_paise(550);
        assert_eq!((a + b).paise(), 1550);
        assert_eq!((a - b).paise(), 450);
        assert_eq!((b * 3).paise(), 1650);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.paise(), 2100);
    }
}
