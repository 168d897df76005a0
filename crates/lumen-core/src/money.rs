//! # Money Module
//!
//! Provides the `Money` type for the rounded figures of a quote.
//!
//! ## Two Stages of Precision
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CALCULATION (f64)                 PRESENTATION (Money, i64)            │
//! │                                                                         │
//! │  rawHardware  = 40000.0            hardware sell   = $57,143            │
//! │  markup       = 1.428571...  ───►  structural sell = $11,429            │
//! │  hardwareSell = 57142.857...       sellPrice       = $81,714            │
//! │                                                                         │
//! │  Rates and markups are fractional, so the engine computes in f64 and    │
//! │  rounds ONCE, per field, when the quote is assembled.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Proposals are priced in whole currency units, so `Money` counts units,
//! not cents.
//!
//! ## Usage
//! ```rust
//! use lumen_core::money::Money;
//!
//! let sell = Money::round_from(81_714.2857);
//! assert_eq!(sell.units(), 81_714);
//! assert_eq!(sell.to_string(), "$81,714");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole currency units.
///
/// ## Design Decisions
/// - **i64 (signed)**: differences between rounded figures can be negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Only built by rounding**: nothing converts back into the f64 pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Rounds an f64 amount to the nearest whole unit (half away from zero).
    ///
    /// Callers must hand in finite values; the calculator rejects non-finite
    /// and oversized figures before they get here. A non-finite value becomes zero rather
    /// than a saturated `i64::MAX`.
    ///
    /// ## Example
    /// ```rust
    /// use lumen_core::money::Money;
    ///
    /// assert_eq!(Money::round_from(2857.49).units(), 2857);
    /// assert_eq!(Money::round_from(2857.5).units(), 2858);
    /// ```
    pub fn round_from(amount: f64) -> Self {
        if !amount.is_finite() {
            return Money::zero();
        }
        Money(amount.round() as i64)
    }

    /// Returns the value in whole units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Returns the value as f64 (for ratios such as effective margin).
    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64
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

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display with a currency sign and thousands separators: `$81,714`.
///
/// ## Note
/// This is for logs and the CLI. The proposal renderer formats for locale.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        write!(f, "{}${}", sign, grouped)
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Arithmetic saturates at the i64 bounds instead of wrapping.
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

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
