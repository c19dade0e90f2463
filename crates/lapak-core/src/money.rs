//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! In floating point:
//!   0.1 + 0.2 = 0.30000000000000004   WRONG for money
//!
//! OUR SOLUTION: integer Rupiah
//!   The Indonesian Rupiah has no sub-unit in circulation, so the
//!   smallest currency unit IS the whole rupiah. Every monetary value
//!   in the system is an i64 amount of rupiah; derived values (percent
//!   discounts, tax) are rounded half-up to a whole rupiah at the point
//!   they are computed, never carried as fractions.
//! ```
//!
//! ## Usage
//! ```rust
//! use lapak_core::money::Money;
//! use lapak_core::types::Rate;
//!
//! let price = Money::new(10_000);
//! let line = price.times(2);              // Rp20.000
//! let tax = line.percent_of(Rate::from_bps(1000)); // 10% => Rp2.000
//! assert_eq!(tax.amount(), 2_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::Rate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole Rupiah.
///
/// ## Design Decisions
/// - **i64 (signed)**: change can be negative before the payment check,
///   and refunds stay representable
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from a whole-rupiah amount.
    #[inline]
    pub const fn new(amount: i64) -> Self {
        Money(amount)
    }

    /// Returns the amount in whole rupiah.
    #[inline]
    pub const fn amount(&self) -> i64 {
        self.0
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies by a quantity (line totals).
    #[inline]
    pub const fn times(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Computes a percentage of this amount, rounded half-up.
    ///
    /// Used for both percent discounts and tax. The rate is in basis
    /// points (1000 bps = 10%). Integer math in i128 so large carts
    /// cannot overflow:
    ///
    /// `(amount * bps + 5000) / 10000`
    ///
    /// The `+ 5000` term implements round-half-up (5000/10000 = 0.5),
    /// applied at each derived field rather than once at the end.
    ///
    /// ## Example
    /// ```rust
    /// use lapak_core::money::Money;
    /// use lapak_core::types::Rate;
    ///
    /// // 11% of Rp1.005 = 110.55 => rounds to Rp111
    /// let tax = Money::new(1_005).percent_of(Rate::from_bps(1100));
    /// assert_eq!(tax.amount(), 111);
    /// ```
    pub fn percent_of(&self, rate: Rate) -> Money {
        let raw = (self.0 as i128 * rate.bps() as i128 + 5_000) / 10_000;
        Money(raw as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money with Indonesian digit grouping.
///
/// For debugging and error messages; the API layer formats for locale.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        write!(f, "{}Rp{}", sign, grouped)
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

/// Multiplication by integer quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
