//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The store API speaks decimal numbers:  "price": 12.99                  │
//! │                                                                         │
//! │  Summing them as floats drifts:                                         │
//! │    12.99 × 3 = 38.970000000000006  ❌ WRONG!                            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    1299 cents × 3 = 3897 cents  ✅                                      │
//! │    Decimal ↔ cents conversion happens ONLY at the serde boundary       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kabob_core::money::Money;
//!
//! let price = Money::from_cents(1299); // $12.99
//! let line_total = price.multiply_quantity(3);
//! assert_eq!(line_total.cents(), 3897);
//! ```

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Wire Format
/// On the wire money is a plain decimal number (`12.99`). Serialization
/// divides by 100; deserialization rounds to the nearest cent and rejects
/// negative or non-finite amounts, since neither a price nor an order total
/// can be below zero.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  MenuItem.price ──► CartLine.unit_price ──► CartLine.line_total         │
/// │                                                   │                     │
/// │                                                   ▼                     │
/// │                                            Cart::total()                │
/// │                                                                         │
/// │  OrderRecord.total_amount ──► History view                              │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Largest amount accepted from a decimal, $10,000,000.00.
    ///
    /// Keeps `price × MAX_CART_QUANTITY` summed over any realistic cart
    /// far inside `i64`.
    pub const MAX_DECIMAL_CENTS: i64 = 1_000_000_000;

    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use kabob_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from a decimal amount, rounding to the nearest cent.
    ///
    /// Returns `None` for negative, NaN or infinite input, and for amounts
    /// above [`Money::MAX_DECIMAL_CENTS`].
    ///
    /// ## Example
    /// ```rust
    /// use kabob_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(12.99).unwrap().cents(), 1299);
    /// assert!(Money::from_decimal(-1.0).is_none());
    /// ```
    pub fn from_decimal(amount: f64) -> Option<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return None;
        }
        let cents = (amount * 100.0).round();
        if cents > Self::MAX_DECIMAL_CENTS as f64 {
            return None;
        }
        Some(Money(cents as i64))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the amount as a decimal number, for the wire only.
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use kabob_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(499);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 1497);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `$12.99`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Money::from_decimal(amount).ok_or_else(|| {
            de::Error::custom(format!(
                "amount must be a finite number between 0 and {}, got {}",
                Money::from_cents(Money::MAX_DECIMAL_CENTS),
                amount
            ))
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
