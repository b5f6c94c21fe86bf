//! # Checked Arithmetic
//!
//! Traits and utilities for safe currency arithmetic.
//!
//! This module provides:
//! - [`ArithmeticError`] - Error type for arithmetic failures
//! - [`CheckedArithmetic`] - Trait for safe arithmetic operations
//! - [`Rounding`] - Explicit midpoint strategy for currency output
//! - [`round_currency`] - Rounds a value to cents with the fixed strategy
//!
//! Prices are composed at full precision and only rounded at the point of
//! output, using [`CURRENCY_ROUNDING`] (round half up, i.e. midpoint away
//! from zero).
//!
//! # Examples
//!
//! ```
//! use protection_quote::domain::value_objects::arithmetic::{round_currency, CheckedArithmetic};
//! use rust_decimal::Decimal;
//!
//! let price = Decimal::new(199, 0).safe_mul(Decimal::new(18, 1)).unwrap();
//! assert_eq!(round_currency(price), Decimal::new(35820, 2));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of decimal places kept for currency values.
pub const CURRENCY_DECIMALS: u32 = 2;

/// Rounding strategy used for every currency value leaving the core.
pub const CURRENCY_ROUNDING: Rounding = Rounding::HalfUp;

/// Error type for arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ArithmeticError {
    /// Arithmetic operation resulted in overflow.
    #[error("arithmetic overflow")]
    Overflow,

    /// Arithmetic operation resulted in underflow.
    #[error("arithmetic underflow")]
    Underflow,

    /// Division by zero attempted.
    #[error("division by zero")]
    DivisionByZero,

    /// Invalid value provided (e.g., negative when positive required).
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
}

/// Result type for arithmetic operations.
pub type ArithmeticResult<T> = Result<T, ArithmeticError>;

/// Midpoint strategy for rounding to a fixed number of decimal places.
///
/// # Examples
///
/// ```
/// use protection_quote::domain::value_objects::arithmetic::Rounding;
/// use rust_decimal::Decimal;
///
/// let value = Decimal::new(1025, 3); // 1.025
/// assert_eq!(Rounding::HalfUp.apply(value, 2), Decimal::new(103, 2));
/// assert_eq!(Rounding::HalfEven.apply(value, 2), Decimal::new(102, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Midpoints round away from zero (commercial rounding).
    HalfUp,
    /// Midpoints round to the nearest even digit (banker's rounding).
    HalfEven,
}

impl Rounding {
    /// Rounds `value` to `decimals` places with this strategy.
    #[inline]
    #[must_use]
    pub fn apply(self, value: Decimal, decimals: u32) -> Decimal {
        let strategy = match self {
            Self::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            Self::HalfEven => RoundingStrategy::MidpointNearestEven,
        };
        value.round_dp_with_strategy(decimals, strategy)
    }
}

impl fmt::Display for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HalfUp => write!(f, "HalfUp"),
            Self::HalfEven => write!(f, "HalfEven"),
        }
    }
}

/// Rounds a currency value to cents using [`CURRENCY_ROUNDING`].
#[inline]
#[must_use]
pub fn round_currency(value: Decimal) -> Decimal {
    CURRENCY_ROUNDING.apply(value, CURRENCY_DECIMALS)
}

/// Multiplies all factors together with overflow checking.
///
/// An empty slice yields `Decimal::ONE`.
///
/// # Errors
///
/// Returns `ArithmeticError::Overflow` if any intermediate product overflows.
pub fn checked_product(factors: &[Decimal]) -> ArithmeticResult<Decimal> {
    factors
        .iter()
        .try_fold(Decimal::ONE, |acc, factor| acc.safe_mul(*factor))
}

/// Trait for checked arithmetic operations.
///
/// Provides safe arithmetic methods that return `Result` instead of
/// panicking on overflow, underflow, or division by zero.
pub trait CheckedArithmetic: Sized {
    /// Safely add two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely subtract two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Underflow` if the result would underflow.
    fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely multiply two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely divide two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::DivisionByZero` if the divisor is zero.
    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self>;
}

impl CheckedArithmetic for Decimal {
    #[inline]
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_add(rhs).ok_or(ArithmeticError::Overflow)
    }

    #[inline]
    fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_sub(rhs).ok_or(ArithmeticError::Underflow)
    }

    #[inline]
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_mul(rhs).ok_or(ArithmeticError::Overflow)
    }

    #[inline]
    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self> {
        if rhs.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        self.checked_div(rhs).ok_or(ArithmeticError::Overflow)
    }
}
