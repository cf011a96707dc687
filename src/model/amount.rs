//! Amount type for contributor cells.
//!
//! A cell in a contributor column is a plain decimal number. An empty cell is a valid amount and
//! means zero, which is how rows written before a contributor joined are stored.

use crate::error::CellError;
use serde::Serialize;
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// Represents an amount of money contributed by one person in one row.
///
/// # Examples
///
/// Empty cells are zero:
/// ```
/// # use chipin::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("").unwrap();
/// assert!(amount.is_zero());
/// ```
///
/// Amounts are written back as plain decimal text:
/// ```
/// # use chipin::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str(" 20.10 ").unwrap();
/// assert_eq!(amount.to_string(), "20.1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct Amount(f64);

impl Amount {
    pub const ZERO: Amount = Amount(0.0);

    /// Creates an amount from a finite value.
    pub fn new(value: f64) -> Result<Self, CellError> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(CellError::Amount(value.to_string()))
        }
    }

    /// Returns the underlying value.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    /// Returns true if the amount is negative, i.e. a correction.
    pub fn is_negative(&self) -> bool {
        self.0 < 0.0
    }
}

impl FromStr for Amount {
    type Err = CellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Amount::ZERO);
        }
        let value = trimmed
            .parse::<f64>()
            .map_err(|_| CellError::Amount(s.to_string()))?;
        Amount::new(value).map_err(|_| CellError::Amount(s.to_string()))
    }
}

impl fmt::Display for Amount {
    /// Shortest plain decimal text that parses back to the same value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl From<Amount> for f64 {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

/// Coerces caller-supplied values into an `Amount`.
///
/// Numbers convert directly, strings are parsed with the same rules as CSV cells.
pub trait IntoAmount {
    fn into_amount(self) -> Result<Amount, CellError>;
}

impl IntoAmount for Amount {
    fn into_amount(self) -> Result<Amount, CellError> {
        Ok(self)
    }
}

impl IntoAmount for f64 {
    fn into_amount(self) -> Result<Amount, CellError> {
        Amount::new(self)
    }
}

impl IntoAmount for i32 {
    fn into_amount(self) -> Result<Amount, CellError> {
        Amount::new(f64::from(self))
    }
}

impl IntoAmount for &str {
    fn into_amount(self) -> Result<Amount, CellError> {
        Amount::from_str(self)
    }
}

impl IntoAmount for String {
    fn into_amount(self) -> Result<Amount, CellError> {
        Amount::from_str(&self)
    }
}
