//! Price Value Objects
//!
//! Amounts are integers in the currency's minor units (tiyn, cents).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency used when the seller does not pick one.
pub const DEFAULT_CURRENCY: &str = "KZT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    NotPositive { value: i64 },
    InvalidCurrency { value: String },
}

impl fmt::Display for PriceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPositive { value } => {
                write!(f, "Price must be greater than zero (got {value})")
            }
            Self::InvalidCurrency { value } => {
                write!(f, "Invalid currency '{value}'. Expected a 3-letter code such as KZT")
            }
        }
    }
}

impl std::error::Error for PriceError {}

// ============================================================================
// Price
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Price(i64);

impl Price {
    pub fn new(minor_units: i64) -> Result<Self, PriceError> {
        if minor_units <= 0 {
            return Err(PriceError::NotPositive { value: minor_units });
        }
        Ok(Self(minor_units))
    }

    pub fn from_db(minor_units: i64) -> Self {
        Self(minor_units)
    }

    #[inline]
    pub const fn minor_units(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Price {
    type Error = PriceError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for i64 {
    fn from(value: Price) -> Self {
        value.0
    }
}

// ============================================================================
// Currency
// ============================================================================

/// ISO 4217 style code: exactly three ASCII letters, stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    pub fn new(input: impl AsRef<str>) -> Result<Self, PriceError> {
        let value = input.as_ref().trim();
        if value.len() != 3 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(PriceError::InvalidCurrency {
                value: value.to_string(),
            });
        }
        Ok(Self(value.to_ascii_uppercase()))
    }

    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self(DEFAULT_CURRENCY.to_string())
    }
}

impl TryFrom<String> for Currency {
    type Error = PriceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
