//! Charge amount and currency value objects.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Largest amount the provider accepts in a single charge (8 digits of minor units).
pub const MAX_CHARGE_AMOUNT: i64 = 99_999_999;

/// Amount to charge, in minor currency units (cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChargeAmount(i64);

impl ChargeAmount {
    pub fn new(minor_units: i64) -> Result<Self, ValidationError> {
        if !(1..=MAX_CHARGE_AMOUNT).contains(&minor_units) {
            return Err(ValidationError::out_of_range(
                "amount",
                1,
                MAX_CHARGE_AMOUNT,
                minor_units,
            ));
        }
        Ok(Self(minor_units))
    }

    pub fn minor_units(&self) -> i64 {
        self.0
    }
}

/// Three-letter ISO currency code, lowercase as the provider expects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    pub fn new(code: &str) -> Result<Self, ValidationError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ValidationError::empty_field("currency"));
        }
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::invalid_format(
                "currency",
                "expected a three-letter ISO code",
            ));
        }
        Ok(Self(code.to_ascii_lowercase()))
    }

    /// Euro, the currency charges default to.
    pub fn eur() -> Self {
        Self("eur".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::eur()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
