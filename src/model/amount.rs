//! Amount type for handling monetary values with optional dollar signs.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles parsing values that
//! may or may not include a dollar sign and commas. It is also the boundary between decimal major
//! units (what people type) and the integer cents the ledger engine works in.

use crate::model::Cents;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents how dollar amounts were (or should be) formatted.
///
/// # Examples
///  - `AmountFormat{ dollar: true, commas: true }` -> `-$60,000.00`
///  - `AmountFormat{ dollar: false, commas: true }` -> `-60,000.00`
///  - `AmountFormat{ dollar: false, commas: false }` -> `-60000.00`
///  - `AmountFormat{ dollar: true, commas: false }` -> `-$60000.00`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AmountFormat {
    /// Whether a dollar sign is present in the formatting.
    dollar: bool,
    /// Whether commas are present as thousands separators in the formatting.
    commas: bool,
}

impl Default for AmountFormat {
    fn default() -> Self {
        DEFAULT_FORMAT
    }
}

/// The default format has a dollar sign and commas: e.g. `-$60,000.00`.
const DEFAULT_FORMAT: AmountFormat = AmountFormat {
    dollar: true,
    commas: true,
};

/// Amounts are stored with a dollar sign but no commas, which writes the exact decimal value.
const STORAGE_FORMAT: AmountFormat = AmountFormat {
    dollar: true,
    commas: false,
};

/// The largest expense accepted, in cents: one trillion dollars. Amounts up to this size display
/// exactly and many of them can be added together without overflowing `Cents`.
pub const MAX_CENTS: Cents = 100_000_000_000_000;

/// Represents a dollar amount.
///
/// Formatting is considered significant for the purposes of equality, so for numeric comparisons,
/// you should access the `Decimal` value and use that.
///
/// # Examples
///
/// ```
/// # use trip_ledger::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("$12.345").unwrap();
/// assert_eq!(amount.to_cents(), Some(1235));
/// assert_eq!(Amount::from_cents(-1250).to_string(), "-$12.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    /// The parsed numerical value.
    value: Decimal,
    /// The way the numerical value was parsed from, or should be written to, a `String`.
    format: AmountFormat,
}

impl Amount {
    /// Creates a new Amount from a Decimal value with default `String` formatting.
    pub const fn new(value: Decimal) -> Self {
        Self {
            value,
            format: DEFAULT_FORMAT,
        }
    }

    /// Creates an Amount in major units from a signed number of cents.
    pub fn from_cents(cents: Cents) -> Self {
        Self::new(Decimal::new(cents, 2))
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Converts to integer cents, rounding to the nearest cent with midpoints away from zero.
    /// Returns `None` if the value does not fit in `Cents`.
    pub fn to_cents(&self) -> Option<Cents> {
        self.value
            .checked_mul(Decimal::ONE_HUNDRED)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
    }

    /// Rounds to whole cents and returns them if the result is a usable expense amount, that is
    /// at least one cent and at most [`MAX_CENTS`].
    pub fn to_expense_cents(&self) -> Option<Cents> {
        self.to_cents().filter(|cents| (1..=MAX_CENTS).contains(cents))
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value().is_zero()
    }

    /// Returns true if the amount is positive.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.value().is_sign_positive()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.value().is_sign_negative()
    }
}

/// An error that can occur when parsing strings into `Decimal` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut dollar_sign = false;
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        let without_dollar = if let Some(after_minus) = trimmed.strip_prefix('-') {
            if let Some(after_dollar) = after_minus.strip_prefix('$') {
                dollar_sign = true;
                format!("-{after_dollar}")
            } else {
                trimmed.to_string()
            }
        } else if let Some(after_dollar) = trimmed.strip_prefix('$') {
            dollar_sign = true;
            after_dollar.to_string()
        } else {
            trimmed.to_string()
        };

        // Remove commas (thousand separators)
        let without_commas = without_dollar.replace(',', "");
        let commas = without_commas.len() < without_dollar.len();

        // JSON numbers can arrive in exponent form, e.g. `1e3`
        let value = Decimal::from_str(&without_commas)
            .or_else(|_| Decimal::from_scientific(&without_commas))
            .map_err(AmountError)?;
        Ok(Amount {
            value,
            format: AmountFormat {
                dollar: dollar_sign,
                commas,
            },
        })
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sign, num) = if self.is_negative() {
            (String::from("-"), self.value().abs())
        } else {
            (String::new(), self.value().abs())
        };

        let dol = if self.format.dollar {
            String::from("$")
        } else {
            String::new()
        };

        if self.format.commas {
            write!(
                f,
                "{sign}{dol}{}",
                format_num::format_num!(",.2", num.to_f64().unwrap_or_default())
            )
        } else {
            write!(f, "{sign}{dol}{num}")
        }
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let stored = Amount {
            value: self.value,
            format: STORAGE_FORMAT,
        };
        serializer.serialize_str(&stored.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
