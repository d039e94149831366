//! Human-readable price parsing.
//!
//! This module provides [`Price`], a non-negative decimal amount used for
//! catalog items and purchase requests.
//!
//! # Supported Formats
//!
//! - Plain numbers: `"100"`, `"29.99"`
//! - With currency symbols: `"$10.50"`
//! - With thousand separators: `"1,200.00"`
//! - Scientific notation: `"1e3"`, `"2.5E2"`
//! - JSON numbers: `29.99`, `1000`
//!
//! # Example
//!
//! ```rust
//! use paygate_types::util::Price;
//!
//! let price = Price::parse("$1,200.50").unwrap();
//! assert_eq!(price.to_string(), "1200.50");
//! ```

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static DECORATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s$€£¥,]+").expect("valid regex"));
static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(\d+\.?\d*|\.\d+)([eE][-+]?\d+)?$").expect("valid regex")
});

/// A non-negative price with decimal precision.
///
/// Serialized as a JSON number. Deserialized from either a JSON number or a
/// string accepted by [`Price::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Price(Decimal);

/// Errors that can occur when parsing a price.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PriceParseError {
    /// The input could not be parsed as a number.
    #[error("Invalid price format")]
    InvalidFormat,
    /// Negative values are not allowed.
    #[error("Negative price is not allowed")]
    Negative,
}

impl Price {
    /// Parses a human-readable price.
    ///
    /// Currency symbols, thousand separators and whitespace are stripped
    /// before parsing. What remains must be a plain or scientific decimal
    /// number; any other character is [`PriceParseError::InvalidFormat`].
    pub fn parse(input: &str) -> Result<Self, PriceParseError> {
        let cleaned = DECORATION.replace_all(input, "");
        if !NUMBER.is_match(&cleaned) {
            return Err(PriceParseError::InvalidFormat);
        }
        let parsed = if cleaned.contains(['e', 'E']) {
            Decimal::from_scientific(&cleaned)
        } else {
            Decimal::from_str(&cleaned)
        }
        .map_err(|_| PriceParseError::InvalidFormat)?;
        Self::try_from(parsed)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceParseError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(PriceParseError::Negative);
        }
        Ok(Price(value))
    }
}

impl From<u32> for Price {
    fn from(value: u32) -> Self {
        Price(Decimal::from(value))
    }
}

impl FromStr for Price {
    type Err = PriceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Price::parse(s)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let value = self
            .0
            .to_f64()
            .ok_or_else(|| serde::ser::Error::custom("price is not representable as f64"))?;
        serializer.serialize_f64(value)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PriceVisitor;

        impl Visitor<'_> for PriceVisitor {
            type Value = Price;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a non-negative price as a number or a string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Price::parse(v).map_err(E::custom)
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Price(Decimal::from(v)))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Price::try_from(Decimal::from(v)).map_err(E::custom)
            }

            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let decimal = Decimal::from_f64(v)
                    .ok_or_else(|| E::custom(PriceParseError::InvalidFormat))?;
                Price::try_from(decimal.normalize()).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(PriceVisitor)
    }
}
