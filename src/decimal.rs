//! Arbitrary-precision decimal numbers.
//!
//! [`Decimal`] stores an unscaled [`BigInt`] and a scale, so `12.50` keeps both of its
//! fractional digits. Converters write it as text by default, which no mode can round
//! or truncate; [`DecimalFormat::Number`](crate::DecimalFormat) writes a float instead.
//!
//! ```rust
//! use serde_fluent::Decimal;
//!
//! let price: Decimal = "12.50".parse().unwrap();
//! assert_eq!(price.scale(), 2);
//! assert_eq!(price.to_string(), "12.50");
//! ```

use crate::{context, DecimalFormat, Error};
use num_bigint::{BigInt, Sign};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A decimal number of unbounded precision: `unscaled × 10^-scale`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decimal {
    unscaled: BigInt,
    scale: u32,
}

impl Decimal {
    #[must_use]
    pub fn new(unscaled: BigInt, scale: u32) -> Self {
        Decimal { unscaled, scale }
    }

    #[must_use]
    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    #[must_use]
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Lossy conversion to `f64`.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal::new(BigInt::from(value), 0)
    }
}

impl From<BigInt> for Decimal {
    fn from(value: BigInt) -> Self {
        Decimal::new(value, 0)
    }
}

impl FromStr for Decimal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::custom(format!("invalid decimal `{}`", s));
        let trimmed = s.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let digits = format!("{}{}", int_part, frac_part);
        let magnitude = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(invalid)?;
        let unscaled = if negative { -magnitude } else { magnitude };
        let scale = u32::try_from(frac_part.len()).map_err(|_| invalid())?;
        Ok(Decimal::new(unscaled, scale))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.unscaled.magnitude().to_string();
        let sign = if self.unscaled.sign() == Sign::Minus { "-" } else { "" };
        let scale = self.scale as usize;

        if scale == 0 {
            return write!(f, "{}{}", sign, digits);
        }

        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale - digits.len() + 1), digits)
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{}{}.{}", sign, int_part, frac_part)
    }
}

impl Serialize for Decimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let format = context::current().map_or(DecimalFormat::default(), |c| c.options().decimal);
        match format {
            DecimalFormat::String => serializer.collect_str(self),
            DecimalFormat::Number => serializer.serialize_f64(self.to_f64()),
        }
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DecimalVisitor;

        impl<'de> de::Visitor<'de> for DecimalVisitor {
            type Value = Decimal;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a decimal number or decimal text")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Decimal, E> {
                value.parse().map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Decimal, E> {
                Ok(Decimal::from(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Decimal, E> {
                Ok(Decimal::from(BigInt::from(value)))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Decimal, E> {
                if !value.is_finite() {
                    return Err(E::custom(format!("{} is not a decimal", value)));
                }
                value.to_string().parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(DecimalVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        for text in ["0", "12.50", "-0.005", "123456789012345678901234567890.1"] {
            let decimal: Decimal = text.parse().unwrap();
            assert_eq!(decimal.to_string(), text);
        }
        assert_eq!("+.5".parse::<Decimal>().unwrap().to_string(), "0.5");
    }

    #[test]
    fn test_invalid() {
        for text in ["", ".", "1.2.3", "abc", "1e5", "--1"] {
            assert!(text.parse::<Decimal>().is_err(), "{} should not parse", text);
        }
    }

    #[test]
    fn test_scale_is_significant() {
        let a: Decimal = "1.0".parse().unwrap();
        let b: Decimal = "1.00".parse().unwrap();
        assert_ne!(a, b);
        assert_eq!(a.to_f64(), b.to_f64());
    }

    #[test]
    fn test_serializes_as_text_outside_converter() {
        let decimal: Decimal = "0.10".parse().unwrap();
        assert_eq!(crate::to_node(&decimal).unwrap(), crate::Node::from("0.10"));
    }
}
