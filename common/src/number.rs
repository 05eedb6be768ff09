//! Fixed-precision decimal numbers.

use std::cmp::Ordering;
use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{CurrencyError, CurrencyResult};

/// Largest number of fractional digits a [`Number`] can carry.
pub const MAX_PRECISION: u32 = 28;

/// Exact decimal number with a fixed count of fractional digits.
///
/// Arithmetic keeps the precision of the left operand and fails with
/// [`CurrencyError::PrecisionLoss`] rather than rounding. Numbers of different
/// precision are never ordered against each other.
///
/// Serialized as decimal text; the number of fractional digits in the text
/// is the precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Number {
    value: Decimal,
    precision: u32,
}

impl Number {
    /// Create a number from its whole part and `frac` units of `10^-precision`.
    ///
    /// Fails with [`CurrencyError::Overflow`] if `frac` makes up one whole unit
    /// or more.
    pub fn new(whole: u64, frac: u64, precision: u32) -> CurrencyResult<Self> {
        if precision > MAX_PRECISION {
            return Err(CurrencyError::Overflow(format!(
                "precision {} exceeds {}",
                precision, MAX_PRECISION
            )));
        }
        let frac = Decimal::try_from_i128_with_scale(i128::from(frac), precision)
            .map_err(|_| CurrencyError::Overflow(format!("{} at precision {}", frac, precision)))?;
        if frac >= Decimal::ONE {
            return Err(CurrencyError::Overflow(format!(
                "fraction {} is not below one",
                frac
            )));
        }
        let value = Decimal::from(whole)
            .checked_add(frac)
            .ok_or_else(|| CurrencyError::Overflow(format!("{}+{}", whole, frac)))?;
        Self::from_decimal(value, precision)
    }

    /// Zero at the given precision.
    pub fn zero(precision: u32) -> Self {
        Self {
            value: Self::rescaled(Decimal::ZERO, precision),
            precision,
        }
    }

    /// One at the given precision.
    pub fn one(precision: u32) -> Self {
        Self {
            value: Self::rescaled(Decimal::ONE, precision),
            precision,
        }
    }

    /// Wrap a decimal that must be representable at `precision` exactly.
    pub fn from_decimal(value: Decimal, precision: u32) -> CurrencyResult<Self> {
        let rounded = value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
        if rounded != value || precision > MAX_PRECISION {
            return Err(CurrencyError::PrecisionLoss {
                value: value.to_string(),
                precision,
            });
        }
        Ok(Self {
            value: Self::rescaled(value, precision),
            precision,
        })
    }

    /// Round a decimal half away from zero to `precision` digits.
    pub fn round_from(value: Decimal, precision: u32) -> CurrencyResult<Self> {
        let rounded = value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
        Self::from_decimal(rounded, precision)
    }

    /// Parse decimal text, which must fit into `precision` fractional digits.
    pub fn parse(text: &str, precision: u32) -> CurrencyResult<Self> {
        let value = Decimal::from_str_exact(text.trim())
            .map_err(|_| CurrencyError::InvalidNumber(text.to_string()))?;
        Self::from_decimal(value, precision)
    }

    /// Underlying decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Number of fractional digits.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.value.is_sign_negative() && !self.value.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.value.is_sign_positive() && !self.value.is_zero()
    }

    /// Add numbers, keeping the precision of `self`.
    pub fn add(&self, other: &Number) -> CurrencyResult<Number> {
        let value = self
            .value
            .checked_add(other.value)
            .ok_or_else(|| CurrencyError::Overflow(format!("{} + {}", self, other)))?;
        Self::from_decimal(value, self.precision)
    }

    /// Subtract numbers, keeping the precision of `self`.
    pub fn sub(&self, other: &Number) -> CurrencyResult<Number> {
        let value = self
            .value
            .checked_sub(other.value)
            .ok_or_else(|| CurrencyError::Overflow(format!("{} - {}", self, other)))?;
        Self::from_decimal(value, self.precision)
    }

    /// Negate the number.
    pub fn neg(&self) -> Number {
        Self {
            value: -self.value,
            precision: self.precision,
        }
    }

    /// Absolute value.
    pub fn abs(&self) -> Number {
        Self {
            value: self.value.abs(),
            precision: self.precision,
        }
    }

    fn rescaled(mut value: Decimal, precision: u32) -> Decimal {
        value.rescale(precision);
        value
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.precision != other.precision {
            return None;
        }
        Some(self.value.cmp(&other.value))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.*}", self.precision as usize, self.value)
    }
}

impl From<Number> for String {
    fn from(number: Number) -> Self {
        number.to_string()
    }
}

impl TryFrom<String> for Number {
    type Error = CurrencyError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        let value = Decimal::from_str_exact(text.trim())
            .map_err(|_| CurrencyError::InvalidNumber(text.clone()))?;
        Self::from_decimal(value, value.scale())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_number() {
        let n = Number::new(12, 34, 2).unwrap();
        assert_eq!(n.value(), dec!(12.34));
        assert_eq!(n.precision(), 2);
        assert_eq!(n.to_string(), "12.34");

        let n = Number::new(4, 3000, 4).unwrap();
        assert_eq!(n.to_string(), "4.3000");
    }

    #[test]
    fn test_new_number_overflow() {
        assert!(matches!(Number::new(1, 100, 2), Err(CurrencyError::Overflow(_))));
        assert!(matches!(Number::new(1, 1, 0), Err(CurrencyError::Overflow(_))));
        assert!(Number::new(1, 99, 2).is_ok());
    }

    #[test]
    fn test_arithmetic_keeps_precision() {
        let a = Number::parse("10.25", 2).unwrap();
        let b = Number::parse("0.75", 2).unwrap();

        let sum = a.add(&b).unwrap();
        assert_eq!(sum.to_string(), "11.00");
        assert_eq!(sum.precision(), 2);

        let diff = b.sub(&a).unwrap();
        assert_eq!(diff.to_string(), "-9.50");
        assert_eq!(diff.neg().to_string(), "9.50");
    }

    #[test]
    fn test_mixed_precision_is_rejected() {
        let amount = Number::parse("1.00", 2).unwrap();
        let rate = Number::parse("0.0001", 4).unwrap();

        assert!(matches!(
            amount.add(&rate),
            Err(CurrencyError::PrecisionLoss { precision: 2, .. })
        ));
        // Exact values survive even when precisions differ.
        let whole = Number::parse("2.0000", 4).unwrap();
        assert_eq!(amount.add(&whole).unwrap().to_string(), "3.00");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Number::parse("4.3", 4).unwrap().to_string(), "4.3000");
        assert!(matches!(
            Number::parse("4.30001", 4),
            Err(CurrencyError::PrecisionLoss { .. })
        ));
        assert!(matches!(
            Number::parse("four", 4),
            Err(CurrencyError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_round_from() {
        let n = Number::round_from(dec!(1.005), 2).unwrap();
        assert_eq!(n.to_string(), "1.01");
        let n = Number::round_from(dec!(-1.005), 2).unwrap();
        assert_eq!(n.to_string(), "-1.01");
    }

    #[test]
    fn test_ordering_requires_same_precision() {
        let a = Number::parse("1.00", 2).unwrap();
        let b = Number::parse("2.00", 2).unwrap();
        let c = Number::parse("1.0000", 4).unwrap();

        assert!(a < b);
        assert_ne!(a, c);
        assert_eq!(a.partial_cmp(&c), None);
    }

    #[test]
    fn test_serde_as_text() {
        let n = Number::parse("4.2500", 4).unwrap();
        let json = serde_json::to_string(&n).unwrap();
        assert_eq!(json, "\"4.2500\"");

        let back: Number = serde_json::from_str(&json).unwrap();
        assert_eq!(back, n);
        assert_eq!(back.precision(), 4);
    }
}
