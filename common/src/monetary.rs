//! Currencies and currency-tagged amounts.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CurrencyError, CurrencyResult};
use crate::number::Number;

/// Currency symbol (ISO 4217 code).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CurrencySymbol(String);

impl CurrencySymbol {
    /// Create a new symbol from code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencySymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencySymbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Definition of a currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency {
    /// Currency symbol.
    pub symbol: CurrencySymbol,
    /// Fractional digits of amounts.
    pub amount_precision: u32,
    /// Fractional digits of rates to the base currency.
    pub rate_precision: u32,
}

impl Currency {
    /// Create a new currency definition.
    pub fn new(symbol: impl Into<CurrencySymbol>, amount_precision: u32, rate_precision: u32) -> Self {
        Self {
            symbol: symbol.into(),
            amount_precision,
            rate_precision,
        }
    }

    /// Polish zloty, the base currency of every report.
    pub fn pln() -> Self {
        Self::new("PLN", 2, 0)
    }

    pub fn eur() -> Self {
        Self::new("EUR", 2, 4)
    }

    /// The base currency.
    pub fn base() -> Self {
        Self::pln()
    }

    /// Check if this is the base currency.
    pub fn is_base(&self) -> bool {
        self.symbol == Self::base().symbol
    }

    /// Zero amount in this currency.
    pub fn zero(&self) -> Denom {
        Denom::zero(self.clone())
    }

    /// Parse an amount in this currency.
    pub fn amount(&self, text: &str) -> CurrencyResult<Denom> {
        Ok(Denom::new(
            self.clone(),
            Number::parse(text, self.amount_precision)?,
        ))
    }

    /// Parse a rate of this currency to the base currency.
    pub fn rate(&self, text: &str) -> CurrencyResult<Number> {
        Number::parse(text, self.rate_precision)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// Registered currency definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyRegistry {
    currencies: BTreeMap<CurrencySymbol, Currency>,
}

impl CurrencyRegistry {
    /// Registry holding only the base currency.
    pub fn new() -> Self {
        let mut currencies = BTreeMap::new();
        let base = Currency::base();
        currencies.insert(base.symbol.clone(), base);
        Self { currencies }
    }

    /// Registry holding PLN and EUR.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Currency::eur());
        registry
    }

    /// Register a currency. Redefining the base currency is ignored.
    pub fn register(&mut self, currency: Currency) {
        if currency.is_base() {
            return;
        }
        self.currencies.insert(currency.symbol.clone(), currency);
    }

    /// Look up a currency by symbol.
    pub fn get(&self, symbol: &CurrencySymbol) -> CurrencyResult<&Currency> {
        self.currencies
            .get(symbol)
            .ok_or_else(|| CurrencyError::UnknownCurrency(symbol.clone()))
    }

    /// Iterate over registered currencies ordered by symbol.
    pub fn iter(&self) -> impl Iterator<Item = &Currency> {
        self.currencies.values()
    }
}

impl Default for CurrencyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// An amount of currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Denom {
    /// Currency of the amount.
    pub currency: Currency,
    /// The amount.
    pub amount: Number,
}

impl Denom {
    /// Create a new amount.
    pub fn new(currency: Currency, amount: Number) -> Self {
        Self { currency, amount }
    }

    /// Zero in the given currency.
    pub fn zero(currency: Currency) -> Self {
        let amount = Number::zero(currency.amount_precision);
        Self { currency, amount }
    }

    /// Zero in the base currency.
    pub fn base_zero() -> Self {
        Self::zero(Currency::base())
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.amount.is_negative()
    }

    pub fn is_positive(&self) -> bool {
        self.amount.is_positive()
    }

    /// Add amounts of the same currency.
    pub fn add(&self, other: &Denom) -> CurrencyResult<Denom> {
        self.check_currency(other)?;
        Ok(Denom {
            currency: self.currency.clone(),
            amount: self.amount.add(&other.amount)?,
        })
    }

    /// Subtract amounts of the same currency.
    pub fn sub(&self, other: &Denom) -> CurrencyResult<Denom> {
        self.check_currency(other)?;
        Ok(Denom {
            currency: self.currency.clone(),
            amount: self.amount.sub(&other.amount)?,
        })
    }

    /// Negate the amount.
    pub fn neg(&self) -> Denom {
        Denom {
            currency: self.currency.clone(),
            amount: self.amount.neg(),
        }
    }

    /// Check if amount is greater than the other one.
    pub fn gt(&self, other: &Denom) -> CurrencyResult<bool> {
        self.check_currency(other)?;
        Ok(self.amount.value() > other.amount.value())
    }

    /// Check if amount is less than the other one.
    pub fn lt(&self, other: &Denom) -> CurrencyResult<bool> {
        self.check_currency(other)?;
        Ok(self.amount.value() < other.amount.value())
    }

    /// Larger of two amounts of the same currency.
    pub fn max(&self, other: &Denom) -> CurrencyResult<Denom> {
        Ok(if other.gt(self)? { other.clone() } else { self.clone() })
    }

    /// Smaller of two amounts of the same currency.
    pub fn min(&self, other: &Denom) -> CurrencyResult<Denom> {
        Ok(if other.lt(self)? { other.clone() } else { self.clone() })
    }

    /// Convert to the base currency.
    ///
    /// The product of amount and rate is rounded half away from zero to the
    /// base currency's amount precision. The rate must carry exactly the
    /// currency's rate precision.
    pub fn to_base(&self, rate: &Number) -> CurrencyResult<Denom> {
        if rate.precision() != self.currency.rate_precision {
            return Err(CurrencyError::PrecisionLoss {
                value: rate.to_string(),
                precision: self.currency.rate_precision,
            });
        }
        let product = self
            .amount
            .value()
            .checked_mul(rate.value())
            .ok_or_else(|| CurrencyError::Overflow(format!("{} * {}", self, rate)))?;
        let base = Currency::base();
        let amount = Number::round_from(product, base.amount_precision)?;
        Ok(Denom::new(base, amount))
    }

    /// Rate of `self` to `other`, `self / other` rounded to the rate precision
    /// of `other`'s currency.
    ///
    /// Two zero amounts give a zero rate; exactly one zero amount fails with
    /// [`CurrencyError::UndefinedRate`].
    pub fn rate(&self, other: &Denom) -> CurrencyResult<Number> {
        let precision = other.currency.rate_precision;
        match (self.is_zero(), other.is_zero()) {
            (true, true) => return Ok(Number::zero(precision)),
            (false, false) => {}
            _ => {
                return Err(CurrencyError::UndefinedRate {
                    numerator: self.to_string(),
                    denominator: other.to_string(),
                })
            }
        }
        let quotient = self
            .amount
            .value()
            .checked_div(other.amount.value())
            .ok_or_else(|| CurrencyError::Overflow(format!("{} / {}", self, other)))?;
        Number::round_from(quotient, precision)
    }

    fn check_currency(&self, other: &Denom) -> CurrencyResult<()> {
        if self.currency.symbol != other.currency.symbol {
            return Err(CurrencyError::CurrencyMismatch {
                expected: self.currency.symbol.clone(),
                actual: other.currency.symbol.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Denom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denom_operations() {
        let pln = Currency::pln();
        let a = pln.amount("100.00").unwrap();
        let b = pln.amount("50.25").unwrap();

        assert_eq!(a.add(&b).unwrap(), pln.amount("150.25").unwrap());
        assert_eq!(a.sub(&b).unwrap(), pln.amount("49.75").unwrap());
        assert_eq!(b.neg().to_string(), "-50.25 PLN");
        assert!(a.gt(&b).unwrap());
        assert_eq!(a.min(&b).unwrap(), b);
    }

    #[test]
    fn test_currency_mismatch() {
        let a = Currency::pln().amount("100.00").unwrap();
        let b = Currency::eur().amount("100.00").unwrap();

        assert!(matches!(
            a.add(&b),
            Err(CurrencyError::CurrencyMismatch { .. })
        ));
        assert!(a.lt(&b).is_err());
    }

    #[test]
    fn test_to_base() {
        let eur = Currency::eur();
        let amount = eur.amount("100.00").unwrap();
        let rate = eur.rate("4.3000").unwrap();

        let base = amount.to_base(&rate).unwrap();
        assert_eq!(base, Currency::pln().amount("430.00").unwrap());
    }

    #[test]
    fn test_to_base_rounds_half_away_from_zero() {
        let eur = Currency::eur();
        let rate = eur.rate("4.2525").unwrap();

        // 0.10 * 4.2525 = 0.42525
        let base = eur.amount("0.10").unwrap().to_base(&rate).unwrap();
        assert_eq!(base.to_string(), "0.43 PLN");
        let base = eur.amount("-0.10").unwrap().to_base(&rate).unwrap();
        assert_eq!(base.to_string(), "-0.43 PLN");
    }

    #[test]
    fn test_to_base_requires_rate_precision() {
        let eur = Currency::eur();
        let rate = Number::parse("4.30", 2).unwrap();
        assert!(eur.amount("1.00").unwrap().to_base(&rate).is_err());
    }

    #[test]
    fn test_rate() {
        let base = Currency::pln().amount("467.50").unwrap();
        let original = Currency::eur().amount("110.00").unwrap();

        let rate = base.rate(&original).unwrap();
        assert_eq!(rate.to_string(), "4.2500");
    }

    #[test]
    fn test_rate_with_zero() {
        let pln = Currency::pln();
        let eur = Currency::eur();

        let rate = pln.zero().rate(&eur.zero()).unwrap();
        assert!(rate.is_zero());
        assert_eq!(rate.precision(), 4);

        assert!(matches!(
            pln.amount("1.00").unwrap().rate(&eur.zero()),
            Err(CurrencyError::UndefinedRate { .. })
        ));
        assert!(matches!(
            pln.zero().rate(&eur.amount("1.00").unwrap()),
            Err(CurrencyError::UndefinedRate { .. })
        ));
    }

    #[test]
    fn test_registry() {
        let mut registry = CurrencyRegistry::with_defaults();
        assert_eq!(registry.get(&"eur".into()).unwrap(), &Currency::eur());
        assert!(registry.get(&"USD".into()).is_err());

        registry.register(Currency::new("USD", 2, 4));
        assert_eq!(registry.get(&"USD".into()).unwrap().rate_precision, 4);

        registry.register(Currency::new("PLN", 4, 4));
        assert_eq!(registry.get(&"PLN".into()).unwrap(), &Currency::pln());
    }
}
