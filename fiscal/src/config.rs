//! Fiscal-year configuration.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use uepik_common::{
    Contractor, Currency, CurrencyRegistry, CurrencySymbol, Denom, Number, Period, MAX_PRECISION,
};
use uepik_fx::{CurrencyOpening, CurrencyRateTable, RateEntry};

use crate::error::{FiscalError, FiscalResult};

/// Opening state of one currency bank account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyOpeningConfig {
    pub currency: CurrencySymbol,
    /// Balance in the account currency.
    pub original_sum: Number,
    /// Value of the balance in the base currency.
    pub base_sum: Number,
}

/// State carried over from previous fiscal years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningConfig {
    /// Profit of previous years not spent yet, in the base currency.
    pub unspent_profit: Number,
    #[serde(default)]
    pub currencies: Vec<CurrencyOpeningConfig>,
}

impl Default for OpeningConfig {
    fn default() -> Self {
        Self {
            unspent_profit: Number::zero(Currency::base().amount_precision),
            currencies: Vec::new(),
        }
    }
}

/// Everything needed to build a fiscal year besides its operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalYearConfig {
    /// The organization itself, used as contractor of internal documents.
    #[serde(default)]
    pub company: Contractor,
    pub period: Period,
    /// Currencies besides PLN and EUR.
    #[serde(default)]
    pub currencies: Vec<Currency>,
    #[serde(default)]
    pub rates: Vec<RateEntry>,
    #[serde(default)]
    pub opening: OpeningConfig,
}

impl FiscalYearConfig {
    /// Create an empty configuration of `period`.
    pub fn new(period: Period) -> Self {
        Self {
            company: Contractor::default(),
            period,
            currencies: Vec::new(),
            rates: Vec::new(),
            opening: OpeningConfig::default(),
        }
    }

    /// Parse configuration from JSON.
    pub fn from_json(json: &str) -> FiscalResult<Self> {
        serde_json::from_str(json).map_err(|e| FiscalError::Config(e.to_string()))
    }

    /// Validate configuration.
    pub fn validate(&self) -> FiscalResult<()> {
        if !self.period.is_valid() {
            return Err(FiscalError::Config(format!(
                "Period {} ends before it starts",
                self.period
            )));
        }

        for currency in &self.currencies {
            if currency.amount_precision > MAX_PRECISION || currency.rate_precision > MAX_PRECISION {
                return Err(FiscalError::Config(format!(
                    "Precision of currency {} exceeds {}",
                    currency.symbol, MAX_PRECISION
                )));
            }
        }

        let registry = self.registry();
        for entry in &self.rates {
            if registry.get(&entry.currency).is_err() {
                return Err(FiscalError::Config(format!(
                    "Rate given for unknown currency {}",
                    entry.currency
                )));
            }
        }

        let mut seen = BTreeSet::new();
        for opening in &self.opening.currencies {
            if registry.get(&opening.currency).is_err() {
                return Err(FiscalError::Config(format!(
                    "Opening balance given for unknown currency {}",
                    opening.currency
                )));
            }
            if !seen.insert(&opening.currency) {
                return Err(FiscalError::Config(format!(
                    "Opening balance for currency {} given twice",
                    opening.currency
                )));
            }
        }

        if self.opening.unspent_profit.is_negative() {
            return Err(FiscalError::Config(
                "Unspent profit cannot be negative".to_string(),
            ));
        }

        Ok(())
    }

    /// Registry of PLN, EUR and the configured currencies.
    pub fn registry(&self) -> CurrencyRegistry {
        let mut registry = CurrencyRegistry::with_defaults();
        for currency in &self.currencies {
            registry.register(currency.clone());
        }
        registry
    }

    /// Build the rate table.
    pub fn rate_table(&self) -> FiscalResult<CurrencyRateTable> {
        Ok(CurrencyRateTable::from_entries(&self.registry(), &self.rates)?)
    }

    /// Unspent profit of previous years in the base currency.
    pub fn unspent_profit(&self) -> FiscalResult<Denom> {
        amount(&Currency::base(), &self.opening.unspent_profit)
    }

    /// Opening state of every configured currency bank account.
    pub fn currency_openings(&self) -> FiscalResult<BTreeMap<CurrencySymbol, CurrencyOpening>> {
        let registry = self.registry();
        let base = Currency::base();
        self.opening
            .currencies
            .iter()
            .map(|opening| -> FiscalResult<_> {
                let currency = registry.get(&opening.currency)?;
                Ok((
                    currency.symbol.clone(),
                    CurrencyOpening {
                        original_sum: amount(currency, &opening.original_sum)?,
                        base_sum: amount(&base, &opening.base_sum)?,
                    },
                ))
            })
            .collect()
    }
}

/// Widen a configured number to the currency's amount precision.
fn amount(currency: &Currency, value: &Number) -> FiscalResult<Denom> {
    let amount = Number::from_decimal(value.value(), currency.amount_precision)?;
    Ok(Denom::new(currency.clone(), amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn config_2025() -> FiscalYearConfig {
        FiscalYearConfig::new(Period::year(2025).unwrap())
    }

    #[test]
    fn test_new_config() {
        let config = config_2025();
        assert!(config.validate().is_ok());
        assert!(config.unspent_profit().unwrap().is_zero());
        assert_eq!(config, config_2025());
    }

    #[test]
    fn test_period_is_required() {
        assert!(matches!(
            FiscalYearConfig::from_json(r#"{"rates": []}"#),
            Err(FiscalError::Config(_))
        ));
    }

    #[test]
    fn test_currency_precision_limit() {
        let json = r#"{
            "period": {"start": "2025-01-01", "end": "2025-12-31"},
            "currencies": [{"symbol": "XAU", "amount_precision": 30, "rate_precision": 4}]
        }"#;
        let config = FiscalYearConfig::from_json(json).unwrap();
        assert!(matches!(config.validate(), Err(FiscalError::Config(_))));

        let mut config = config_2025();
        config.currencies.push(Currency::new("XAU", 28, 28));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_period() {
        let mut config = config_2025();
        config.period = Period::new(
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );
        assert!(matches!(config.validate(), Err(FiscalError::Config(_))));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "company": {"name": "Fundacja", "address": "Warszawa", "tax_id": "123"},
            "period": {"start": "2025-01-01", "end": "2025-12-31"},
            "currencies": [{"symbol": "USD", "amount_precision": 2, "rate_precision": 4}],
            "rates": [
                {"currency": "EUR", "date": "2025-01-02", "rate": "4.2"},
                {"currency": "USD", "date": "2025-01-02", "rate": "3.9876"}
            ],
            "opening": {
                "unspent_profit": "1000",
                "currencies": [
                    {"currency": "EUR", "original_sum": "100.00", "base_sum": "425.00"}
                ]
            }
        }"#;
        let config = FiscalYearConfig::from_json(json).unwrap();
        config.validate().unwrap();

        assert_eq!(
            config.unspent_profit().unwrap(),
            Currency::pln().amount("1000.00").unwrap()
        );

        let rates = config.rate_table().unwrap();
        assert_eq!(rates.len(), 2);
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert_eq!(
            rates.rate(&Currency::eur(), date).unwrap(),
            Currency::eur().rate("4.2000").unwrap()
        );

        let openings = config.currency_openings().unwrap();
        let eur = &openings[&CurrencySymbol::from("EUR")];
        assert_eq!(eur.base_sum, Currency::pln().amount("425.00").unwrap());
    }

    #[test]
    fn test_unknown_currency() {
        let json = r#"{
            "period": {"start": "2025-01-01", "end": "2025-12-31"},
            "rates": [{"currency": "CHF", "date": "2025-01-02", "rate": "4.5"}]
        }"#;
        let config = FiscalYearConfig::from_json(json).unwrap();
        assert!(matches!(config.validate(), Err(FiscalError::Config(_))));

        assert!(matches!(
            FiscalYearConfig::from_json("{not json"),
            Err(FiscalError::Config(_))
        ));
    }
}
