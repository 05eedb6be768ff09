//! Date-indexed FX rates to the base currency.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uepik_common::{Currency, CurrencyRegistry, CurrencySymbol, Denom, Number};

use crate::error::{FxError, FxResult};

/// One row of the rate table, as supplied by configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateEntry {
    pub currency: CurrencySymbol,
    pub date: NaiveDate,
    pub rate: Number,
}

/// Rates of foreign currencies to the base currency, one per currency and day.
///
/// Built once per fiscal-year construction and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct CurrencyRateTable {
    rates: HashMap<(CurrencySymbol, NaiveDate), Number>,
}

impl CurrencyRateTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from configuration rows, resolving currencies in `registry`.
    ///
    /// Rates given with fewer fractional digits than the currency's rate
    /// precision are widened; more digits are rejected.
    pub fn from_entries(registry: &CurrencyRegistry, entries: &[RateEntry]) -> FxResult<Self> {
        let mut table = Self::new();
        for entry in entries {
            let currency = registry.get(&entry.currency)?;
            let rate = Number::from_decimal(entry.rate.value(), currency.rate_precision).map_err(|_| {
                FxError::InvalidRate {
                    currency: entry.currency.clone(),
                    date: entry.date,
                    rate: entry.rate.to_string(),
                }
            })?;
            table.insert(currency, entry.date, rate)?;
        }
        Ok(table)
    }

    /// Insert the rate of `currency` valid on `date`.
    pub fn insert(&mut self, currency: &Currency, date: NaiveDate, rate: Number) -> FxResult<()> {
        if currency.is_base() || rate.precision() != currency.rate_precision || !rate.is_positive() {
            return Err(FxError::InvalidRate {
                currency: currency.symbol.clone(),
                date,
                rate: rate.to_string(),
            });
        }
        self.rates.insert((currency.symbol.clone(), date), rate);
        Ok(())
    }

    /// Get the rate of `currency` on `date`.
    ///
    /// The base currency always has rate 1.
    pub fn rate(&self, currency: &Currency, date: NaiveDate) -> FxResult<Number> {
        if currency.is_base() {
            return Ok(Number::one(currency.rate_precision));
        }
        self.rates
            .get(&(currency.symbol.clone(), date))
            .copied()
            .ok_or_else(|| FxError::RateNotFound {
                currency: currency.symbol.clone(),
                date,
            })
    }

    /// Convert an amount to the base currency at the rate of `date`.
    ///
    /// Returns the base amount and the rate used.
    pub fn to_base(&self, denom: &Denom, date: NaiveDate) -> FxResult<(Denom, Number)> {
        let rate = self.rate(&denom.currency, date)?;
        let base = denom.to_base(&rate)?;
        debug!(amount = %denom, rate = %rate, base = %base, %date, "Converted to base currency");
        Ok((base, rate))
    }

    /// Number of rates in the table.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
