//! Bank currency reconciliation.
//!
//! Every foreign-currency bank account is tracked as a pair of running sums:
//! the original-currency balance and its base-currency value. Their ratio is
//! the weighted-average rate applied to movements that carry neither a base
//! amount nor a rate.
//!
//! Resolution order for a record:
//!
//! 1. base currency: rate 1, base amount equal to the original amount;
//! 2. base amount given, rate absent: the rate is derived from both amounts;
//! 3. rate given, base amount absent: the base amount is converted at the rate;
//! 4. neither given: the running average rate is applied;
//! 5. both given, or a zero original amount: the record is rejected.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uepik_common::{Contractor, Currency, CurrencyError, Denom, DocumentId, Number};

use crate::error::{FxError, FxResult};

/// A bank account movement as produced by an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankRecord {
    /// Booking date.
    pub date: NaiveDate,
    /// Order of the movement within its day.
    pub index: u64,
    /// Document the movement pays for.
    pub document: DocumentId,
    pub contractor: Contractor,
    /// Amount in the account currency, negative for outflows.
    pub original_amount: Denom,
    /// Value in the base currency, if known up front.
    pub base_amount: Option<Denom>,
    /// Rate to the base currency, if known up front.
    pub rate: Option<Number>,
}

impl BankRecord {
    /// Create a record with neither base amount nor rate.
    pub fn new(
        date: NaiveDate,
        index: u64,
        document: DocumentId,
        contractor: Contractor,
        original_amount: Denom,
    ) -> Self {
        Self {
            date,
            index,
            document,
            contractor,
            original_amount,
            base_amount: None,
            rate: None,
        }
    }

    /// Set the rate to the base currency.
    pub fn with_rate(mut self, rate: Number) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Set the value in the base currency.
    pub fn with_base_amount(mut self, base_amount: Denom) -> Self {
        self.base_amount = Some(base_amount);
        self
    }

    fn invalid(&self, reason: impl Into<String>) -> FxError {
        FxError::InvalidBankRecord {
            date: self.date,
            index: self.index,
            reason: reason.into(),
        }
    }
}

/// A bank record with its base amount, rate and running sums resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledRecord {
    /// 1-based position in the currency's bank report.
    pub position: u64,
    pub date: NaiveDate,
    pub index: u64,
    pub document: DocumentId,
    pub contractor: Contractor,
    pub original_amount: Denom,
    pub base_amount: Denom,
    pub rate: Number,
    /// Account balance in the original currency after this record.
    pub original_sum: Denom,
    /// Account value in the base currency after this record.
    pub base_sum: Denom,
    /// Weighted-average rate after this record.
    pub rate_average: Number,
}

impl ReconciledRecord {
    pub fn day_of_month(&self) -> u32 {
        self.date.day()
    }

    /// Check if money left the account.
    pub fn is_outflow(&self) -> bool {
        self.original_amount.is_negative()
    }
}

/// Opening state of a currency bank account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyOpening {
    /// Balance in the account currency.
    pub original_sum: Denom,
    /// Value of the balance in the base currency.
    pub base_sum: Denom,
}

impl CurrencyOpening {
    /// Opening state of an empty account.
    pub fn empty(currency: Currency) -> Self {
        Self {
            original_sum: Denom::zero(currency),
            base_sum: Denom::base_zero(),
        }
    }
}

/// Running reconciliation of one currency bank account.
#[derive(Debug, Clone)]
pub struct BankReconciler {
    currency: Currency,
    original_sum: Denom,
    base_sum: Denom,
    rate_average: Number,
    position: u64,
}

impl BankReconciler {
    /// Start from an opening balance.
    pub fn open(opening: &CurrencyOpening) -> FxResult<Self> {
        let currency = opening.original_sum.currency.clone();
        if !opening.base_sum.currency.is_base() {
            return Err(CurrencyError::CurrencyMismatch {
                expected: Currency::base().symbol,
                actual: opening.base_sum.currency.symbol.clone(),
            }
            .into());
        }

        let rate_average = Self::average(&currency, &opening.base_sum, &opening.original_sum)?;
        Ok(Self {
            currency,
            original_sum: opening.original_sum.clone(),
            base_sum: opening.base_sum.clone(),
            rate_average,
            position: 0,
        })
    }

    /// Resolve the next record and fold it into the running sums.
    ///
    /// Records must be supplied in `(date, index)` order.
    pub fn reconcile(&mut self, record: BankRecord) -> FxResult<ReconciledRecord> {
        if record.original_amount.currency.symbol != self.currency.symbol {
            return Err(record.invalid(format!(
                "currency {} does not match account currency {}",
                record.original_amount.currency, self.currency
            )));
        }
        if record.original_amount.is_zero() {
            return Err(record.invalid("zero amount"));
        }

        let (base_amount, rate) = match (&record.base_amount, &record.rate) {
            _ if self.currency.is_base() => (
                Denom::new(Currency::base(), record.original_amount.amount),
                Number::one(self.currency.rate_precision),
            ),
            (Some(base), None) => (base.clone(), base.rate(&record.original_amount)?),
            (None, Some(rate)) => (record.original_amount.to_base(rate)?, *rate),
            (None, None) => (
                record.original_amount.to_base(&self.rate_average)?,
                self.rate_average,
            ),
            (Some(_), Some(_)) => {
                return Err(record.invalid("both base amount and rate are set"));
            }
        };

        self.original_sum = self.original_sum.add(&record.original_amount)?;
        self.base_sum = self.base_sum.add(&base_amount)?;
        self.rate_average = Self::average(&self.currency, &self.base_sum, &self.original_sum)?;
        self.position += 1;

        debug!(
            currency = %self.currency,
            position = self.position,
            original = %record.original_amount,
            base = %base_amount,
            rate = %rate,
            rate_average = %self.rate_average,
            "Bank record reconciled"
        );

        Ok(ReconciledRecord {
            position: self.position,
            date: record.date,
            index: record.index,
            document: record.document,
            contractor: record.contractor,
            original_amount: record.original_amount,
            base_amount,
            rate,
            original_sum: self.original_sum.clone(),
            base_sum: self.base_sum.clone(),
            rate_average: self.rate_average,
        })
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn original_sum(&self) -> &Denom {
        &self.original_sum
    }

    pub fn base_sum(&self) -> &Denom {
        &self.base_sum
    }

    /// Current weighted-average rate.
    pub fn rate_average(&self) -> Number {
        self.rate_average
    }

    fn average(currency: &Currency, base_sum: &Denom, original_sum: &Denom) -> FxResult<Number> {
        if currency.is_base() {
            return Ok(Number::one(currency.rate_precision));
        }
        Ok(base_sum.rate(original_sum)?)
    }
}

/// Build the bank report of one currency: sort, number and reconcile records.
pub fn bank_report(
    opening: &CurrencyOpening,
    mut records: Vec<BankRecord>,
) -> FxResult<Vec<ReconciledRecord>> {
    records.sort_by(|a, b| (a.date, a.index).cmp(&(b.date, b.index)));

    let mut reconciler = BankReconciler::open(opening)?;
    records
        .into_iter()
        .map(|record| reconciler.reconcile(record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn eur(amount: &str) -> Denom {
        Currency::eur().amount(amount).unwrap()
    }

    fn pln(amount: &str) -> Denom {
        Currency::pln().amount(amount).unwrap()
    }

    fn record(day: u32, index: u64, amount: Denom) -> BankRecord {
        BankRecord::new(
            date(2025, 4, day),
            index,
            DocumentId::new(format!("FV/{}", index)),
            Contractor::default(),
            amount,
        )
    }

    fn eur_opening() -> CurrencyOpening {
        CurrencyOpening {
            original_sum: eur("100.00"),
            base_sum: pln("425.00"),
        }
    }

    #[test]
    fn test_running_average_applied() {
        let mut reconciler = BankReconciler::open(&eur_opening()).unwrap();
        assert_eq!(reconciler.rate_average().to_string(), "4.2500");

        let reconciled = reconciler.reconcile(record(1, 1, eur("10.00"))).unwrap();
        assert_eq!(reconciled.base_amount, pln("42.50"));
        assert_eq!(reconciled.rate.to_string(), "4.2500");
        assert_eq!(reconciled.original_sum, eur("110.00"));
        assert_eq!(reconciled.base_sum, pln("467.50"));
        assert_eq!(reconciled.rate_average.to_string(), "4.2500");
        assert_eq!(reconciled.position, 1);
    }

    #[test]
    fn test_explicit_rate() {
        let mut reconciler = BankReconciler::open(&eur_opening()).unwrap();
        let rate = Currency::eur().rate("4.3500").unwrap();

        let reconciled = reconciler
            .reconcile(record(2, 1, eur("100.00")).with_rate(rate))
            .unwrap();
        assert_eq!(reconciled.base_amount, pln("435.00"));
        assert_eq!(reconciled.base_sum, pln("860.00"));
        assert_eq!(reconciled.rate_average.to_string(), "4.3000");
    }

    #[test]
    fn test_explicit_base_amount() {
        let mut reconciler = BankReconciler::open(&eur_opening()).unwrap();

        let reconciled = reconciler
            .reconcile(record(2, 1, eur("-20.00")).with_base_amount(pln("-84.00")))
            .unwrap();
        assert_eq!(reconciled.rate.to_string(), "4.2000");
        assert!(reconciled.is_outflow());
        assert_eq!(reconciled.original_sum, eur("80.00"));
        assert_eq!(reconciled.base_sum, pln("341.00"));
        assert_eq!(reconciled.rate_average.to_string(), "4.2625");
    }

    #[test]
    fn test_invalid_records() {
        let mut reconciler = BankReconciler::open(&eur_opening()).unwrap();
        let rate = Currency::eur().rate("4.3500").unwrap();

        let both = record(2, 1, eur("1.00"))
            .with_rate(rate)
            .with_base_amount(pln("4.35"));
        assert!(matches!(
            reconciler.reconcile(both),
            Err(FxError::InvalidBankRecord { .. })
        ));
        assert!(matches!(
            reconciler.reconcile(record(2, 2, eur("0.00"))),
            Err(FxError::InvalidBankRecord { .. })
        ));
        assert!(matches!(
            reconciler.reconcile(record(2, 3, pln("1.00"))),
            Err(FxError::InvalidBankRecord { .. })
        ));
        // Rejected records leave the sums untouched.
        assert_eq!(reconciler.original_sum(), &eur("100.00"));
    }

    #[test]
    fn test_base_currency_account() {
        let opening = CurrencyOpening::empty(Currency::pln());
        let records = vec![record(3, 1, pln("-10.00")), record(1, 1, pln("50.00"))];

        let report = bank_report(&opening, records).unwrap();
        assert_eq!(report[0].base_amount, pln("50.00"));
        assert_eq!(report[1].base_sum, pln("40.00"));
        assert_eq!(report[1].rate, Number::one(0));
    }

    #[test]
    fn test_bank_report_sorts_and_numbers() {
        let rate = Currency::eur().rate("4.0000").unwrap();
        let records = vec![
            record(5, 2, eur("-10.00")),
            record(5, 1, eur("10.00")).with_rate(rate),
            record(1, 7, eur("-50.00")),
        ];

        let report = bank_report(&eur_opening(), records).unwrap();
        let order: Vec<(u32, u64, u64)> = report
            .iter()
            .map(|r| (r.day_of_month(), r.index, r.position))
            .collect();
        assert_eq!(order, vec![(1, 7, 1), (5, 1, 2), (5, 2, 3)]);

        // 50 EUR leave at 4.25, the rest keeps the average.
        assert_eq!(report[0].base_amount, pln("-212.50"));
        assert_eq!(report[0].rate_average.to_string(), "4.2500");
        // 50 EUR @ 4.25 + 10 EUR @ 4.00 = 252.50 PLN / 60 EUR
        assert_eq!(report[1].rate_average.to_string(), "4.2083");
        assert_eq!(report[2].base_amount, pln("-42.08"));
    }
}
