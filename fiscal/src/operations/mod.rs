//! Business operations posted to the fiscal-year ledger.
//!
//! Each operation is a [`Provenance`](uepik_ledger::Provenance) of its own
//! kind. The fiscal-year build first collects the bank movements of all
//! operations, reconciles them per currency and then hands every operation
//! its reconciled records for booking.

mod currency_diff;
mod donation;
mod payment;
mod purchase;
mod sell;
mod service;
mod unrecorded_sell;

pub use currency_diff::CurrencyDiffSettlement;
pub use donation::Donation;
pub use payment::Payment;
pub use purchase::{CostTaxType, Purchase};
pub use sell::{SaleRecording, Sell};
pub use service::Service;
pub use unrecorded_sell::UnrecordedSell;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uepik_common::{max_date, Denom, Document, Number};
use uepik_fx::{BankRecord, CurrencyRateTable, ReconciledRecord};
use uepik_ledger::{
    chart, AccountBalance, ChartOfAccounts, EntryRecord, EntrySource, Provenance, ProvenanceKind,
};

use crate::error::{FiscalError, FiscalResult};

/// Money moving through a bank account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub date: NaiveDate,
    /// Position of the movement on the bank statement of its day.
    pub index: u64,
    /// Amount in the bank account's currency.
    pub amount: Denom,
}

impl PaymentRecord {
    pub fn new(date: NaiveDate, index: u64, amount: Denom) -> Self {
        Self {
            date,
            index,
            amount,
        }
    }
}

/// Amount a contractor owes by a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Due {
    pub date: NaiveDate,
    pub amount: Denom,
}

impl Due {
    pub fn new(date: NaiveDate, amount: Denom) -> Self {
        Self { date, amount }
    }
}

/// An operation of the fiscal year.
pub trait Operation: Provenance {
    /// Bank movements caused by the operation.
    fn bank_records(&self, rates: &CurrencyRateTable) -> FiscalResult<Vec<BankRecord>>;

    /// Post the operation to the ledger.
    ///
    /// `bank_records` are the operation's own movements after reconciliation,
    /// in bank order.
    fn book(
        &self,
        ledger: &mut ChartOfAccounts,
        rates: &CurrencyRateTable,
        bank_records: &[ReconciledRecord],
    ) -> FiscalResult<()>;

    /// Amounts the contractor owes for the operation.
    fn dues(&self) -> &[Due] {
        &[]
    }

    /// Payments settling the dues.
    fn payments(&self) -> &[PaymentRecord] {
        &[]
    }
}

/// Fail if an in-period payment has no reconciled bank record.
fn ensure_reconciled(
    ledger: &ChartOfAccounts,
    document: &Document,
    payments: &[PaymentRecord],
    bank_records: &[ReconciledRecord],
) -> FiscalResult<()> {
    let period = ledger.period();
    let expected = payments.iter().filter(|p| period.contains(p.date)).count();
    if bank_records.len() < expected {
        return Err(FiscalError::MissingBankRecord(document.id.clone()));
    }
    Ok(())
}

fn amount_notes(amount: &Denom, rate: &Number) -> String {
    format!("amount: {}, rate: {}", amount, rate)
}

/// Post the FX difference of one settlement to the memo account.
///
/// `booked_rate` is the rate the operation was recorded at. A booked rate
/// above the settlement rate is a loss, posted as debit.
fn book_currency_diff(
    ledger: &mut ChartOfAccounts,
    operation: &dyn Provenance,
    booked_rate: &Number,
    record: &ReconciledRecord,
) -> FiscalResult<()> {
    if *booked_rate == record.rate {
        return Ok(());
    }

    let settled = record.original_amount.amount.abs();
    let settled = Denom::new(record.original_amount.currency.clone(), settled);
    let amount = if *booked_rate > record.rate {
        AccountBalance::debit(settled.to_base(&booked_rate.sub(&record.rate)?)?)
    } else {
        AccountBalance::credit(settled.to_base(&record.rate.sub(booked_rate)?)?)
    };

    let source = EntrySource::new(
        ProvenanceKind::CurrencyDiff,
        max_date(operation.date(), record.date),
        operation.document().clone(),
        operation.contractor().clone(),
        format!("booked: {}, settled: {}", booked_rate, record.rate),
    );
    ledger.add_entry(&source, &[EntryRecord::new(chart::fx_diffs(), amount)])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uepik_common::{Contractor, Currency, Document, Period};
    use uepik_ledger::organization_chart;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn ledger() -> ChartOfAccounts {
        ChartOfAccounts::new(
            Period::new(date(1, 1), date(12, 31)),
            organization_chart().unwrap(),
        )
    }

    fn settlement(on: NaiveDate, amount: &str, rate: &str) -> ReconciledRecord {
        let eur = Currency::eur();
        let original = eur.amount(amount).unwrap();
        let rate = eur.rate(rate).unwrap();
        ReconciledRecord {
            position: 1,
            date: on,
            index: 1,
            document: "FV/1".into(),
            contractor: Contractor::default(),
            base_amount: original.to_base(&rate).unwrap(),
            original_sum: original.clone(),
            base_sum: original.to_base(&rate).unwrap(),
            original_amount: original,
            rate,
            rate_average: rate,
        }
    }

    fn source(on: NaiveDate) -> EntrySource {
        EntrySource::new(
            ProvenanceKind::Purchase,
            on,
            Document::new("FV/1", on),
            Contractor::default(),
            "",
        )
    }

    #[test]
    fn test_loss_is_debit_at_later_date() {
        let mut ledger = ledger();
        let booked = Currency::eur().rate("4.3000").unwrap();
        let record = settlement(date(2, 12), "-10.00", "4.2000");

        book_currency_diff(&mut ledger, &source(date(2, 10)), &booked, &record).unwrap();

        let entries = ledger.entries(&chart::fx_diffs()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date(), date(2, 12));
        assert_eq!(entries[0].source.kind, ProvenanceKind::CurrencyDiff);
        assert_eq!(entries[0].amount.debit, Currency::pln().amount("1.00").unwrap());
    }

    #[test]
    fn test_gain_is_credit() {
        let mut ledger = ledger();
        let booked = Currency::eur().rate("4.4000").unwrap();
        let record = settlement(date(4, 1), "20.00", "4.5000");

        book_currency_diff(&mut ledger, &source(date(4, 10)), &booked, &record).unwrap();

        let entries = ledger.entries(&chart::fx_diffs()).unwrap();
        assert_eq!(entries[0].date(), date(4, 10));
        assert_eq!(entries[0].amount.credit, Currency::pln().amount("2.00").unwrap());
    }

    #[test]
    fn test_equal_rates_post_nothing() {
        let mut ledger = ledger();
        let booked = Currency::eur().rate("4.2000").unwrap();
        let record = settlement(date(3, 1), "10.00", "4.2000");

        book_currency_diff(&mut ledger, &source(date(3, 1)), &booked, &record).unwrap();

        assert!(ledger.entries(&chart::fx_diffs()).unwrap().is_empty());
    }

    #[test]
    fn test_only_period_payments_need_bank_records() {
        let ledger = ledger();
        let document = Document::new("FS/1", date(12, 20));
        let payments = vec![
            PaymentRecord::new(date(12, 28), 1, Currency::eur().amount("10.00").unwrap()),
            PaymentRecord::new(
                NaiveDate::from_ymd_opt(2026, 1, 3).unwrap(),
                1,
                Currency::eur().amount("10.00").unwrap(),
            ),
        ];
        let record = settlement(date(12, 28), "10.00", "4.2000");

        assert!(ensure_reconciled(&ledger, &document, &payments, &[record]).is_ok());
        assert_eq!(
            ensure_reconciled(&ledger, &document, &payments, &[]),
            Err(FiscalError::MissingBankRecord(document.id.clone()))
        );
    }
}
