use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uepik_common::{min_date, previous_day, Contractor, Denom, Document};
use uepik_fx::{BankRecord, CurrencyRateTable, ReconciledRecord};
use uepik_ledger::{
    chart, AccountBalance, ChartOfAccounts, EntryRecord, EntrySource, Provenance, ProvenanceKind,
};

use super::{amount_notes, book_currency_diff, ensure_reconciled, Due, Operation, PaymentRecord};
use crate::error::FiscalResult;

/// Whether a sale is documented by an invoice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleRecording {
    #[default]
    Recorded,
    /// Sold without an invoice, summarized per day by [`UnrecordedSell`](super::UnrecordedSell).
    Unrecorded,
}

/// Sale of goods or services.
///
/// Income is booked on the sale date at the table rate of the previous day.
/// Unrecorded sales go to the memo account first. Each payment adds an FX
/// difference and a VAT register entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sell {
    pub date: NaiveDate,
    pub document: Document,
    pub contractor: Contractor,
    pub amount: Denom,
    #[serde(default)]
    pub recording: SaleRecording,
    #[serde(default)]
    pub dues: Vec<Due>,
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,
}

impl Sell {
    pub fn new(date: NaiveDate, document: Document, contractor: Contractor, amount: Denom) -> Self {
        Self {
            date,
            document,
            contractor,
            amount,
            recording: SaleRecording::Recorded,
            dues: Vec::new(),
            payments: Vec::new(),
        }
    }

    /// Mark the sale as made without an invoice.
    pub fn unrecorded(mut self) -> Self {
        self.recording = SaleRecording::Unrecorded;
        self
    }

    /// Add an amount the buyer owes.
    pub fn with_due(mut self, due: Due) -> Self {
        self.dues.push(due);
        self
    }

    /// Add a payment received for the sale.
    pub fn with_payment(mut self, payment: PaymentRecord) -> Self {
        self.payments.push(payment);
        self
    }

    fn book_vat(
        &self,
        ledger: &mut ChartOfAccounts,
        rates: &CurrencyRateTable,
        record: &ReconciledRecord,
    ) -> FiscalResult<()> {
        let date = min_date(self.date, record.date);
        let (base, rate) = rates.to_base(&record.original_amount, previous_day(date))?;

        let source = EntrySource::new(
            ProvenanceKind::Vat,
            date,
            self.document.clone(),
            self.contractor.clone(),
            amount_notes(&record.original_amount, &rate),
        );
        ledger.add_entry(&source, &[EntryRecord::new(chart::vat(), AccountBalance::credit(base))])?;
        Ok(())
    }
}

impl Provenance for Sell {
    fn kind(&self) -> ProvenanceKind {
        ProvenanceKind::Sell
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn document(&self) -> &Document {
        &self.document
    }

    fn contractor(&self) -> &Contractor {
        &self.contractor
    }

    fn notes(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }
}

impl Operation for Sell {
    fn bank_records(&self, rates: &CurrencyRateTable) -> FiscalResult<Vec<BankRecord>> {
        self.payments
            .iter()
            .map(|payment| -> FiscalResult<_> {
                let rate = rates.rate(&payment.amount.currency, previous_day(payment.date))?;
                Ok(BankRecord::new(
                    payment.date,
                    payment.index,
                    self.document.id.clone(),
                    self.contractor.clone(),
                    payment.amount.clone(),
                )
                .with_rate(rate))
            })
            .collect()
    }

    fn book(
        &self,
        ledger: &mut ChartOfAccounts,
        rates: &CurrencyRateTable,
        bank_records: &[ReconciledRecord],
    ) -> FiscalResult<()> {
        let (income, rate) = rates.to_base(&self.amount, previous_day(self.date))?;

        let source = EntrySource::capture(self).with_notes(amount_notes(&self.amount, &rate));
        match self.recording {
            SaleRecording::Recorded => ledger.add_entry(
                &source,
                &[
                    EntryRecord::new(chart::paid_incomes(), AccountBalance::credit(income.clone())),
                    EntryRecord::new(
                        chart::unspent_profit_current_year(),
                        AccountBalance::credit(income),
                    ),
                ],
            )?,
            SaleRecording::Unrecorded => ledger.add_entry(
                &source,
                &[EntryRecord::new(chart::unrecorded_sales(), AccountBalance::credit(income))],
            )?,
        };

        ensure_reconciled(ledger, &self.document, &self.payments, bank_records)?;

        for record in bank_records {
            book_currency_diff(ledger, self, &rate, record)?;
            self.book_vat(ledger, rates, record)?;
        }
        Ok(())
    }

    fn dues(&self) -> &[Due] {
        &self.dues
    }

    fn payments(&self) -> &[PaymentRecord] {
        &self.payments
    }
}
