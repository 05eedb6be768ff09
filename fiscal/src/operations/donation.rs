use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uepik_common::{previous_day, Contractor, Document};
use uepik_fx::{BankRecord, CurrencyRateTable, ReconciledRecord};
use uepik_ledger::{
    chart, AccountBalance, ChartOfAccounts, EntryRecord, EntrySource, Provenance, ProvenanceKind,
};

use super::{amount_notes, Operation, PaymentRecord};
use crate::error::FiscalResult;

/// Donation received on the bank account.
///
/// Booked as free-of-charge income on the payment date, at the table rate of
/// the previous day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donation {
    pub document: Document,
    pub contractor: Contractor,
    pub payment: PaymentRecord,
}

impl Donation {
    pub fn new(document: Document, contractor: Contractor, payment: PaymentRecord) -> Self {
        Self {
            document,
            contractor,
            payment,
        }
    }
}

impl Provenance for Donation {
    fn kind(&self) -> ProvenanceKind {
        ProvenanceKind::Donation
    }

    fn date(&self) -> NaiveDate {
        self.payment.date
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

impl Operation for Donation {
    fn bank_records(&self, rates: &CurrencyRateTable) -> FiscalResult<Vec<BankRecord>> {
        let rate = rates.rate(&self.payment.amount.currency, previous_day(self.payment.date))?;
        Ok(vec![BankRecord::new(
            self.payment.date,
            self.payment.index,
            self.document.id.clone(),
            self.contractor.clone(),
            self.payment.amount.clone(),
        )
        .with_rate(rate)])
    }

    fn book(
        &self,
        ledger: &mut ChartOfAccounts,
        rates: &CurrencyRateTable,
        _bank_records: &[ReconciledRecord],
    ) -> FiscalResult<()> {
        let (income, rate) = rates.to_base(&self.payment.amount, previous_day(self.payment.date))?;

        let source = EntrySource::capture(self).with_notes(amount_notes(&self.payment.amount, &rate));
        ledger.add_entry(
            &source,
            &[
                EntryRecord::new(
                    chart::free_of_charge_incomes(),
                    AccountBalance::credit(income.clone()),
                ),
                EntryRecord::new(
                    chart::unspent_profit_current_year(),
                    AccountBalance::credit(income),
                ),
            ],
        )?;
        Ok(())
    }
}
