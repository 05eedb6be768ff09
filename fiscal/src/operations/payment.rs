use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uepik_common::{previous_day, Contractor, Document};
use uepik_fx::{BankRecord, CurrencyRateTable, ReconciledRecord};
use uepik_ledger::{ChartOfAccounts, Provenance, ProvenanceKind};

use super::{Operation, PaymentRecord};
use crate::error::FiscalResult;

/// Bank movement with no income or cost, e.g. a transfer between own accounts.
///
/// It only changes the currency bank account. Inflows are valued at the table
/// rate of the previous day, outflows at the account's running average.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub document: Document,
    pub contractor: Contractor,
    /// Signed amount, negative for outflows.
    pub payment: PaymentRecord,
    #[serde(default)]
    pub notes: String,
}

impl Payment {
    pub fn new(
        document: Document,
        contractor: Contractor,
        payment: PaymentRecord,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            document,
            contractor,
            payment,
            notes: notes.into(),
        }
    }
}

impl Provenance for Payment {
    fn kind(&self) -> ProvenanceKind {
        ProvenanceKind::Payment
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
        Cow::Borrowed(&self.notes)
    }
}

impl Operation for Payment {
    fn bank_records(&self, rates: &CurrencyRateTable) -> FiscalResult<Vec<BankRecord>> {
        let record = BankRecord::new(
            self.payment.date,
            self.payment.index,
            self.document.id.clone(),
            self.contractor.clone(),
            self.payment.amount.clone(),
        );
        if self.payment.amount.is_negative() {
            return Ok(vec![record]);
        }
        let rate = rates.rate(&self.payment.amount.currency, previous_day(self.payment.date))?;
        Ok(vec![record.with_rate(rate)])
    }

    fn book(
        &self,
        _ledger: &mut ChartOfAccounts,
        _rates: &CurrencyRateTable,
        _bank_records: &[ReconciledRecord],
    ) -> FiscalResult<()> {
        Ok(())
    }
}
