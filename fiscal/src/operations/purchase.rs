use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uepik_common::{previous_day, Contractor, Denom, Document};
use uepik_fx::{BankRecord, CurrencyRateTable, ReconciledRecord};
use uepik_ledger::{
    chart, AccountBalance, AccountId, ChartOfAccounts, EntryRecord, EntrySource, Provenance,
    ProvenanceKind,
};

use super::{amount_notes, book_currency_diff, ensure_reconciled, Due, Operation, PaymentRecord};
use crate::error::FiscalResult;

/// Whether a cost reduces the taxable income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostTaxType {
    Taxable,
    NonTaxable,
}

impl CostTaxType {
    fn account(&self) -> AccountId {
        match self {
            CostTaxType::Taxable => chart::taxable_operational_costs(),
            CostTaxType::NonTaxable => chart::non_taxable_operational_costs(),
        }
    }
}

/// Purchased goods or services.
///
/// The cost is booked on the purchase date at the table rate of the previous
/// day. Non-taxable costs are covered from unspent profit of previous years
/// first. Payments leave the bank at the account's running average rate and
/// each one adds an FX difference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub date: NaiveDate,
    pub document: Document,
    pub contractor: Contractor,
    pub amount: Denom,
    pub cost_tax_type: CostTaxType,
    #[serde(default)]
    pub dues: Vec<Due>,
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,
}

impl Purchase {
    pub fn new(
        date: NaiveDate,
        document: Document,
        contractor: Contractor,
        amount: Denom,
        cost_tax_type: CostTaxType,
    ) -> Self {
        Self {
            date,
            document,
            contractor,
            amount,
            cost_tax_type,
            dues: Vec::new(),
            payments: Vec::new(),
        }
    }

    /// Add an amount owed to the supplier.
    pub fn with_due(mut self, due: Due) -> Self {
        self.dues.push(due);
        self
    }

    /// Add a payment made for the purchase.
    pub fn with_payment(mut self, payment: PaymentRecord) -> Self {
        self.payments.push(payment);
        self
    }

    /// Split the cost into the parts spent from current and previous years' profit.
    fn split_cost(&self, ledger: &ChartOfAccounts, cost: &Denom) -> FiscalResult<(Denom, Denom)> {
        match self.cost_tax_type {
            CostTaxType::Taxable => Ok((cost.clone(), Denom::base_zero())),
            CostTaxType::NonTaxable => {
                let available = ledger.balance(&chart::unspent_profit_previous_years())?;
                let previous = available.max(&Denom::base_zero())?.min(cost)?;
                Ok((cost.sub(&previous)?, previous))
            }
        }
    }
}

impl Provenance for Purchase {
    fn kind(&self) -> ProvenanceKind {
        ProvenanceKind::Purchase
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

impl Operation for Purchase {
    fn bank_records(&self, _rates: &CurrencyRateTable) -> FiscalResult<Vec<BankRecord>> {
        Ok(self
            .payments
            .iter()
            .map(|payment| {
                BankRecord::new(
                    payment.date,
                    payment.index,
                    self.document.id.clone(),
                    self.contractor.clone(),
                    payment.amount.neg(),
                )
            })
            .collect())
    }

    fn book(
        &self,
        ledger: &mut ChartOfAccounts,
        rates: &CurrencyRateTable,
        bank_records: &[ReconciledRecord],
    ) -> FiscalResult<()> {
        let (cost, rate) = rates.to_base(&self.amount, previous_day(self.date))?;
        let (current, previous) = self.split_cost(ledger, &cost)?;

        let source = EntrySource::capture(self).with_notes(amount_notes(&self.amount, &rate));
        ledger.add_entry(
            &source,
            &[
                EntryRecord::new(self.cost_tax_type.account(), AccountBalance::debit(cost)),
                EntryRecord::new(
                    chart::unspent_profit_current_year(),
                    AccountBalance::debit(current),
                ),
                EntryRecord::new(
                    chart::unspent_profit_previous_years(),
                    AccountBalance::debit(previous),
                ),
            ],
        )?;

        ensure_reconciled(ledger, &self.document, &self.payments, bank_records)?;

        for record in bank_records {
            book_currency_diff(ledger, self, &rate, record)?;
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
