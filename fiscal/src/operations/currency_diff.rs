use std::borrow::Cow;

use chrono::{Datelike, NaiveDate};
use uepik_common::{Contractor, Document};
use uepik_fx::{BankRecord, CurrencyRateTable, ReconciledRecord};
use uepik_ledger::{chart, AccountBalance, ChartOfAccounts, EntryRecord, Provenance, ProvenanceKind};

use super::Operation;
use crate::error::FiscalResult;

/// Month-end transfer of FX differences into financial incomes and costs.
///
/// Debits collected on the FX difference account during the month become
/// negative FX differences, credits become positive ones. Both change the
/// unspent profit of the current year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyDiffSettlement {
    document: Document,
    contractor: Contractor,
}

impl CurrencyDiffSettlement {
    /// Settlement of the month, dated `date`.
    pub fn new(date: NaiveDate, contractor: Contractor) -> Self {
        let id = format!("RK/{}/{}/1", date.year(), date.month());
        Self {
            document: Document::new(id, date),
            contractor,
        }
    }
}

impl Provenance for CurrencyDiffSettlement {
    fn kind(&self) -> ProvenanceKind {
        ProvenanceKind::CurrencyDiffSettlement
    }

    fn date(&self) -> NaiveDate {
        self.document.date
    }

    fn document(&self) -> &Document {
        &self.document
    }

    fn contractor(&self) -> &Contractor {
        &self.contractor
    }

    fn notes(&self) -> Cow<'_, str> {
        Cow::Borrowed("FX differences")
    }
}

impl Operation for CurrencyDiffSettlement {
    fn bank_records(&self, _rates: &CurrencyRateTable) -> FiscalResult<Vec<BankRecord>> {
        Ok(Vec::new())
    }

    fn book(
        &self,
        ledger: &mut ChartOfAccounts,
        _rates: &CurrencyRateTable,
        _bank_records: &[ReconciledRecord],
    ) -> FiscalResult<()> {
        let date = self.document.date;
        let losses = ledger.debit_month(&chart::fx_diffs(), date)?;
        let gains = ledger.credit_month(&chart::fx_diffs(), date)?;

        ledger.add_entry(
            self,
            &[
                EntryRecord::new(chart::negative_fx_diffs(), AccountBalance::debit(losses.clone())),
                EntryRecord::new(
                    chart::unspent_profit_current_year(),
                    AccountBalance::debit(losses),
                ),
                EntryRecord::new(chart::positive_fx_diffs(), AccountBalance::credit(gains.clone())),
                EntryRecord::new(
                    chart::unspent_profit_current_year(),
                    AccountBalance::credit(gains),
                ),
            ],
        )?;
        Ok(())
    }
}
