use chrono::{Datelike, NaiveDate};
use tracing::debug;
use uepik_common::{Contractor, Denom, Document, MonthKey};
use uepik_ledger::{
    chart, AccountBalance, ChartOfAccounts, EntryRecord, EntrySource, ProvenanceKind,
};

use crate::error::FiscalResult;

/// Daily summary of sales made without an invoice.
///
/// Every day with unrecorded sales gets one `DW/{year}/{month}/{n}` document
/// moving the day's total from the memo account into paid operational income.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnrecordedSell {
    contractor: Contractor,
}

impl UnrecordedSell {
    pub fn new(contractor: Contractor) -> Self {
        Self { contractor }
    }

    /// Book the summaries of one month.
    ///
    /// Returns the documents created, in date order.
    pub fn book_month(
        &self,
        ledger: &mut ChartOfAccounts,
        month: MonthKey,
    ) -> FiscalResult<Vec<Document>> {
        let mut days: Vec<(NaiveDate, Denom)> = Vec::new();
        for entry in ledger.entries_month(&chart::unrecorded_sales(), month.first_day())? {
            match days.last_mut() {
                Some((date, sum)) if *date == entry.date() => {
                    *sum = sum.add(&entry.amount.credit)?;
                }
                _ => days.push((entry.date(), entry.amount.credit.clone())),
            }
        }

        let mut documents = Vec::with_capacity(days.len());
        for (index, (date, sum)) in days.into_iter().enumerate() {
            let id = format!("DW/{}/{}/{}", date.year(), date.month(), index + 1);
            let document = Document::new(id, date);
            debug!(document = %document.id, total = %sum, "Unrecorded sales summarized");

            let source = EntrySource::new(
                ProvenanceKind::UnrecordedSell,
                date,
                document.clone(),
                self.contractor.clone(),
                "Unrecorded sales",
            );
            ledger.add_entry(
                &source,
                &[
                    EntryRecord::new(chart::paid_incomes(), AccountBalance::credit(sum.clone())),
                    EntryRecord::new(
                        chart::unspent_profit_current_year(),
                        AccountBalance::credit(sum),
                    ),
                ],
            )?;
            documents.push(document);
        }
        Ok(documents)
    }
}
