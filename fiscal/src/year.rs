//! Fiscal-year build.

use std::collections::BTreeMap;

use tracing::{debug, info, instrument};
use uepik_common::{end_of_month, min_date, Currency, CurrencySymbol, Document};
use uepik_fx::{BankReconciler, BankRecord, CurrencyOpening, CurrencyRateTable, ReconciledRecord};
use uepik_ledger::{chart, organization_chart, AccountBalance, ChartOfAccounts};

use crate::cit8::{Cit8, FlowMonth};
use crate::config::FiscalYearConfig;
use crate::error::{FiscalError, FiscalResult};
use crate::operations::{CurrencyDiffSettlement, Operation, UnrecordedSell};
use crate::overdue::{overdues, OverdueRecord};

/// Booked fiscal year, read-only.
#[derive(Debug)]
pub struct FiscalYear {
    config: FiscalYearConfig,
    ledger: ChartOfAccounts,
    bank_reports: BTreeMap<CurrencySymbol, Vec<ReconciledRecord>>,
    unrecorded_sell_documents: Vec<Document>,
    overdues: Vec<OverdueRecord>,
}

impl FiscalYear {
    /// Book all operations of the year.
    ///
    /// Operations are booked in the order given, followed by the daily
    /// summaries of unrecorded sales and the month-end FX settlements of every
    /// month. Any error aborts the whole build.
    #[instrument(skip_all, fields(period = %config.period, operations = operations.len()))]
    pub fn build(
        config: FiscalYearConfig,
        operations: &[Box<dyn Operation>],
    ) -> FiscalResult<Self> {
        config.validate()?;
        let rates = config.rate_table()?;

        let mut ledger = ChartOfAccounts::new(config.period, organization_chart()?);
        ledger.open_account(
            &chart::unspent_profit_previous_years(),
            AccountBalance::credit(config.unspent_profit()?),
        )?;

        let (bank_reports, operation_records) = reconcile(&config, &rates, operations)?;
        info!(
            currencies = bank_reports.len(),
            "Bank records reconciled"
        );

        for (operation, records) in operations.iter().zip(&operation_records) {
            operation.book(&mut ledger, &rates, records)?;
        }

        let unrecorded_sell = UnrecordedSell::new(config.company.clone());
        let mut unrecorded_sell_documents = Vec::new();
        for month in config.period.months() {
            unrecorded_sell_documents.extend(unrecorded_sell.book_month(&mut ledger, month)?);

            let date = min_date(end_of_month(month.first_day()), config.period.end);
            CurrencyDiffSettlement::new(date, config.company.clone()).book(
                &mut ledger,
                &rates,
                &[],
            )?;
        }

        let overdues = overdues(&config.period, operations)?;
        info!(overdues = overdues.len(), "Fiscal year built");

        Ok(Self {
            config,
            ledger,
            bank_reports,
            unrecorded_sell_documents,
            overdues,
        })
    }

    pub fn config(&self) -> &FiscalYearConfig {
        &self.config
    }

    pub fn ledger(&self) -> &ChartOfAccounts {
        &self.ledger
    }

    /// Reconciled bank records per currency.
    pub fn bank_reports(&self) -> &BTreeMap<CurrencySymbol, Vec<ReconciledRecord>> {
        &self.bank_reports
    }

    /// Reconciled bank records of one currency, empty if it was not used.
    pub fn bank_report(&self, currency: &CurrencySymbol) -> &[ReconciledRecord] {
        self.bank_reports
            .get(currency)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Daily summary documents of unrecorded sales.
    pub fn unrecorded_sell_documents(&self) -> &[Document] {
        &self.unrecorded_sell_documents
    }

    /// Dues left unpaid at the end of the period.
    pub fn overdues(&self) -> &[OverdueRecord] {
        &self.overdues
    }

    /// CIT-8 figures of the year.
    pub fn cit8(&self) -> FiscalResult<Cit8> {
        Ok(Cit8::compute(&self.ledger)?)
    }

    /// Monthly flow of incomes, costs and profit.
    pub fn flow(&self) -> FiscalResult<Vec<FlowMonth>> {
        Ok(FlowMonth::compute(&self.ledger)?)
    }
}

type Reconciled = (
    BTreeMap<CurrencySymbol, Vec<ReconciledRecord>>,
    Vec<Vec<ReconciledRecord>>,
);

/// Reconcile in-period bank records of all operations, per currency in bank
/// order.
///
/// Returns the report of every currency and the records of every operation.
fn reconcile(
    config: &FiscalYearConfig,
    rates: &CurrencyRateTable,
    operations: &[Box<dyn Operation>],
) -> FiscalResult<Reconciled> {
    let mut by_currency: BTreeMap<CurrencySymbol, Vec<(usize, BankRecord)>> = BTreeMap::new();
    for (position, operation) in operations.iter().enumerate() {
        for record in operation.bank_records(rates)? {
            if !config.period.contains(record.date) {
                debug!(document = %record.document, date = %record.date, "Bank record out of period");
                continue;
            }
            by_currency
                .entry(record.original_amount.currency.symbol.clone())
                .or_default()
                .push((position, record));
        }
    }

    let openings = config.currency_openings()?;
    let mut reports = BTreeMap::new();
    let mut per_operation = vec![Vec::new(); operations.len()];
    for (symbol, mut records) in by_currency {
        let opening = match openings.get(&symbol) {
            Some(opening) => opening.clone(),
            None if symbol == Currency::base().symbol => CurrencyOpening::empty(Currency::base()),
            None => return Err(FiscalError::MissingOpeningBalance(symbol)),
        };

        records.sort_by_key(|(_, record)| (record.date, record.index));
        let mut reconciler = BankReconciler::open(&opening)?;
        let mut report = Vec::with_capacity(records.len());
        for (position, record) in records {
            let reconciled = reconciler.reconcile(record)?;
            per_operation[position].push(reconciled.clone());
            report.push(reconciled);
        }

        debug!(
            currency = %symbol,
            records = report.len(),
            rate_average = %reconciler.rate_average(),
            "Currency reconciled"
        );
        reports.insert(symbol, report);
    }

    Ok((reports, per_operation))
}
