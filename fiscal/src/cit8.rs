//! CIT-8 figures and the monthly flow of profit.

use serde::{Deserialize, Serialize};
use uepik_common::{Denom, MonthKey};
use uepik_ledger::{chart, ChartOfAccounts, LedgerResult};

/// Figures of the yearly CIT-8 declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cit8 {
    pub incomes_financial: Denom,
    pub incomes_operational: Denom,
    pub costs_financial: Denom,
    pub costs_operational: Denom,
    /// Financial incomes minus costs, never below zero.
    pub tax_free_profit_financial: Denom,
    /// Operational incomes minus taxable costs, never below zero.
    pub tax_free_profit_operational: Denom,
    pub unspent_profit: Denom,
    pub received_donations: Denom,
}

impl Cit8 {
    /// Read the figures from a booked ledger.
    pub fn compute(ledger: &ChartOfAccounts) -> LedgerResult<Self> {
        let incomes_financial = ledger.balance(&chart::financial_incomes())?;
        let incomes_operational = ledger.balance(&chart::operational_incomes())?;
        let costs_financial = ledger.balance(&chart::taxable_financial_costs())?;
        let costs_operational = ledger.balance(&chart::taxable_operational_costs())?;

        let zero = Denom::base_zero();
        let tax_free_profit_financial = incomes_financial.sub(&costs_financial)?.max(&zero)?;
        let tax_free_profit_operational = incomes_operational.sub(&costs_operational)?.max(&zero)?;

        Ok(Self {
            incomes_financial,
            incomes_operational,
            costs_financial,
            costs_operational,
            tax_free_profit_financial,
            tax_free_profit_operational,
            unspent_profit: ledger.balance(&chart::unspent_profit())?,
            received_donations: ledger.balance(&chart::free_of_charge_incomes())?,
        })
    }
}

/// One month of the profit flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowMonth {
    pub month: MonthKey,

    pub month_income: Denom,
    pub month_taxable_costs: Denom,
    pub month_profit: Denom,
    /// Spent from the current year's profit.
    pub month_spent_current: Denom,
    /// Spent from previous years' profit.
    pub month_spent_previous: Denom,

    pub total_income: Denom,
    pub total_taxable_costs: Denom,
    pub total_profit_year: Denom,
    pub total_spent_current: Denom,
    /// Unspent profit carried over from previous years.
    pub profit_previous: Denom,
    pub total_spent_previous: Denom,
    /// Unspent profit at the end of the month.
    pub total_profit: Denom,
}

impl FlowMonth {
    /// Flow of every month of the ledger's period.
    pub fn compute(ledger: &ChartOfAccounts) -> LedgerResult<Vec<FlowMonth>> {
        let incomes = chart::incomes();
        let costs = chart::taxable_costs();
        let current = chart::unspent_profit_current_year();
        let previous = chart::unspent_profit_previous_years();
        let unspent = chart::unspent_profit();
        let profit_previous = ledger.opening_balance(&unspent)?;

        ledger
            .period()
            .months()
            .into_iter()
            .map(|month| -> LedgerResult<FlowMonth> {
                let date = month.first_day();
                let month_income = ledger.balance_month(&incomes, date)?;
                let month_taxable_costs = ledger.balance_month(&costs, date)?;
                let total_income = ledger.balance_incremental(&incomes, date)?;
                let total_taxable_costs = ledger.balance_incremental(&costs, date)?;

                Ok(FlowMonth {
                    month,
                    month_profit: month_income.sub(&month_taxable_costs)?,
                    month_income,
                    month_taxable_costs,
                    month_spent_current: ledger.debit_month(&current, date)?,
                    month_spent_previous: ledger.debit_month(&previous, date)?,
                    total_profit_year: total_income.sub(&total_taxable_costs)?,
                    total_income,
                    total_taxable_costs,
                    total_spent_current: ledger.debit_incremental(&current, date)?,
                    profit_previous: profit_previous.clone(),
                    total_spent_previous: ledger.debit_incremental(&previous, date)?,
                    total_profit: ledger.balance_incremental(&unspent, date)?,
                })
            })
            .collect()
    }
}
