//! Chart of accounts: posting and balance queries for one fiscal period.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, info, instrument};
use uepik_common::{Currency, CurrencyError, Denom, MonthKey, Period};

use crate::account::{AccountId, AccountNode, AccountTree};
use crate::balance::{AccountBalance, Side};
use crate::error::{LedgerError, LedgerResult, Violation};
use crate::journal::{Entry, EntryId, EntryRecord, EntrySource, Provenance};

/// Mutable bookkeeping state of one account.
#[derive(Debug, Clone)]
struct AccountState {
    opening: AccountBalance,
    opened: bool,
    /// One slot per month of the period.
    months: Vec<AccountBalance>,
    /// Ordered by entry ID.
    entries: Vec<Entry>,
    /// Positions in `entries`, one list per month of the period.
    month_entries: Vec<Vec<usize>>,
}

impl AccountState {
    fn new(month_count: usize) -> Self {
        Self {
            opening: AccountBalance::zero(),
            opened: false,
            months: vec![AccountBalance::zero(); month_count],
            entries: Vec::new(),
            month_entries: vec![Vec::new(); month_count],
        }
    }
}

/// Ledger of one fiscal period.
///
/// Owns the account tree and every entry posted to it. Amounts posted to a
/// leaf are accumulated on all its ancestors too, so subtree totals are
/// read from the parent account.
#[derive(Debug, Clone)]
pub struct ChartOfAccounts {
    period: Period,
    tree: AccountTree,
    states: Vec<AccountState>,
    next_entry_id: u64,
}

impl ChartOfAccounts {
    /// Create an empty ledger over the account tree.
    pub fn new(period: Period, tree: AccountTree) -> Self {
        let month_count = period.month_count();
        let states = (0..tree.len()).map(|_| AccountState::new(month_count)).collect();

        info!(
            period = %period,
            accounts = tree.len(),
            months = month_count,
            "Chart of accounts created"
        );

        Self {
            period,
            tree,
            states,
            next_entry_id: 0,
        }
    }

    pub fn period(&self) -> Period {
        self.period
    }

    /// Set the opening balance of a leaf account.
    ///
    /// Allowed once per leaf, before anything is posted to it.
    #[instrument(skip(self), fields(account = %id))]
    pub fn open_account(&mut self, id: &AccountId, balance: AccountBalance) -> LedgerResult<()> {
        let index = self.tree.resolve(id)?;
        let violation = |violation| LedgerError::InvariantViolation {
            account: id.clone(),
            violation,
        };

        if !self.tree.node(index).is_leaf() {
            return Err(violation(Violation::OpeningOnNonLeaf));
        }
        let state = &self.states[index];
        if state.opened {
            return Err(violation(Violation::AlreadyOpened));
        }
        if !state.entries.is_empty() {
            return Err(violation(Violation::AlreadyPosted));
        }
        check_amount(&balance).map_err(|e| match e {
            AmountError::Negative(side) => violation(Violation::NegativeAmount(side)),
            AmountError::Currency(e) => e.into(),
        })?;

        let lineage = self.tree.lineage(index);
        for &node in &lineage {
            if let Some(side) = disallowed_side(self.tree.node(node), &balance) {
                return Err(LedgerError::InvariantViolation {
                    account: self.tree.node(node).id().clone(),
                    violation: Violation::SideNotAllowed(side),
                });
            }
        }

        let staged = lineage
            .iter()
            .map(|&node| -> LedgerResult<_> {
                Ok((node, self.states[node].opening.add(&balance)?))
            })
            .collect::<LedgerResult<Vec<_>>>()?;
        for (node, opening) in staged {
            self.states[node].opening = opening;
        }
        self.states[index].opened = true;

        debug!(
            debit = %balance.debit,
            credit = %balance.credit,
            "Account opened"
        );
        Ok(())
    }

    /// Post one logical transaction to the ledger.
    ///
    /// All records are validated before any is applied, so on error the
    /// ledger is unchanged. Transactions dated outside the period are dropped
    /// and `Ok(None)` is returned.
    #[instrument(skip(self, provenance, records), fields(kind = %provenance.kind(), date = %provenance.date()))]
    pub fn add_entry(
        &mut self,
        provenance: &dyn Provenance,
        records: &[EntryRecord],
    ) -> LedgerResult<Option<EntryId>> {
        let date = provenance.date();
        let month = match self.period.month_index(date) {
            Some(month) if self.period.contains(date) => month,
            _ => {
                debug!(period = %self.period, "Entry outside of period dropped");
                return Ok(None);
            }
        };
        let kind = provenance.kind();

        // Per-account totals of this transaction, ancestors included.
        let mut deltas: BTreeMap<usize, AccountBalance> = BTreeMap::new();
        for record in records {
            let index = self.tree.resolve(&record.account)?;
            let node = self.tree.node(index);
            if !node.is_leaf() {
                return Err(LedgerError::NotLeaf(record.account.clone()));
            }
            if record.amount.is_zero() {
                continue;
            }
            check_amount(&record.amount).map_err(|e| match e {
                AmountError::Negative(side) => LedgerError::InvariantViolation {
                    account: record.account.clone(),
                    violation: Violation::NegativeAmount(side),
                },
                AmountError::Currency(e) => e.into(),
            })?;

            for node_index in self.tree.lineage(index) {
                let node = self.tree.node(node_index);
                if let Some(side) = disallowed_side(node, &record.amount) {
                    return Err(LedgerError::SideNotAllowed {
                        account: node.id().clone(),
                        side,
                    });
                }
                if !node.valid_sources().allows(kind) {
                    return Err(LedgerError::ProvenanceNotAllowed {
                        account: node.id().clone(),
                        kind,
                    });
                }
                let total = deltas.entry(node_index).or_default();
                *total = total.add(&record.amount)?;
            }
        }

        let staged = deltas
            .into_iter()
            .map(|(node, amount)| -> LedgerResult<_> {
                let month_total = self.states[node].months[month].add(&amount)?;
                Ok((node, amount, month_total))
            })
            .collect::<LedgerResult<Vec<_>>>()?;

        let id = EntryId::new(self.next_entry_id);
        self.next_entry_id += 1;

        if !staged.is_empty() {
            let source = EntrySource::capture(provenance);
            for (node, amount, month_total) in staged {
                let state = &mut self.states[node];
                state.months[month] = month_total;
                state.month_entries[month].push(state.entries.len());
                state.entries.push(Entry {
                    id,
                    source: source.clone(),
                    amount,
                });
            }
        }

        debug!(entry = %id, records = records.len(), "Entry added");
        Ok(Some(id))
    }

    /// Look up an account node.
    pub fn account(&self, id: &AccountId) -> LedgerResult<&AccountNode> {
        self.tree.get(id)
    }

    /// Direct children of an account.
    pub fn children(&self, id: &AccountId) -> LedgerResult<Vec<&AccountNode>> {
        self.tree.children(id)
    }

    /// All accounts in depth-first order.
    pub fn accounts(&self) -> impl Iterator<Item = &AccountNode> {
        self.tree.iter()
    }

    /// Net opening balance of the account.
    pub fn opening_balance(&self, id: &AccountId) -> LedgerResult<Denom> {
        let (node, state) = self.lookup(id)?;
        Ok(node.account_type().balance(&state.opening)?)
    }

    /// Net balance over the whole period, opening included.
    pub fn balance(&self, id: &AccountId) -> LedgerResult<Denom> {
        let (node, state) = self.lookup(id)?;
        let total = self.accumulate(state, self.period.month_count())?;
        Ok(node.account_type().balance(&total)?)
    }

    /// Debits posted in the month containing the date.
    pub fn debit_month(&self, id: &AccountId, date: NaiveDate) -> LedgerResult<Denom> {
        Ok(self.month(id, date)?.debit)
    }

    /// Credits posted in the month containing the date.
    pub fn credit_month(&self, id: &AccountId, date: NaiveDate) -> LedgerResult<Denom> {
        Ok(self.month(id, date)?.credit)
    }

    /// Net balance of the month containing the date.
    pub fn balance_month(&self, id: &AccountId, date: NaiveDate) -> LedgerResult<Denom> {
        let balance = self.month(id, date)?;
        Ok(self.account(id)?.account_type().balance(&balance)?)
    }

    /// Opening debits plus debits posted from period start through the month containing the date.
    pub fn debit_incremental(&self, id: &AccountId, date: NaiveDate) -> LedgerResult<Denom> {
        Ok(self.incremental(id, date)?.debit)
    }

    /// Opening credits plus credits posted from period start through the month containing the date.
    pub fn credit_incremental(&self, id: &AccountId, date: NaiveDate) -> LedgerResult<Denom> {
        Ok(self.incremental(id, date)?.credit)
    }

    /// Net balance from opening through the month containing the date.
    pub fn balance_incremental(&self, id: &AccountId, date: NaiveDate) -> LedgerResult<Denom> {
        let balance = self.incremental(id, date)?;
        Ok(self.account(id)?.account_type().balance(&balance)?)
    }

    /// Amount the entry posted to the account, zero if it did not touch it.
    pub fn amount(&self, id: &AccountId, entry_id: EntryId) -> LedgerResult<AccountBalance> {
        let (_, state) = self.lookup(id)?;
        Ok(state
            .entries
            .binary_search_by_key(&entry_id, |entry| entry.id)
            .map(|position| state.entries[position].amount.clone())
            .unwrap_or_default())
    }

    /// Entries of the account ordered by date and entry ID.
    pub fn entries(&self, id: &AccountId) -> LedgerResult<Vec<&Entry>> {
        let (_, state) = self.lookup(id)?;
        Ok(sorted(state.entries.iter()))
    }

    /// Entries of the account dated in the month containing the date.
    pub fn entries_month(&self, id: &AccountId, date: NaiveDate) -> LedgerResult<Vec<&Entry>> {
        let (_, state) = self.lookup(id)?;
        Ok(match self.period.month_index(date) {
            Some(month) => sorted(state.month_entries[month].iter().map(|&i| &state.entries[i])),
            None => Vec::new(),
        })
    }

    fn lookup(&self, id: &AccountId) -> LedgerResult<(&AccountNode, &AccountState)> {
        let index = self.tree.resolve(id)?;
        Ok((self.tree.node(index), &self.states[index]))
    }

    fn month(&self, id: &AccountId, date: NaiveDate) -> LedgerResult<AccountBalance> {
        let (_, state) = self.lookup(id)?;
        Ok(self
            .period
            .month_index(date)
            .map(|month| state.months[month].clone())
            .unwrap_or_default())
    }

    fn incremental(&self, id: &AccountId, date: NaiveDate) -> LedgerResult<AccountBalance> {
        let (_, state) = self.lookup(id)?;
        let months = MonthKey::of(date).months_since(MonthKey::of(self.period.start)) + 1;
        let months = usize::try_from(months)
            .unwrap_or(0)
            .min(self.period.month_count());
        self.accumulate(state, months)
    }

    /// Opening balance plus the first `months` month slots, in chronological order.
    fn accumulate(&self, state: &AccountState, months: usize) -> LedgerResult<AccountBalance> {
        let mut total = state.opening.clone();
        for balance in &state.months[..months] {
            total = total.add(balance)?;
        }
        Ok(total)
    }
}

enum AmountError {
    Negative(Side),
    Currency(CurrencyError),
}

/// Both sides must be non-negative base currency amounts.
fn check_amount(balance: &AccountBalance) -> Result<(), AmountError> {
    for side in [Side::Debit, Side::Credit] {
        let amount = balance.side(side);
        if !amount.currency.is_base() {
            return Err(AmountError::Currency(CurrencyError::CurrencyMismatch {
                expected: Currency::base().symbol,
                actual: amount.currency.symbol.clone(),
            }));
        }
        if amount.is_negative() {
            return Err(AmountError::Negative(side));
        }
    }
    Ok(())
}

/// First nonzero side the account type does not accept.
fn disallowed_side(node: &AccountNode, balance: &AccountBalance) -> Option<Side> {
    [Side::Debit, Side::Credit]
        .into_iter()
        .find(|&side| !balance.side(side).is_zero() && !node.account_type().allows(side))
}

fn sorted<'a>(entries: impl Iterator<Item = &'a Entry>) -> Vec<&'a Entry> {
    let mut entries: Vec<&Entry> = entries.collect();
    entries.sort_by_key(|entry| entry.sort_key());
    entries
}
