//! Property tests for ledger balances and entry ordering.

use chrono::NaiveDate;
use proptest::prelude::*;
use uepik_common::{Contractor, Currency, Denom, Document, Number, Period};
use uepik_ledger::{
    Account, AccountBalance, AccountId, AccountIdPart, AccountTree, AccountType, ChartOfAccounts,
    EntryRecord, EntrySource, ProvenanceKind, ValidSources,
};

const CASH: AccountIdPart = AccountIdPart::from_static("cash");

#[derive(Debug, Clone)]
struct Posting {
    month: u32,
    day: u32,
    debit: bool,
    cents: u64,
}

fn posting() -> impl Strategy<Value = Posting> {
    (1u32..=12, 1u32..=28, any::<bool>(), 1u64..1_000_000).prop_map(|(month, day, debit, cents)| {
        Posting {
            month,
            day,
            debit,
            cents,
        }
    })
}

fn pln_cents(cents: u64) -> Denom {
    Denom::new(Currency::pln(), Number::new(cents / 100, cents % 100, 2).unwrap())
}

fn cash() -> AccountId {
    AccountId::new([CASH])
}

fn ledger(opening: u64) -> ChartOfAccounts {
    let tree = AccountTree::new(vec![Account::leaf(CASH, AccountType::Assets, ValidSources::All)])
        .unwrap();
    let mut ledger = ChartOfAccounts::new(Period::year(2025).unwrap(), tree);
    ledger
        .open_account(&cash(), AccountBalance::debit(pln_cents(opening)))
        .unwrap();
    ledger
}

fn post(ledger: &mut ChartOfAccounts, posting: &Posting) {
    let date = NaiveDate::from_ymd_opt(2025, posting.month, posting.day).unwrap();
    let source = EntrySource::new(
        ProvenanceKind::Payment,
        date,
        Document::new("WB/1", date),
        Contractor::default(),
        "",
    );
    let amount = if posting.debit {
        AccountBalance::debit(pln_cents(posting.cents))
    } else {
        AccountBalance::credit(pln_cents(posting.cents))
    };
    ledger
        .add_entry(&source, &[EntryRecord::new(cash(), amount)])
        .unwrap();
}

fn month_start(month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, 1).unwrap()
}

proptest! {
    #[test]
    fn incremental_is_opening_plus_months(
        opening in 0u64..10_000_000,
        postings in prop::collection::vec(posting(), 0..60),
    ) {
        let mut ledger = ledger(opening);
        for p in &postings {
            post(&mut ledger, p);
        }

        let mut expected = ledger.opening_balance(&cash()).unwrap();
        for month in 1..=12 {
            let date = month_start(month);
            expected = expected.add(&ledger.balance_month(&cash(), date).unwrap()).unwrap();
            prop_assert_eq!(ledger.balance_incremental(&cash(), date).unwrap(), expected.clone());
        }
        prop_assert_eq!(ledger.balance(&cash()).unwrap(), expected);
    }

    #[test]
    fn entries_are_ordered_and_stable(postings in prop::collection::vec(posting(), 0..60)) {
        let mut ledger = ledger(0);
        for p in &postings {
            post(&mut ledger, p);
        }

        let first: Vec<_> = ledger.entries(&cash()).unwrap().into_iter().cloned().collect();
        let second: Vec<_> = ledger.entries(&cash()).unwrap().into_iter().cloned().collect();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), postings.len());
        for pair in first.windows(2) {
            prop_assert!(pair[0].sort_key() < pair[1].sort_key());
        }

        for month in 1..=12 {
            let entries = ledger.entries_month(&cash(), month_start(month)).unwrap();
            for pair in entries.windows(2) {
                prop_assert!(pair[0].sort_key() < pair[1].sort_key());
            }
        }
    }

    #[test]
    fn period_total_is_order_independent(
        opening in 0u64..10_000_000,
        postings in prop::collection::vec(posting(), 1..60),
        seed in any::<u64>(),
    ) {
        let mut forward = ledger(opening);
        for p in &postings {
            post(&mut forward, p);
        }

        let mut shuffled = postings.clone();
        let len = shuffled.len();
        shuffled.rotate_left((seed as usize) % len);
        shuffled.reverse();
        let mut backward = ledger(opening);
        for p in &shuffled {
            post(&mut backward, p);
        }

        let mut expected = AccountBalance::debit(pln_cents(opening));
        for p in &postings {
            let amount = if p.debit {
                AccountBalance::debit(pln_cents(p.cents))
            } else {
                AccountBalance::credit(pln_cents(p.cents))
            };
            expected = expected.add(&amount).unwrap();
        }
        let expected = expected.debit_minus_credit().unwrap();

        prop_assert_eq!(forward.balance(&cash()).unwrap(), expected.clone());
        prop_assert_eq!(backward.balance(&cash()).unwrap(), expected);
    }
}
