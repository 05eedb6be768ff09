//! Uepik Ledger
//!
//! Hierarchical chart of accounts with double-entry posting, per-month
//! balance aggregation and ordered entry queries for one fiscal period.

pub mod account;
pub mod balance;
pub mod chart;
pub mod engine;
pub mod error;
pub mod journal;

pub use account::{
    Account, AccountDefinition, AccountId, AccountIdPart, AccountNode, AccountTree, AccountType,
    ValidSources,
};
pub use balance::{AccountBalance, Side};
pub use chart::organization_chart;
pub use engine::ChartOfAccounts;
pub use error::{LedgerError, LedgerResult, Violation};
pub use journal::{Entry, EntryId, EntryRecord, EntrySource, Provenance, ProvenanceKind};
