//! Ledger error types.

use std::fmt;

use thiserror::Error;
use uepik_common::{CurrencyError, ErrorCategory};

use crate::account::{AccountId, AccountIdPart};
use crate::balance::Side;
use crate::journal::ProvenanceKind;

/// Broken bookkeeping rule reported by [`LedgerError::InvariantViolation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// Opening balance set on an account with children.
    OpeningOnNonLeaf,
    /// Opening balance set twice.
    AlreadyOpened,
    /// Opening balance set after entries were posted.
    AlreadyPosted,
    /// Opening balance on a side the account type does not allow.
    SideNotAllowed(Side),
    /// Negative amount on one side of a balance.
    NegativeAmount(Side),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::OpeningOnNonLeaf => write!(f, "opening balance on non-leaf account"),
            Violation::AlreadyOpened => write!(f, "opening balance already set"),
            Violation::AlreadyPosted => write!(f, "account already has entries"),
            Violation::SideNotAllowed(side) => write!(f, "{} not allowed", side),
            Violation::NegativeAmount(side) => write!(f, "negative {} amount", side),
        }
    }
}

/// Errors raised while building or posting to the chart of accounts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Account path has no parts.
    #[error("Empty account ID")]
    EmptyAccountId,

    /// No account under the path.
    #[error("Unknown account: {0}")]
    UnknownAccount(AccountId),

    /// Posting to an account with children.
    #[error("Entry must be added to a leaf account, {0} has children")]
    NotLeaf(AccountId),

    /// Posting a side the account type does not allow.
    #[error("{side} not allowed on account {account}")]
    SideNotAllowed { account: AccountId, side: Side },

    /// Bookkeeping rule broken.
    #[error("Invariant violation on account {account}: {violation}")]
    InvariantViolation {
        account: AccountId,
        violation: Violation,
    },

    /// Provenance kind not whitelisted on the account.
    #[error("Source {kind} not allowed on account {account}")]
    ProvenanceNotAllowed {
        account: AccountId,
        kind: ProvenanceKind,
    },

    /// Child allows a side its parent does not.
    #[error("{side} allowed on child {child} but not on parent {parent}")]
    InvalidHierarchy {
        parent: AccountIdPart,
        child: AccountIdPart,
        side: Side,
    },

    /// Two siblings share an ID part.
    #[error("Account {child} registered twice under {parent}")]
    DuplicateChild {
        parent: AccountIdPart,
        child: AccountIdPart,
    },

    /// Two roots of a tree share an ID part.
    #[error("Root account {0} registered twice")]
    DuplicateRoot(AccountIdPart),

    /// Currency arithmetic failed.
    #[error(transparent)]
    Currency(#[from] CurrencyError),
}

impl LedgerError {
    /// Get the failure class.
    pub fn category(&self) -> ErrorCategory {
        match self {
            LedgerError::EmptyAccountId
            | LedgerError::UnknownAccount(_)
            | LedgerError::NotLeaf(_)
            | LedgerError::DuplicateChild { .. }
            | LedgerError::DuplicateRoot(_) => ErrorCategory::Structural,
            LedgerError::SideNotAllowed { .. }
            | LedgerError::InvariantViolation { .. }
            | LedgerError::InvalidHierarchy { .. } => ErrorCategory::Invariant,
            LedgerError::ProvenanceNotAllowed { .. } => ErrorCategory::Provenance,
            LedgerError::Currency(_) => ErrorCategory::Currency,
        }
    }

    /// Get error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            LedgerError::EmptyAccountId => "EMPTY_ACCOUNT_ID",
            LedgerError::UnknownAccount(_) => "UNKNOWN_ACCOUNT",
            LedgerError::NotLeaf(_) => "NOT_LEAF",
            LedgerError::SideNotAllowed { .. } => "SIDE_NOT_ALLOWED",
            LedgerError::InvariantViolation { .. } => "INVARIANT_VIOLATION",
            LedgerError::ProvenanceNotAllowed { .. } => "PROVENANCE_NOT_ALLOWED",
            LedgerError::InvalidHierarchy { .. } => "INVALID_HIERARCHY",
            LedgerError::DuplicateChild { .. } => "DUPLICATE_CHILD",
            LedgerError::DuplicateRoot(_) => "DUPLICATE_ROOT",
            LedgerError::Currency(e) => e.error_code(),
        }
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
