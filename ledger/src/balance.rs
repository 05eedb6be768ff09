//! Debit/credit balance pairs.

use serde::{Deserialize, Serialize};
use std::fmt;
use uepik_common::{CurrencyResult, Denom};

/// Side of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Debit (increases assets and costs, decreases liabilities and incomes).
    Debit,
    /// Credit (decreases assets and costs, increases liabilities and incomes).
    Credit,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Debit => write!(f, "debit"),
            Side::Credit => write!(f, "credit"),
        }
    }
}

/// Accumulated debit and credit amounts in the base currency.
///
/// Both sides only ever grow; the net value depends on the account type and
/// is derived on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub debit: Denom,
    pub credit: Denom,
}

impl AccountBalance {
    /// Zero on both sides.
    pub fn zero() -> Self {
        Self {
            debit: Denom::base_zero(),
            credit: Denom::base_zero(),
        }
    }

    /// Balance with debit only.
    pub fn debit(amount: Denom) -> Self {
        Self {
            debit: amount,
            credit: Denom::base_zero(),
        }
    }

    /// Balance with credit only.
    pub fn credit(amount: Denom) -> Self {
        Self {
            debit: Denom::base_zero(),
            credit: amount,
        }
    }

    /// Amount on the given side.
    pub fn side(&self, side: Side) -> &Denom {
        match side {
            Side::Debit => &self.debit,
            Side::Credit => &self.credit,
        }
    }

    /// Check if both sides are zero.
    pub fn is_zero(&self) -> bool {
        self.debit.is_zero() && self.credit.is_zero()
    }

    /// Add balances side by side.
    pub fn add(&self, other: &AccountBalance) -> CurrencyResult<AccountBalance> {
        Ok(Self {
            debit: self.debit.add(&other.debit)?,
            credit: self.credit.add(&other.credit)?,
        })
    }

    pub fn debit_minus_credit(&self) -> CurrencyResult<Denom> {
        self.debit.sub(&self.credit)
    }

    pub fn credit_minus_debit(&self) -> CurrencyResult<Denom> {
        self.credit.sub(&self.debit)
    }
}

impl Default for AccountBalance {
    fn default() -> Self {
        Self::zero()
    }
}
