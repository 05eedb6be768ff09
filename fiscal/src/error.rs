//! Fiscal-year build errors.

use thiserror::Error;
use uepik_common::{CurrencyError, CurrencySymbol, DocumentId, ErrorCategory};
use uepik_fx::FxError;
use uepik_ledger::LedgerError;

/// Errors aborting a fiscal-year build.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FiscalError {
    /// Configuration cannot be parsed or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Bank records exist for a foreign currency with no opening state.
    #[error("Currency {0} has bank records but no opening balance")]
    MissingOpeningBalance(CurrencySymbol),

    /// Operation has payments but received no reconciled bank records.
    #[error("No bank record for payments of document {0}")]
    MissingBankRecord(DocumentId),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Fx(#[from] FxError),

    #[error(transparent)]
    Currency(#[from] CurrencyError),
}

impl FiscalError {
    /// Get the failure class.
    pub fn category(&self) -> ErrorCategory {
        match self {
            FiscalError::Config(_) | FiscalError::MissingBankRecord(_) => ErrorCategory::Structural,
            FiscalError::MissingOpeningBalance(_) => ErrorCategory::Currency,
            FiscalError::Ledger(e) => e.category(),
            FiscalError::Fx(e) => e.category(),
            FiscalError::Currency(_) => ErrorCategory::Currency,
        }
    }

    /// Get error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            FiscalError::Config(_) => "CONFIG",
            FiscalError::MissingOpeningBalance(_) => "MISSING_OPENING_BALANCE",
            FiscalError::MissingBankRecord(_) => "MISSING_BANK_RECORD",
            FiscalError::Ledger(e) => e.error_code(),
            FiscalError::Fx(e) => e.error_code(),
            FiscalError::Currency(e) => e.error_code(),
        }
    }
}

/// Result type for fiscal-year operations.
pub type FiscalResult<T> = Result<T, FiscalError>;
