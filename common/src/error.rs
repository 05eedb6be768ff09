//! Error types for decimal and currency arithmetic.

use thiserror::Error;

use crate::CurrencySymbol;

/// Failure classes shared by every uepik error type.
///
/// All of them abort the fiscal-year build; none is retryable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Unknown account path, posting to a non-leaf account.
    Structural,
    /// Illegal debit/credit side, double opening balance, opening a non-leaf.
    Invariant,
    /// Source kind not allowed on an account.
    Provenance,
    /// Currency mismatch, missing FX rate, precision loss.
    Currency,
}

/// Errors raised by [`Number`](crate::Number) and [`Denom`](crate::Denom) arithmetic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurrencyError {
    /// Fractional part occupies a whole unit, or the value left the decimal range.
    #[error("Decimal overflow: {0}")]
    Overflow(String),

    /// Result cannot be represented at the expected precision without loss.
    #[error("Precision loss: {value} cannot be stored with {precision} fractional digits")]
    PrecisionLoss { value: String, precision: u32 },

    /// Binary operation on amounts of different currencies.
    #[error("Currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch {
        expected: CurrencySymbol,
        actual: CurrencySymbol,
    },

    /// Rate between a zero and a non-zero amount.
    #[error("Undefined rate between {numerator} and {denominator}")]
    UndefinedRate {
        numerator: String,
        denominator: String,
    },

    /// Currency symbol is not registered.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(CurrencySymbol),

    /// Text is not a decimal number.
    #[error("Invalid number '{0}'")]
    InvalidNumber(String),
}

impl CurrencyError {
    /// Get the failure class.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Currency
    }

    /// Get error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            CurrencyError::Overflow(_) => "OVERFLOW",
            CurrencyError::PrecisionLoss { .. } => "PRECISION_LOSS",
            CurrencyError::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            CurrencyError::UndefinedRate { .. } => "UNDEFINED_RATE",
            CurrencyError::UnknownCurrency(_) => "UNKNOWN_CURRENCY",
            CurrencyError::InvalidNumber(_) => "INVALID_NUMBER",
        }
    }
}

/// Result type alias for currency arithmetic.
pub type CurrencyResult<T> = std::result::Result<T, CurrencyError>;
