//! FX error types.

use chrono::NaiveDate;
use thiserror::Error;
use uepik_common::{CurrencyError, CurrencySymbol, ErrorCategory};

/// Errors that can occur while resolving rates and reconciling bank records.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FxError {
    /// No rate in the table for the currency and date.
    #[error("Rate not found for {currency}@{date}")]
    RateNotFound {
        currency: CurrencySymbol,
        date: NaiveDate,
    },

    /// Rate is not positive or has the wrong precision for its currency.
    #[error("Invalid rate {rate} for {currency}@{date}")]
    InvalidRate {
        currency: CurrencySymbol,
        date: NaiveDate,
        rate: String,
    },

    /// Bank record cannot be resolved to a base amount and rate.
    #[error("Invalid bank record {index} on {date}: {reason}")]
    InvalidBankRecord {
        date: NaiveDate,
        index: u64,
        reason: String,
    },

    /// Currency arithmetic failed.
    #[error(transparent)]
    Currency(#[from] CurrencyError),
}

impl FxError {
    /// Get the failure class.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Currency
    }

    /// Get error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            FxError::RateNotFound { .. } => "RATE_NOT_FOUND",
            FxError::InvalidRate { .. } => "INVALID_RATE",
            FxError::InvalidBankRecord { .. } => "INVALID_BANK_RECORD",
            FxError::Currency(e) => e.error_code(),
        }
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;
