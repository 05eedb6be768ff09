//! Uepik FX
//!
//! Foreign exchange handling for the uepik accounting engine.
//!
//! # Features
//!
//! - Date-indexed rate table producing base-currency amounts
//! - Bank currency reconciliation with a running weighted-average rate
//!
//! # Example
//!
//! ```rust,ignore
//! use uepik_common::Currency;
//! use uepik_fx::CurrencyRateTable;
//!
//! let eur = Currency::eur();
//! let mut rates = CurrencyRateTable::new();
//! rates.insert(&eur, date, eur.rate("4.3000")?)?;
//!
//! let (base, rate) = rates.to_base(&eur.amount("100.00")?, date)?;
//! ```

pub mod bank;
pub mod error;
pub mod rates;

pub use bank::{bank_report, BankReconciler, BankRecord, CurrencyOpening, ReconciledRecord};
pub use error::{FxError, FxResult};
pub use rates::{CurrencyRateTable, RateEntry};
