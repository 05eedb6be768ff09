//! Uepik Fiscal
//!
//! Books the operations of one fiscal year of the organization and derives
//! the tax figures from the resulting ledger.
//!
//! # Example
//!
//! ```rust,ignore
//! use uepik_fiscal::{FiscalYear, FiscalYearConfig, Operation};
//!
//! let config = FiscalYearConfig::from_json(&std::fs::read_to_string("2025.json")?)?;
//! let operations: Vec<Box<dyn Operation>> = vec![Box::new(donation), Box::new(purchase)];
//!
//! let year = FiscalYear::build(config, &operations)?;
//! let cit8 = year.cit8()?;
//! ```

pub mod cit8;
pub mod config;
pub mod error;
pub mod operations;
pub mod overdue;
pub mod year;

pub use cit8::{Cit8, FlowMonth};
pub use config::{CurrencyOpeningConfig, FiscalYearConfig, OpeningConfig};
pub use error::{FiscalError, FiscalResult};
pub use operations::{
    CostTaxType, CurrencyDiffSettlement, Donation, Due, Operation, Payment, PaymentRecord,
    Purchase, SaleRecording, Sell, Service, UnrecordedSell,
};
pub use overdue::{overdues, OverdueRecord};
pub use year::FiscalYear;
