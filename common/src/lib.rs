//! Uepik Common Types
//!
//! Shared value types for the uepik accounting engine: exact fixed-precision
//! numbers, currencies and currency-tagged amounts, documents, and fiscal
//! calendar helpers.

pub mod document;
pub mod error;
pub mod monetary;
pub mod number;
pub mod time;

pub use document::*;
pub use error::*;
pub use monetary::*;
pub use number::*;
pub use time::*;
