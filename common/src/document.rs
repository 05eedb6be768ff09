//! Accounting documents and contractors.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an accounting document (invoice number, bank statement, etc.).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a new document ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Sheet-safe form of the ID (`FV/2025/1` becomes `FV.2025.1`).
    pub fn sheet_name(&self) -> String {
        self.0.replace('/', ".")
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A document backing an accounting entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Document {
    /// Document identifier.
    pub id: DocumentId,
    /// Date the document was issued.
    pub date: NaiveDate,
}

impl Document {
    /// Create a new document.
    pub fn new(id: impl Into<DocumentId>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            date,
        }
    }
}

/// The other party of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Contractor {
    pub name: String,
    pub address: String,
    /// Tax identification number, empty for private persons.
    #[serde(default)]
    pub tax_id: String,
}

impl Contractor {
    /// Create a new contractor.
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        tax_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            tax_id: tax_id.into(),
        }
    }
}
