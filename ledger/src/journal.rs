//! Entries and their provenance.

use std::borrow::Cow;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uepik_common::{Contractor, Document};

use crate::account::AccountId;
use crate::balance::AccountBalance;

/// Identifier of one logical transaction, shared by all accounts it touches.
///
/// Allocated from a per-ledger counter, so later postings have larger IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryId(u64);

impl EntryId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed set of business sources that may post to the ledger.
///
/// Accounts restrict which kinds may post to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvenanceKind {
    /// Received donation.
    Donation,
    /// Sale of goods or services.
    Sell,
    /// Purchased goods or services.
    Purchase,
    /// Bank movement not tied to income or cost.
    Payment,
    /// FX difference realized by a single settlement.
    CurrencyDiff,
    /// Month-end transfer of FX differences into incomes and costs.
    CurrencyDiffSettlement,
    /// VAT register entry.
    Vat,
    /// Daily summary of sales made without an invoice.
    UnrecordedSell,
}

impl fmt::Display for ProvenanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProvenanceKind::Donation => "donation",
            ProvenanceKind::Sell => "sell",
            ProvenanceKind::Purchase => "purchase",
            ProvenanceKind::Payment => "payment",
            ProvenanceKind::CurrencyDiff => "currency_diff",
            ProvenanceKind::CurrencyDiffSettlement => "currency_diff_settlement",
            ProvenanceKind::Vat => "vat",
            ProvenanceKind::UnrecordedSell => "unrecorded_sell",
        };
        write!(f, "{}", name)
    }
}

/// Where an entry comes from.
///
/// Implemented by the business operations; the ledger reads it once when the
/// entry is posted and never interprets it beyond [`Provenance::kind`].
pub trait Provenance {
    fn kind(&self) -> ProvenanceKind;

    /// Date the entry is booked on.
    fn date(&self) -> NaiveDate;

    fn document(&self) -> &Document;

    fn contractor(&self) -> &Contractor;

    fn notes(&self) -> Cow<'_, str>;
}

/// Snapshot of a [`Provenance`] stored with every entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySource {
    pub kind: ProvenanceKind,
    pub date: NaiveDate,
    pub document: Document,
    pub contractor: Contractor,
    pub notes: String,
}

impl EntrySource {
    /// Create a new source.
    pub fn new(
        kind: ProvenanceKind,
        date: NaiveDate,
        document: Document,
        contractor: Contractor,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            date,
            document,
            contractor,
            notes: notes.into(),
        }
    }

    /// Copy the data exposed by a provenance.
    pub fn capture(provenance: &dyn Provenance) -> Self {
        Self {
            kind: provenance.kind(),
            date: provenance.date(),
            document: provenance.document().clone(),
            contractor: provenance.contractor().clone(),
            notes: provenance.notes().into_owned(),
        }
    }

    /// Replace the notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

impl Provenance for EntrySource {
    fn kind(&self) -> ProvenanceKind {
        self.kind
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn document(&self) -> &Document {
        &self.document
    }

    fn contractor(&self) -> &Contractor {
        &self.contractor
    }

    fn notes(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.notes)
    }
}

/// Movement of one account within one logical transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub source: EntrySource,
    /// Sum of every amount the transaction posted to the account.
    pub amount: AccountBalance,
}

impl Entry {
    /// Booking date of the entry.
    pub fn date(&self) -> NaiveDate {
        self.source.date
    }

    /// Ordering key used by entry listings.
    pub fn sort_key(&self) -> (NaiveDate, EntryId) {
        (self.source.date, self.id)
    }
}

/// Amount to post to an account as part of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub account: AccountId,
    pub amount: AccountBalance,
}

impl EntryRecord {
    pub fn new(account: AccountId, amount: AccountBalance) -> Self {
        Self { account, amount }
    }
}
