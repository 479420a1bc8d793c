//! Book record domain model
//!
//! A [`BookRecord`] is an immutable snapshot of one ledger entry. The
//! reconciliation pipeline never mutates a record in place; corrections are
//! expressed as new values handed back to the store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::id::RecordId;

/// Bucket key for records carrying no ISBN at all
pub const UNKNOWN_ISBN: &str = "UNKNOWN_ISBN";

/// Title placeholder for records registered from a bare barcode
pub const NO_TITLE: &str = "NO_TITLE";

/// Classification placeholder for records awaiting human categorization
pub const UNCATEGORIZED: &str = "UNCATEGORIZED (please classify)";

#[derive(Debug, Error, PartialEq)]
#[error("Unknown record status: '{0}' (expected in-shelf, borrowed, or lost)")]
pub struct StatusParseError(String);

/// Shelf status of a ledger record
///
/// Declaration order doubles as the ranking ordinal: an in-shelf record is
/// preferred over a borrowed one, which is preferred over a lost one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    InShelf,
    Borrowed,
    Lost,
}

impl RecordStatus {
    /// Returns a display label for the status
    pub fn label(&self) -> &'static str {
        match self {
            RecordStatus::InShelf => "in-shelf",
            RecordStatus::Borrowed => "borrowed",
            RecordStatus::Lost => "lost",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RecordStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in-shelf" | "in_shelf" => Ok(RecordStatus::InShelf),
            "borrowed" => Ok(RecordStatus::Borrowed),
            "lost" => Ok(RecordStatus::Lost),
            other => Err(StatusParseError(other.to_string())),
        }
    }
}

/// Whether the physical book is believed to exist
///
/// Serialized as the ledger's historical one-letter codes: `"o"` for a book
/// confirmed present, `"x"` for one confirmed absent or discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Existence {
    #[serde(rename = "o")]
    Present,
    #[serde(rename = "x")]
    Absent,
}

impl Existence {
    /// Returns true if the book is confirmed present
    pub fn is_present(&self) -> bool {
        matches!(self, Existence::Present)
    }
}

/// One ledger entry for a physical book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Store-assigned identifier; absent until the record is created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<RecordId>,

    /// Shelf status
    pub status: RecordStatus,

    /// Book title
    pub title: String,

    /// ISBN-10, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn10: Option<String>,

    /// ISBN-13, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn13: Option<String>,

    /// Existence flag (`"o"` present / `"x"` absent)
    pub exists: Existence,

    /// Whether this count cycle has already reconciled the record
    pub inventoried: bool,

    /// Free-text classification
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
}

fn default_kind() -> String {
    UNCATEGORIZED.to_string()
}

impl BookRecord {
    /// Returns the join key between this record and scanned barcodes:
    /// ISBN-13 if non-empty, else ISBN-10, else the shared unknown bucket.
    pub fn effective_isbn(&self) -> &str {
        if let Some(isbn13) = non_empty(&self.isbn13) {
            isbn13
        } else if let Some(isbn10) = non_empty(&self.isbn10) {
            isbn10
        } else {
            UNKNOWN_ISBN
        }
    }

    /// Returns a copy of this record with the inventoried flag replaced
    pub fn with_inventoried(&self, inventoried: bool) -> Self {
        Self {
            inventoried,
            ..self.clone()
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Returns true if a scanned token has the shape of an ISBN barcode:
/// all digits and exactly 10 or 13 of them.
pub fn is_barcode(token: &str) -> bool {
    matches!(token.len(), 10 | 13) && token.bytes().all(|b| b.is_ascii_digit())
}
