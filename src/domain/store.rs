//! Bookstore capability interface
//!
//! The reconciliation core consumes exactly these five operations and no
//! more. Concrete stores (the JSONL ledger, a remote adapter) live in the
//! storage layer and implement this trait.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::id::RecordId;
use super::record::BookRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("ISBN must be 10 or 13 digits, got '{0}'")]
    InvalidIsbn(String),

    #[error("No record with ID {0}")]
    NotFound(RecordId),

    #[error("Record carries no ISBN")]
    MissingIsbn,

    #[error("Record carries no ID; it was never created")]
    MissingId,

    #[error("Ledger I/O failed at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Corrupt ledger line {line} in {path}")]
    Corrupt {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Narrow interface to the ledger the reconciliation session runs against
///
/// Failure semantics are the caller's problem: the core never retries, and a
/// failing mutation aborts the rest of the execution batch.
pub trait Bookstore {
    /// Looks up records by ISBN; the ISBN must be 10 or 13 digits
    fn find_by_isbn(&self, isbn: &str) -> Result<Vec<BookRecord>, StoreError>;

    /// Fetches a single record by ID
    fn get(&self, id: &RecordId) -> Result<BookRecord, StoreError>;

    /// Creates a new record, returning its assigned ID
    fn create(&mut self, record: BookRecord) -> Result<RecordId, StoreError>;

    /// Replaces the stored record with the same ID
    fn update(&mut self, record: BookRecord) -> Result<(), StoreError>;

    /// Transitions a record's remote status to "found"
    fn mark_found(&mut self, id: &RecordId) -> Result<(), StoreError>;
}
