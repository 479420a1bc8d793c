//! Corrective actions proposed by the decision engine
//!
//! The catalog is a closed set: the Decider's classification is a total
//! function over these five outcomes, and `match` keeps it exhaustively
//! checkable. Actions are immutable once decided; [`Action::act`] is the
//! only mutating step and runs after the operator confirms the list.

use std::io::Write;

use thiserror::Error;

use super::record::{BookRecord, Existence, RecordStatus, NO_TITLE, UNCATEGORIZED};
use super::store::{Bookstore, StoreError};

#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to write notification")]
    Io(#[from] std::io::Error),
}

/// One corrective step for one scanned barcode
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Record matches physical reality; mark the count confirmed
    TakeInventory(BookRecord),
    /// No un-reconciled ledger entry for this barcode; create one
    RegisterNew { isbn: String },
    /// Ledger says the book is gone, yet it was scanned; discard the stale copy
    Discard(BookRecord),
    /// Ledger says borrowed, yet it was scanned; needs human judgment
    Investigate(BookRecord),
    /// Ledger says lost, the scan proves otherwise; mark it found
    Found(BookRecord),
}

impl Action {
    /// Returns the display name of the action
    pub fn name(&self) -> &'static str {
        match self {
            Action::TakeInventory(_) => "TakeInventory",
            Action::RegisterNew { .. } => "RegisterNew",
            Action::Discard(_) => "Discard",
            Action::Investigate(_) => "Investigate",
            Action::Found(_) => "Found",
        }
    }

    /// Returns the associated record, if the action carries one
    pub fn record(&self) -> Option<&BookRecord> {
        match self {
            Action::TakeInventory(r)
            | Action::Discard(r)
            | Action::Investigate(r)
            | Action::Found(r) => Some(r),
            Action::RegisterNew { .. } => None,
        }
    }

    /// Returns the ISBN this action is about: the record's effective ISBN,
    /// or the scanned barcode for a registration
    pub fn isbn(&self) -> &str {
        match self {
            Action::RegisterNew { isbn } => isbn,
            other => other
                .record()
                .map(BookRecord::effective_isbn)
                .unwrap_or_default(),
        }
    }

    /// Executes the action's effect against the store
    ///
    /// Discard and Investigate are pure notifications written to `out`;
    /// physical disposal and shelf checks are human tasks. Store failures
    /// propagate uncaught.
    pub fn act<W: Write + ?Sized>(
        &self,
        store: &mut dyn Bookstore,
        out: &mut W,
    ) -> Result<(), ActionError> {
        match self {
            Action::TakeInventory(record) => {
                store.update(record.with_inventoried(true))?;
            }
            Action::RegisterNew { isbn } => {
                store.create(registration(isbn))?;
            }
            Action::Discard(record) => {
                writeln!(
                    out,
                    "Please discard this book: \"{}\" (ISBN={})",
                    record.title,
                    record.effective_isbn()
                )?;
            }
            Action::Investigate(record) => {
                writeln!(
                    out,
                    "This book's borrowed on record, but it's here. \
                     Please investigate it: \"{}\" (ISBN={})",
                    record.title,
                    record.effective_isbn()
                )?;
            }
            Action::Found(record) => {
                let id = record
                    .record_id
                    .clone()
                    .ok_or(StoreError::MissingId)?;
                // Status transition first; the inventory update supersedes
                // it on overlapping fields.
                store.mark_found(&id)?;
                store.update(record.with_inventoried(true))?;
            }
        }
        Ok(())
    }
}

/// Builds the placeholder record a registration creates: the barcode lands
/// in the ISBN column matching its length, everything else awaits a human.
/// An off-length token fills neither column and the store rejects it.
fn registration(isbn: &str) -> BookRecord {
    BookRecord {
        record_id: None,
        status: RecordStatus::InShelf,
        title: NO_TITLE.to_string(),
        isbn10: (isbn.len() == 10).then(|| isbn.to_string()),
        isbn13: (isbn.len() == 13).then(|| isbn.to_string()),
        exists: Existence::Present,
        inventoried: true,
        kind: UNCATEGORIZED.to_string(),
    }
}

/// An action paired with its confirmation flag
///
/// Every decided action starts selected; the Selection Loop is the only
/// place the flag flips, and the executor consumes it exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSelection {
    pub selected: bool,
    pub action: Action,
}

impl ActionSelection {
    /// Wraps an action, selected by default
    pub fn new(action: Action) -> Self {
        Self {
            selected: true,
            action,
        }
    }

    /// Flips the selection flag
    pub fn toggle(&mut self) {
        self.selected = !self.selected;
    }
}
