//! Session driver
//!
//! Sequences one reconciliation pass: read barcodes, look up candidates,
//! decide, confirm, execute. This is the only place store side effects are
//! triggered, and only after the operator commits.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::domain::{decide_actions, Action, ActionError, ActionSelection, Bookstore, StoreError};

use super::barcode::read_barcodes;
use super::select::SelectionLoop;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Console I/O failed")]
    Io(#[from] io::Error),

    #[error("Ledger lookup failed for ISBN {isbn}")]
    Lookup {
        isbn: String,
        #[source]
        source: StoreError,
    },

    #[error("Action {index} ({name}) failed; {completed} of {total} selected actions had completed")]
    Exec {
        index: usize,
        name: &'static str,
        completed: usize,
        total: usize,
        #[source]
        source: ActionError,
    },
}

/// Result of one reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Operator committed; every selected action executed
    Committed { executed: usize, proposed: usize },
    /// Operator cancelled (or input ended); no side effects
    Cancelled,
}

/// One reconciliation session over a store
pub struct Session<S> {
    store: S,
}

impl<S: Bookstore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Consumes the session, handing the store back
    pub fn into_store(self) -> S {
        self.store
    }

    /// Runs one scan -> decide -> confirm -> execute pass
    ///
    /// Cancellation at any point before commit discards all proposed
    /// actions with no partial effects.
    pub fn run_once<R, W>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<SessionOutcome, SessionError>
    where
        R: BufRead + ?Sized,
        W: Write + ?Sized,
    {
        writeln!(output, "Scan barcodes")?;
        output.flush()?;

        let (barcodes, leftover) = read_barcodes(input)?;

        let mut records = Vec::new();
        for isbn in unique(&barcodes) {
            let found = self
                .store
                .find_by_isbn(isbn)
                .map_err(|source| SessionError::Lookup {
                    isbn: isbn.to_string(),
                    source,
                })?;
            records.extend(found);
        }

        let actions = decide_actions(&barcodes, records);
        if actions.is_empty() {
            writeln!(output, "Nothing to reconcile.")?;
            return Ok(SessionOutcome::Committed {
                executed: 0,
                proposed: 0,
            });
        }
        let proposed = actions.len();

        let selections = SelectionLoop::new(actions).run(input, output, leftover)?;
        match selections {
            None => Ok(SessionOutcome::Cancelled),
            Some(selections) => {
                let executed = self.execute(selections, output)?;
                Ok(SessionOutcome::Committed { executed, proposed })
            }
        }
    }

    /// Executes every selected action in list order, stopping at the first
    /// failure; the error reports how many actions had completed
    fn execute<W: Write + ?Sized>(
        &mut self,
        selections: Vec<ActionSelection>,
        output: &mut W,
    ) -> Result<usize, SessionError> {
        let selected: Vec<Action> = selections
            .into_iter()
            .filter(|s| s.selected)
            .map(|s| s.action)
            .collect();
        let total = selected.len();

        for (index, action) in selected.iter().enumerate() {
            action
                .act(&mut self.store, output)
                .map_err(|source| SessionError::Exec {
                    index,
                    name: action.name(),
                    completed: index,
                    total,
                    source,
                })?;
        }

        Ok(total)
    }
}

/// Deduplicates barcodes preserving first-seen order, so each ISBN is
/// looked up once and lookup order is deterministic
fn unique(barcodes: &[String]) -> Vec<&String> {
    let mut seen = Vec::new();
    for barcode in barcodes {
        if !seen.contains(&barcode) {
            seen.push(barcode);
        }
    }
    seen
}
