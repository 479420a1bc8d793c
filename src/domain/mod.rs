//! Domain models and decision logic for oroshi
//!
//! Contains the reconciliation core without any I/O concerns: the ledger
//! record model, the closed action catalog, the decision engine, and the
//! capability trait concrete stores implement.

mod id;
mod record;
mod store;
mod action;
mod decide;

pub use id::{IdError, RecordId};
pub use record::{
    is_barcode, BookRecord, Existence, RecordStatus, StatusParseError, NO_TITLE, UNCATEGORIZED,
    UNKNOWN_ISBN,
};
pub use store::{Bookstore, StoreError};
pub use action::{Action, ActionError, ActionSelection};
pub use decide::{decide_actions, group_by_isbn, rank_records};
