//! oroshi - barcode-driven bookshelf inventory reconciliation
//!
//! Oroshi reconciles a physical, barcode-scanned inventory count against a
//! bookstore ledger: scanned ISBNs are matched to ledger records, each scan
//! gets a proposed corrective action, and the operator confirms or vetoes
//! individual actions before anything is written back.

pub mod domain;
pub mod storage;
pub mod session;
pub mod cli;

pub use domain::{Action, ActionSelection, BookRecord, Bookstore, RecordId, RecordStatus};
