//! # Reconciliation Session
//!
//! One pass of scan -> decide -> confirm -> execute over line-oriented
//! streams. Everything here is synchronous and blocking: rendering and
//! reading alternate strictly, and cancellation (the `quit` command or end
//! of input) discards all proposed actions before any side effect runs.

mod barcode;
mod select;
mod driver;

pub use barcode::read_barcodes;
pub use select::{Command, SelectionLoop, State};
pub use driver::{Session, SessionError, SessionOutcome};
