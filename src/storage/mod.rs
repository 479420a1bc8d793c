//! # Storage Layer
//!
//! Concrete persistence for the reconciliation core.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Ledger | JSONL (one record per line) | configurable, default `<data dir>/ledger.jsonl` |
//! | Config | TOML | `./oroshi.toml` or `~/.config/oroshi/config.toml` |
//!
//! [`LedgerStore`] implements the [`crate::domain::Bookstore`] capability
//! trait over the ledger file, with `fs2` locking and atomic rewrites
//! (temp file + rename). The original system kept the ledger in a remote
//! database; a network adapter would slot in as another trait impl.

mod jsonl;
mod config;

pub use jsonl::LedgerStore;
pub use config::{Config, ConfigError};
