//! Ledger CLI commands

use std::io;

use anyhow::{bail, Result};

use super::output::Output;
use crate::domain::{
    is_barcode, BookRecord, Bookstore, Existence, RecordId, RecordStatus, UNCATEGORIZED,
};
use crate::session::{Session, SessionOutcome};
use crate::storage::LedgerStore;

/// Runs one interactive reconciliation session on stdin/stdout
pub fn run_session(store: LedgerStore, output: &Output) -> Result<()> {
    output.verbose_ctx("run", "Starting reconciliation session");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut console = stdout.lock();

    let mut session = Session::new(store);
    let outcome = session.run_once(&mut input, &mut console)?;
    drop(console);

    match outcome {
        SessionOutcome::Committed { executed, proposed } => {
            output.success(&format!(
                "Executed {} of {} proposed action(s).",
                executed, proposed
            ));
        }
        SessionOutcome::Cancelled => {
            output.success("Cancelled; no actions executed.");
        }
    }
    Ok(())
}

/// Lists all ledger records
pub fn list(store: &LedgerStore, output: &Output) -> Result<()> {
    let records = store.records()?;
    output.verbose_ctx("list", &format!("{} record(s) in ledger", records.len()));

    if output.is_json() {
        output.data(&records);
        return Ok(());
    }

    for record in &records {
        let id = record
            .record_id
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".to_string());
        let marker = if record.inventoried { "[*]" } else { "[ ]" };
        println!(
            "{}  {}  {:8}  {:13}  {} ({})",
            id,
            marker,
            record.status,
            record.effective_isbn(),
            record.title,
            record.kind
        );
    }
    Ok(())
}

/// Shows a single record by ID
pub fn show(store: &LedgerStore, id: &str, output: &Output) -> Result<()> {
    let id: RecordId = id.parse()?;
    let record = store.get(&id)?;

    if output.is_json() {
        output.data(&record);
        return Ok(());
    }

    println!("ID:          {}", id);
    println!("Title:       {}", record.title);
    println!("Status:      {}", record.status);
    println!("ISBN-10:     {}", record.isbn10.as_deref().unwrap_or("-"));
    println!("ISBN-13:     {}", record.isbn13.as_deref().unwrap_or("-"));
    println!(
        "Exists:      {}",
        if record.exists.is_present() {
            "present"
        } else {
            "absent"
        }
    );
    println!("Inventoried: {}", record.inventoried);
    println!("Type:        {}", record.kind);
    Ok(())
}

/// Seeds the ledger with a record
pub fn add(
    mut store: LedgerStore,
    title: &str,
    isbn: &str,
    status: RecordStatus,
    kind: Option<String>,
    output: &Output,
) -> Result<()> {
    if !is_barcode(isbn) {
        bail!("ISBN must be 10 or 13 digits, got '{}'", isbn);
    }

    let record = BookRecord {
        record_id: None,
        status,
        title: title.to_string(),
        isbn10: (isbn.len() == 10).then(|| isbn.to_string()),
        isbn13: (isbn.len() == 13).then(|| isbn.to_string()),
        exists: Existence::Present,
        inventoried: false,
        kind: kind.unwrap_or_else(|| UNCATEGORIZED.to_string()),
    };
    let id = store.create(record)?;

    if output.is_json() {
        output.data(&serde_json::json!({ "id": id.to_string() }));
    } else {
        output.success(&format!("Created record {}", id));
    }
    Ok(())
}
