//! oroshi - barcode-driven bookshelf inventory reconciliation

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = oroshi::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
