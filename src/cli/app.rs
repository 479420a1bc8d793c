//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::ledger;
use super::output::{Output, OutputFormat};
use crate::domain::RecordStatus;
use crate::storage::{Config, LedgerStore};

#[derive(Parser)]
#[command(name = "oroshi")]
#[command(author, version, about = "Barcode-driven bookshelf inventory reconciliation")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Ledger file path (overrides configuration)
    #[arg(long, global = true, env = "OROSHI_LEDGER")]
    pub ledger: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty ledger file
    Init,

    /// Run one reconciliation session: scan barcodes, confirm, execute
    Run,

    /// List ledger records
    List,

    /// Show record details
    Show {
        /// Record ID
        id: String,
    },

    /// Add a record to the ledger
    Add {
        /// Book title
        #[arg(long)]
        title: String,

        /// ISBN (10 or 13 digits)
        #[arg(long)]
        isbn: String,

        /// Classification
        #[arg(long)]
        kind: Option<String>,

        /// Shelf status (in-shelf, borrowed, lost)
        #[arg(long, default_value = "in-shelf")]
        status: RecordStatus,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    let config = Config::load()?;
    let ledger_path = config.ledger_path(cli.ledger.as_deref());
    output.verbose(&format!("Using ledger: {}", ledger_path.display()));

    let store = LedgerStore::new(&ledger_path);

    match cli.command {
        Commands::Init => {
            store.init()?;
            output.success(&format!("Initialized ledger at {}", ledger_path.display()));
        }

        Commands::Run => ledger::run_session(store, &output)?,

        Commands::List => ledger::list(&store, &output)?,

        Commands::Show { id } => ledger::show(&store, &id, &output)?,

        Commands::Add {
            title,
            isbn,
            kind,
            status,
        } => ledger::add(store, &title, &isbn, status, kind, &output)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}
