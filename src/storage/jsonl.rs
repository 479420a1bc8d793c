//! JSONL ledger storage
//!
//! Records are stored with one JSON object per line. Uses file locking for
//! concurrent access safety; rewrites go through a temp file plus rename so
//! a crash never leaves a half-written ledger.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::domain::{is_barcode, BookRecord, Bookstore, RecordId, RecordStatus, StoreError};

/// One persisted ledger line: the record plus a write timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRecord {
    #[serde(flatten)]
    record: BookRecord,
    /// Stamped on every write; hand-seeded lines may omit it
    #[serde(default = "Utc::now")]
    updated_at: DateTime<Utc>,
}

impl StoredRecord {
    fn stamped(record: BookRecord) -> Self {
        Self {
            record,
            updated_at: Utc::now(),
        }
    }
}

/// Ledger store over a single JSONL file
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    /// Creates a store handle for the given ledger file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the ledger file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates an empty ledger file (and parent directories) if missing
    pub fn init(&self) -> Result<(), StoreError> {
        self.ensure_parent()?;
        OpenOptions::new()
            .write(true)
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;
        Ok(())
    }

    /// Lists all records, sorted by ID
    pub fn records(&self) -> Result<Vec<BookRecord>, StoreError> {
        let mut records: Vec<_> = self.read_all()?.into_iter().map(|s| s.record).collect();
        records.sort_by(|a, b| a.record_id.cmp(&b.record_id));
        Ok(records)
    }

    fn io_err(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn ensure_parent(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<StoredRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path).map_err(|e| self.io_err(e))?;

        // Shared lock for reading; released when the file drops
        file.lock_shared().map_err(|e| self.io_err(e))?;

        let reader = BufReader::new(&file);
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| self.io_err(e))?;

            if line.trim().is_empty() {
                continue;
            }

            let record: StoredRecord =
                serde_json::from_str(&line).map_err(|e| StoreError::Corrupt {
                    path: self.path.clone(),
                    line: line_num + 1,
                    source: e,
                })?;

            records.push(record);
        }

        Ok(records)
    }

    /// Full rewrite, sorted by ID for stable output
    fn write_all(&self, records: &[StoredRecord]) -> Result<(), StoreError> {
        self.ensure_parent()?;

        let temp_path = self.path.with_extension("jsonl.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| self.io_err(e))?;

            file.lock_exclusive().map_err(|e| self.io_err(e))?;

            let mut writer = BufWriter::new(&file);

            let mut sorted: Vec<_> = records.iter().collect();
            sorted.sort_by(|a, b| a.record.record_id.cmp(&b.record.record_id));

            for record in sorted {
                let line = serde_json::to_string(record).map_err(|e| StoreError::Corrupt {
                    path: self.path.clone(),
                    line: 0,
                    source: e,
                })?;
                writeln!(writer, "{}", line).map_err(|e| self.io_err(e))?;
            }

            writer.flush().map_err(|e| self.io_err(e))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| self.io_err(e))?;

        Ok(())
    }

    fn append(&self, record: &StoredRecord) -> Result<(), StoreError> {
        self.ensure_parent()?;

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;

        file.lock_exclusive().map_err(|e| self.io_err(e))?;

        let mut writer = BufWriter::new(&file);
        let line = serde_json::to_string(record).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            line: 0,
            source: e,
        })?;
        writeln!(writer, "{}", line).map_err(|e| self.io_err(e))?;

        writer.flush().map_err(|e| self.io_err(e))?;

        Ok(())
    }
}

impl Bookstore for LedgerStore {
    fn find_by_isbn(&self, isbn: &str) -> Result<Vec<BookRecord>, StoreError> {
        if !is_barcode(isbn) {
            return Err(StoreError::InvalidIsbn(isbn.to_string()));
        }

        // Query the column matching the ISBN length, as the remote ledger did
        let matches = |r: &BookRecord| {
            if isbn.len() == 10 {
                r.isbn10.as_deref() == Some(isbn)
            } else {
                r.isbn13.as_deref() == Some(isbn)
            }
        };

        Ok(self
            .read_all()?
            .into_iter()
            .map(|s| s.record)
            .filter(matches)
            .collect())
    }

    fn get(&self, id: &RecordId) -> Result<BookRecord, StoreError> {
        self.read_all()?
            .into_iter()
            .map(|s| s.record)
            .find(|r| r.record_id.as_ref() == Some(id))
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn create(&mut self, record: BookRecord) -> Result<RecordId, StoreError> {
        let has_isbn = record
            .isbn10
            .as_deref()
            .into_iter()
            .chain(record.isbn13.as_deref())
            .any(|s| !s.is_empty());
        if !has_isbn {
            return Err(StoreError::MissingIsbn);
        }

        let id = RecordId::new(&record.title, Utc::now());
        let stored = StoredRecord::stamped(BookRecord {
            record_id: Some(id.clone()),
            ..record
        });
        self.append(&stored)?;
        Ok(id)
    }

    fn update(&mut self, record: BookRecord) -> Result<(), StoreError> {
        let id = record.record_id.clone().ok_or(StoreError::MissingId)?;

        let mut records = self.read_all()?;
        let slot = records
            .iter_mut()
            .find(|s| s.record.record_id.as_ref() == Some(&id))
            .ok_or(StoreError::NotFound(id))?;

        *slot = StoredRecord::stamped(record);
        self.write_all(&records)
    }

    fn mark_found(&mut self, id: &RecordId) -> Result<(), StoreError> {
        let mut records = self.read_all()?;
        let slot = records
            .iter_mut()
            .find(|s| s.record.record_id.as_ref() == Some(id))
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        // The "found" workflow transition puts the record back in shelf
        slot.record.status = RecordStatus::InShelf;
        slot.updated_at = Utc::now();
        self.write_all(&records)
    }
}
