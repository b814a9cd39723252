//! Append-only record store backed by a CSV artifact
//!
//! The store is loaded once per session, grows by whole batches, and is
//! written back by replacing the artifact atomically. Rows are never edited
//! or removed.

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::schema::{format_refresh_line, parse_refresh_line, COLUMNS, COMMENT_MARKER};
use crate::storage::JobRecord;
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Ordered collection of previously harvested records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    records: Vec<JobRecord>,

    /// Lower-cased ids of everything in `records`
    keys: HashSet<String>,

    last_refresh: Option<String>,
}

impl RecordStore {
    /// Creates an empty store with no refresh marker
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the store from its backing artifact
    ///
    /// A missing or empty artifact yields an empty store rather than an error.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the CSV backing artifact
    ///
    /// # Returns
    ///
    /// * `Ok(RecordStore)` - The persisted records and refresh marker
    /// * `Err(StorageError)` - The artifact exists but could not be read or parsed
    pub fn load(path: &Path) -> StorageResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let store = Self::parse(&content)?;
                tracing::debug!(
                    "Loaded {} records from {} (last refresh: {:?})",
                    store.len(),
                    path.display(),
                    store.last_refresh
                );
                Ok(store)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No dataset at {}, starting empty", path.display());
                Ok(Self::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Parses artifact text: optional refresh line, then a CSV table
    pub fn parse(content: &str) -> StorageResult<Self> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut store = Self::new();

        let (first, rest) = content.split_once('\n').unwrap_or((content, ""));
        let table = if let Some(timestamp) = parse_refresh_line(first) {
            store.last_refresh = Some(timestamp);
            rest
        } else if first.trim_start().starts_with(COMMENT_MARKER) {
            rest
        } else {
            content
        };

        if table.trim().is_empty() {
            return Ok(store);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(table.as_bytes());

        for (index, row) in reader.deserialize::<JobRecord>().enumerate() {
            let record = row?;
            if !record.has_key() {
                tracing::warn!("Skipping row {} in dataset: no slug", index + 1);
                continue;
            }
            if !store.insert(record) {
                tracing::warn!("Dropping duplicate row {} in dataset", index + 1);
            }
        }

        Ok(store)
    }

    /// Returns the records of `batch` whose key is not yet stored
    ///
    /// Keys are compared case-insensitively. A key repeated inside the batch
    /// is kept only at its first occurrence, and records without a key are
    /// never returned.
    pub fn unseen(&self, batch: &[JobRecord]) -> Vec<JobRecord> {
        let mut seen_in_batch = HashSet::new();
        batch
            .iter()
            .filter(|record| record.has_key())
            .filter(|record| {
                let key = record.key();
                !self.keys.contains(&key) && seen_in_batch.insert(key)
            })
            .cloned()
            .collect()
    }

    /// Appends every record whose key is not already present
    ///
    /// Returns how many records were added. Existing rows are never touched,
    /// so appending the same batch twice is a no-op the second time.
    pub fn append<I>(&mut self, batch: I) -> usize
    where
        I: IntoIterator<Item = JobRecord>,
    {
        let mut added = 0;
        for record in batch {
            if !record.has_key() {
                tracing::warn!("Skipping record without slug: {}", record.url);
                continue;
            }
            if self.insert(record) {
                added += 1;
            }
        }
        added
    }

    fn insert(&mut self, record: JobRecord) -> bool {
        if self.keys.insert(record.key()) {
            self.records.push(record);
            true
        } else {
            false
        }
    }

    /// Returns true if a record with this id (any casing) is stored
    pub fn contains(&self, id: &str) -> bool {
        self.keys.contains(&id.trim().to_lowercase())
    }

    /// All records, in insertion order
    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Start time of the last crawl session, as persisted
    pub fn last_refresh(&self) -> Option<&str> {
        self.last_refresh.as_deref()
    }

    /// Stamps the store with the start time of the current session
    pub fn set_last_refresh(&mut self, timestamp: impl Into<String>) {
        self.last_refresh = Some(timestamp.into());
    }

    /// Writes the artifact representation of the store
    pub fn write_to<W: Write>(&self, mut writer: W) -> StorageResult<()> {
        if let Some(timestamp) = &self.last_refresh {
            writeln!(writer, "{}", format_refresh_line(timestamp))?;
        }

        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        csv_writer.write_record(COLUMNS)?;
        for record in &self.records {
            csv_writer.serialize(record)?;
        }
        csv_writer.flush()?;

        Ok(())
    }

    /// Persists the store, replacing the artifact in one rename
    ///
    /// The content goes to a temporary file in the same directory first, so a
    /// failure at any point leaves the previous artifact intact. Only the
    /// records held in memory are written, so rows dropped at load time
    /// (duplicates and rows without a slug) are not written back.
    pub fn save(&self, path: &Path) -> StorageResult<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir)?;
        self.write_to(&mut temp)?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| StorageError::Persist {
            path: path.display().to_string(),
            source: e.error,
        })?;

        tracing::debug!("Saved {} records to {}", self.len(), path.display());
        Ok(())
    }
}
