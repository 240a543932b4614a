//! Storage layer for instat.
//!
//! This module provides the tabular record store: each storage key maps to a
//! `<key>.csv` file under a base directory, holding a header row followed by
//! one row per record. Records are addressed by their position in the file.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::Record;

/// File extension of backing files.
const FILE_EXTENSION: &str = "csv";

/// Extension of the scratch file a full rewrite goes through.
const SCRATCH_EXTENSION: &str = "csv.tmp";

/// Flat-file record store.
///
/// Provides persistent storage of ordered record collections with support for:
/// - Full read and full overwrite of a collection
/// - Appending a single record without rewriting the file
/// - Update and delete by positional index
///
/// Every operation holds a per-key lock for its whole duration, so
/// read-modify-write sequences on one key are serialized within a process.
/// Nothing guards against other processes editing the same files.
#[derive(Debug)]
pub struct RecordStore {
    /// Directory holding the backing files.
    base_dir: PathBuf,
    /// One lock per storage key, created on first use.
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl RecordStore {
    /// Open a store rooted at the given directory.
    ///
    /// Creates the directory and its parents if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();

        if !base_dir.exists() {
            fs::create_dir_all(&base_dir).map_err(|source| Error::DirectoryCreate {
                path: base_dir.clone(),
                source,
            })?;
            info!("Created data directory {}", base_dir.display());
        }

        debug!("Opened record store at {}", base_dir.display());
        Ok(Self {
            base_dir,
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// Get the directory holding the backing files.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the backing file path for a storage key.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.{FILE_EXTENSION}"))
    }

    /// Check whether a backing file exists for the key.
    #[must_use]
    pub fn exists(&self, key: &str) -> bool {
        self.path_for(key).is_file()
    }

    /// Read every record stored under `key`, in file order.
    ///
    /// Header names and values are trimmed of surrounding whitespace. A key
    /// with no backing file reads as an empty collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not well-formed CSV
    /// (including rows whose column count differs from the header).
    pub fn read(&self, key: &str) -> Result<Vec<Record>> {
        let lock = self.key_lock(key);
        let _guard = lock.lock();
        read_file(&self.path_for(key))
    }

    /// Replace everything stored under `key`.
    ///
    /// Writes the header row (`schema`) followed by one row per record.
    /// Fields outside the schema are dropped and schema fields a record lacks
    /// are written as empty strings.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write<S: AsRef<str>>(&self, key: &str, records: &[Record], schema: &[S]) -> Result<()> {
        let lock = self.key_lock(key);
        let _guard = lock.lock();
        write_file(&self.path_for(key), records, schema)
    }

    /// Append one record as a new trailing row.
    ///
    /// If the backing file does not exist yet (or is empty), the header row is
    /// written first. Existing rows are never read or rewritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or written.
    pub fn append<S: AsRef<str>>(&self, key: &str, record: &Record, schema: &[S]) -> Result<()> {
        let lock = self.key_lock(key);
        let _guard = lock.lock();

        let path = self.path_for(key);
        let needs_header = match fs::metadata(&path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => return Err(Error::file_access(&path, e)),
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| Error::file_access(&path, source))?;
        let mut writer = csv::Writer::from_writer(file);

        if needs_header {
            writer
                .write_record(schema.iter().map(AsRef::<str>::as_ref))
                .map_err(|source| Error::csv(&path, source))?;
        }
        writer
            .write_record(record.project(schema))
            .map_err(|source| Error::csv(&path, source))?;
        writer
            .flush()
            .map_err(|source| Error::file_access(&path, source))?;

        info!("Appended record to {}", key);
        Ok(())
    }

    /// Replace the record at `index`.
    ///
    /// Returns `true` if a record was replaced, `false` if `index` is out of
    /// range, in which case the backing file is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or rewritten.
    pub fn update<S: AsRef<str>>(
        &self,
        key: &str,
        index: usize,
        record: Record,
        schema: &[S],
    ) -> Result<bool> {
        let lock = self.key_lock(key);
        let _guard = lock.lock();

        let path = self.path_for(key);
        let mut records = read_file(&path)?;
        let Some(slot) = records.get_mut(index) else {
            debug!("Update of {} skipped: index {} out of range", key, index);
            return Ok(false);
        };
        *slot = record;
        write_file(&path, &records, schema)?;

        info!("Updated record {} in {}", index, key);
        Ok(true)
    }

    /// Remove the record at `index`, shifting later records down by one.
    ///
    /// Returns `true` if a record was removed, `false` if `index` is out of
    /// range, in which case the backing file is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or rewritten.
    pub fn delete<S: AsRef<str>>(&self, key: &str, index: usize, schema: &[S]) -> Result<bool> {
        let lock = self.key_lock(key);
        let _guard = lock.lock();

        let path = self.path_for(key);
        let mut records = read_file(&path)?;
        if index >= records.len() {
            debug!("Delete from {} skipped: index {} out of range", key, index);
            return Ok(false);
        }
        records.remove(index);
        write_file(&path, &records, schema)?;

        info!("Deleted record {} from {}", index, key);
        Ok(true)
    }

    /// Get statistics about the collection stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing file exists but cannot be read.
    pub fn stats(&self, key: &str) -> Result<CollectionStats> {
        let lock = self.key_lock(key);
        let _guard = lock.lock();

        let path = self.path_for(key);
        let records = read_file(&path)?.len();
        let file_size_bytes = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

        Ok(CollectionStats {
            key: key.to_string(),
            records,
            file_size_bytes,
        })
    }

    /// Get the lock guarding `key`, creating it on first use.
    fn key_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        Arc::clone(locks.entry(key.to_string()).or_default())
    }
}

/// Statistics about one stored collection.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CollectionStats {
    /// Storage key of the collection.
    pub key: String,
    /// Number of records stored.
    pub records: usize,
    /// Size of the backing file in bytes (0 if it does not exist).
    pub file_size_bytes: u64,
}

fn read_file(path: &Path) -> Result<Vec<Record>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No backing file at {}, reading as empty", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(Error::file_access(path, e)),
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);
    let headers = reader
        .headers()
        .map_err(|source| Error::csv(path, source))?
        .clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|source| Error::csv(path, source))?;
        records.push(headers.iter().zip(row.iter()).collect::<Record>());
    }

    debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Rewrite the whole file through a scratch file renamed into place, so a
/// failed write leaves the previous contents intact.
fn write_file<S: AsRef<str>>(path: &Path, records: &[Record], schema: &[S]) -> Result<()> {
    let scratch = path.with_extension(SCRATCH_EXTENSION);

    let mut writer =
        csv::Writer::from_path(&scratch).map_err(|source| Error::csv(&scratch, source))?;
    writer
        .write_record(schema.iter().map(AsRef::<str>::as_ref))
        .map_err(|source| Error::csv(&scratch, source))?;
    for record in records {
        writer
            .write_record(record.project(schema))
            .map_err(|source| Error::csv(&scratch, source))?;
    }
    writer
        .flush()
        .map_err(|source| Error::file_access(&scratch, source))?;
    drop(writer);

    fs::rename(&scratch, path).map_err(|source| Error::file_access(path, source))?;
    debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}
