//! External key-value byte stores for learned state.
//!
//! The engine treats persistent storage as a plain key → bytes map. Three
//! backends are provided:
//! - `MemoryStore`: volatile, used in tests and when nothing is mounted.
//! - `DirStore`: one file per key inside a mounted directory; writes go
//!   through a temp file and an atomic rename.
//! - `RedbStore`: a single `redb` database file with one table of blobs.

use crate::error::PersistenceError;
use crate::frequency::FrequencyModel;
use redb::{Database, ReadableTable, TableDefinition};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Minimal key-value byte store.
pub trait ByteStore {
    /// Read the value stored under `key`, `None` when absent.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError>;

    /// Replace the value stored under `key`.
    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), PersistenceError>;
}

/// Volatile in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ByteStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// Store backed by files in an existing directory (e.g. a mounted flash FS).
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Open a store rooted at `root`.
    ///
    /// The directory must already exist: a missing root means the storage is
    /// not mounted and yields `PersistenceError::Unavailable`.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, PersistenceError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(PersistenceError::Unavailable(format!(
                "{} is not a mounted directory",
                root.display()
            )));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        // Keys are flat names; strip anything that would escape the root.
        let name: String = key
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        let name = name.trim_start_matches('.');
        if name.is_empty() {
            return Err(PersistenceError::Backend(format!(
                "invalid store key {:?}",
                key
            )));
        }
        Ok(self.root.join(name))
    }
}

impl ByteStore for DirStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        match fs::read(self.path_for(key)?) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), PersistenceError> {
        if !self.root.is_dir() {
            return Err(PersistenceError::Unavailable(format!(
                "{} disappeared",
                self.root.display()
            )));
        }
        let target = self.path_for(key)?;
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.persist(target).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Store backed by a `redb` database.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    const TABLE_DEF: TableDefinition<'static, &'static str, &'static [u8]> =
        TableDefinition::new("records");

    /// Create or open the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path = path.as_ref();
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
                return Err(PersistenceError::Unavailable(format!(
                    "{} is not a mounted directory",
                    parent.display()
                )));
            }
            _ => {}
        }
        let db = Database::create(path).map_err(backend)?;
        Ok(Self { db })
    }
}

impl ByteStore for RedbStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        let read_txn = self.db.begin_read().map_err(backend)?;
        let table = match read_txn.open_table(Self::TABLE_DEF) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(backend(e)),
        };
        let value = table.get(key).map_err(backend)?;
        Ok(value.map(|guard| guard.value().to_vec()))
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), PersistenceError> {
        let write_txn = self.db.begin_write().map_err(backend)?;
        {
            let mut table = write_txn.open_table(Self::TABLE_DEF).map_err(backend)?;
            table.insert(key, bytes).map_err(backend)?;
        }
        write_txn.commit().map_err(backend)?;
        Ok(())
    }
}

fn backend<E: std::fmt::Display>(e: E) -> PersistenceError {
    PersistenceError::Backend(e.to_string())
}

/// Load the frequency record stored under `key`.
///
/// A missing key is an empty model; undecodable UTF-8 is decoded lossily so
/// the valid lines still load.
pub fn load_frequency(
    store: &dyn ByteStore,
    key: &str,
    capacity: usize,
) -> Result<FrequencyModel, PersistenceError> {
    match store.read(key)? {
        Some(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            let model = FrequencyModel::parse_records(&text, capacity);
            tracing::info!(entries = model.len(), key, "loaded frequency entries");
            Ok(model)
        }
        None => {
            tracing::info!(key, "no existing frequency record, starting fresh");
            Ok(FrequencyModel::with_capacity(capacity))
        }
    }
}

/// Write `model` under `key` as `<text>:<count>` lines.
pub fn save_frequency(
    store: &mut dyn ByteStore,
    key: &str,
    model: &FrequencyModel,
) -> Result<(), PersistenceError> {
    store.write(key, model.to_records().as_bytes())?;
    tracing::info!(entries = model.len(), key, "saved frequency entries");
    Ok(())
}
