//! Error taxonomy for loading resources and persisting learned state.
//!
//! Nothing on the composition hot path (decode, segment, generate, rank) can
//! fail. The only fallible operations are reading the dictionary resource at
//! startup and reading/writing the frequency table, and both degrade instead
//! of aborting: an unavailable dictionary means "no candidates", unavailable
//! storage means the frequency model lives in memory for the session.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Failure to load a read-once resource (dictionary source or snapshot).
#[derive(Debug)]
pub enum LoadError {
    /// The backing resource could not be opened.
    ResourceUnavailable { path: PathBuf, source: io::Error },
    /// A compiled snapshot exists but could not be decoded.
    Snapshot(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::ResourceUnavailable { path, source } => {
                write!(f, "resource unavailable: {}: {}", path.display(), source)
            }
            LoadError::Snapshot(msg) => write!(f, "unreadable snapshot: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::ResourceUnavailable { source, .. } => Some(source),
            LoadError::Snapshot(_) => None,
        }
    }
}

/// Failure to read or write the external key-value byte store.
#[derive(Debug)]
pub enum PersistenceError {
    /// Storage is not mounted / not reachable at all.
    Unavailable(String),
    /// An I/O operation on a mounted store failed.
    Io(io::Error),
    /// The database backend reported an error.
    Backend(String),
}

impl PersistenceError {
    /// True when the store itself is missing rather than an operation failing.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, PersistenceError::Unavailable(_))
    }
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Unavailable(what) => write!(f, "storage unavailable: {}", what),
            PersistenceError::Io(e) => write!(f, "storage i/o error: {}", e),
            PersistenceError::Backend(msg) => write!(f, "storage backend error: {}", msg),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for PersistenceError {
    fn from(e: io::Error) -> Self {
        PersistenceError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_path() {
        let err = LoadError::ResourceUnavailable {
            path: PathBuf::from("/missing/pinyin.json"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/missing/pinyin.json"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn io_errors_convert() {
        let err: PersistenceError = io::Error::new(io::ErrorKind::Other, "disk full").into();
        assert!(!err.is_unavailable());
        assert!(PersistenceError::Unavailable("no card".into()).is_unavailable());
    }
}
