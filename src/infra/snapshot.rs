//! Durable JSON snapshot files
//!
//! Each store persists its full state as one JSON document, rewritten on
//! every mutation. Writes go through a temp file in the same directory and
//! an atomic rename, so a reader never observes a half-written document.

use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::Result;

/// A JSON document on disk holding the full state of one store.
#[derive(Debug, Clone)]
pub struct SnapshotFile<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> SnapshotFile<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot, or the default value when the file does not exist.
    ///
    /// A corrupt document is treated like a missing one: the store starts
    /// from its default and the next write replaces the file. The remote
    /// ledger remains the source of truth for anything lost this way.
    pub fn load_or_default(&self) -> T {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return T::default(),
            Err(e) => {
                warn!("failed to read snapshot {}: {}", self.path.display(), e);
                return T::default();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    "snapshot {} is not valid JSON, starting empty: {}",
                    self.path.display(),
                    e
                );
                T::default()
            }
        }
    }

    /// Rewrite the full document atomically (temp file + rename).
    pub fn write(&self, value: &T) -> Result<()> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut temp = tempfile::NamedTempFile::new_in(parent)?;
        temp.write_all(&serde_json::to_vec_pretty(value)?)?;
        temp.flush()?;
        temp.persist(&self.path)
            .map_err(|e| super::RelayError::Io(e.error))?;
        Ok(())
    }
}
