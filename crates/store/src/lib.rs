//! JSON file persistence for record collections.
//!
//! Each collection lives in one file holding the full serialized record
//! array; every save rewrites the whole file. Load failures (missing
//! file, malformed JSON) fall back to a caller-provided seed rather
//! than crashing, while save failures surface as a [`StoreError`] so
//! the caller can keep its prior in-memory state.
//!
//! Concurrent writers from separate processes are last-write-wins;
//! there is no locking.

use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One persisted record collection, bound to a single JSON file.
pub struct Collection<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored record list, falling back to `seed` when the
    /// file is missing or does not parse. A malformed file is reported
    /// with a warning and never a crash.
    pub fn load_or(&self, seed: Vec<T>) -> Vec<T> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => {
                tracing::debug!(path = %self.path.display(), "no stored collection, using seed");
                return seed;
            }
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "stored collection is not valid JSON, falling back to seed"
                );
                seed
            }
        }
    }

    /// Replace the entire stored collection with `records`. The parent
    /// directory is created if needed.
    pub fn save(&self, records: &[T]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let formatted = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, formatted).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(
            path = %self.path.display(),
            count = records.len(),
            "collection persisted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: u64,
        label: String,
    }

    fn row(id: u64, label: &str) -> Row {
        Row {
            id,
            label: label.to_string(),
        }
    }

    #[test]
    fn test_missing_file_returns_seed() {
        let dir = tempfile::tempdir().unwrap();
        let coll: Collection<Row> = Collection::new(dir.path().join("rows.json"));
        let seed = vec![row(1, "seed")];
        assert_eq!(coll.load_or(seed.clone()), seed);
    }

    #[test]
    fn test_malformed_file_returns_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        fs::write(&path, "{ not json").unwrap();
        let coll: Collection<Row> = Collection::new(&path);
        assert_eq!(coll.load_or(vec![]), Vec::<Row>::new());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let coll: Collection<Row> = Collection::new(dir.path().join("rows.json"));
        let records = vec![row(1, "a"), row(2, "b")];
        coll.save(&records).unwrap();
        assert_eq!(coll.load_or(vec![]), records);
    }

    #[test]
    fn test_save_replaces_whole_collection() {
        let dir = tempfile::tempdir().unwrap();
        let coll: Collection<Row> = Collection::new(dir.path().join("rows.json"));
        coll.save(&[row(1, "a"), row(2, "b")]).unwrap();
        coll.save(&[row(3, "c")]).unwrap();
        assert_eq!(coll.load_or(vec![]), vec![row(3, "c")]);
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let coll: Collection<Row> = Collection::new(dir.path().join("nested/deeper/rows.json"));
        coll.save(&[row(1, "a")]).unwrap();
        assert_eq!(coll.load_or(vec![]), vec![row(1, "a")]);
    }

    #[test]
    fn test_save_to_unwritable_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        // The "parent" is a regular file, so creating children must fail.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let coll: Collection<Row> = Collection::new(blocker.join("rows.json"));
        assert!(matches!(
            coll.save(&[row(1, "a")]),
            Err(StoreError::Io { .. })
        ));
    }
}
